use serde::{Deserialize, Serialize};
use crate::error::ValidationError;

pub const MAX_NAME_CHARS: usize = 10;
pub const MAX_PASSWORD_CHARS: usize = 10;
pub const MAX_CONTENT_CHARS: usize = 300;

/// Guestbook entry as persisted and delivered to listeners.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub name: String,
    pub content: String,
    /// Milliseconds since the Unix epoch, taken when the store accepted the write.
    pub timestamp: i64,
}

/// Unsubmitted guestbook input. Kept by the caller until a write succeeds.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub content: String,
}

impl CommentDraft {
    pub fn new(name: &str, password: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            password: password.to_string(),
            content: content.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.password.trim().is_empty() {
            return Err(ValidationError::MissingPassword);
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::MissingContent);
        }
        if self.name.chars().count() > MAX_NAME_CHARS {
            return Err(ValidationError::NameTooLong { max: MAX_NAME_CHARS });
        }
        if self.password.chars().count() > MAX_PASSWORD_CHARS {
            return Err(ValidationError::PasswordTooLong { max: MAX_PASSWORD_CHARS });
        }
        if self.content.chars().count() > MAX_CONTENT_CHARS {
            return Err(ValidationError::ContentTooLong { max: MAX_CONTENT_CHARS });
        }
        Ok(())
    }
}
