use thiserror::Error;
use crate::entities::Year;

#[derive(Error, Debug)]
pub enum ShowcaseError {
    #[error("Dataset for year {0} not found")]
    DatasetNotFound(Year),
    #[error("Dataset for year {year} is malformed: {reason}")]
    MalformedDataset { year: Year, reason: String },
    #[error("Comment rejected: {0}")]
    Validation(#[from] ValidationError),
    #[error("Failed to fetch dataset: {0}")]
    DatasetTransport(reqwest::Error),
    #[error("Failed to read dataset file: {0}")]
    DatasetIOError(std::io::Error),
    #[error("Failed to read/write comment store: {0}")]
    StoreIOError(std::io::Error),
    #[error("Failed to serialize/deserialize comment record: {0}")]
    StoreSerializationError(serde_json::Error),
}

/// Coarse classification every failure of the data layer falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Malformed,
    Validation,
    Transport,
}

impl ShowcaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DatasetNotFound(_) => ErrorKind::NotFound,
            Self::MalformedDataset { .. } => ErrorKind::Malformed,
            Self::Validation(_) => ErrorKind::Validation,
            Self::DatasetTransport(_)
            | Self::DatasetIOError(_)
            | Self::StoreIOError(_)
            | Self::StoreSerializationError(_) => ErrorKind::Transport,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,
    #[error("password is required")]
    MissingPassword,
    #[error("content is required")]
    MissingContent,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
    #[error("content must be at most {max} characters")]
    ContentTooLong { max: usize },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingName | Self::NameTooLong { .. } => "name",
            Self::MissingPassword | Self::PasswordTooLong { .. } => "password",
            Self::MissingContent | Self::ContentTooLong { .. } => "content",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_taxonomy() {
        let year = Year::new(2025);
        assert_eq!(ShowcaseError::DatasetNotFound(year).kind(), ErrorKind::NotFound);
        assert_eq!(ShowcaseError::MalformedDataset { year, reason: "x".into() }.kind(), ErrorKind::Malformed);
        assert_eq!(ShowcaseError::from(ValidationError::MissingName).kind(), ErrorKind::Validation);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(ShowcaseError::StoreIOError(io).kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_validation_field() {
        assert_eq!(ValidationError::MissingPassword.field(), "password");
        assert_eq!(ValidationError::ContentTooLong { max: 300 }.field(), "content");
    }
}
