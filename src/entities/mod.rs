pub mod comment;
pub mod dataset;
pub mod designer;
pub mod id;
pub mod works;

pub use crate::entities::comment::{Comment, CommentDraft};
pub use crate::entities::dataset::Dataset;
pub use crate::entities::designer::Designer;
pub use crate::entities::id::{EntityId, Year};
pub use crate::entities::works::{Post, StillCut, Team, Video, Work, WorkKind};
