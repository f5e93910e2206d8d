//! Parser module: documentation comments into operation metadata.

pub mod comment;
pub mod types;

pub use comment::{parse_comment, parse_tag, Tag};
pub use types::normalize_type;
