//! Domain entities mirrored from persistent storage.

use crate::domain::types::PostId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPostRecord {
    pub id: PostId,
    pub title: String,
    pub content: String,
}
