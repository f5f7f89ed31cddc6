//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::BlogPostRecord;
use crate::domain::types::PostId;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: PostId,
    pub title: String,
    pub content: String,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// All posts in ascending id order.
    async fn list_posts(&self) -> Result<Vec<BlogPostRecord>, RepoError>;

    async fn find_post(&self, id: PostId) -> Result<Option<BlogPostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<BlogPostRecord, RepoError>;

    /// Fails with [`RepoError::NotFound`] when no post has `params.id`.
    async fn update_post(&self, params: UpdatePostParams) -> Result<BlogPostRecord, RepoError>;

    /// Fails with [`RepoError::NotFound`] when nothing was deleted.
    async fn delete_post(&self, id: PostId) -> Result<(), RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
