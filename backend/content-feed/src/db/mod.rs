/// Database access layer
///
/// This module provides:
/// - Store traits the feed core reads through (`PostStore`, `LikeStore`, `CommentStore`)
/// - PostgreSQL repository implementations backed by sqlx
///
/// The traits are the seam between the pagination/aggregation logic and the
/// relational store, so the core can be exercised against in-memory fakes.
pub mod comment_repo;
pub mod like_repo;
pub mod post_repo;

pub use comment_repo::CommentRepository;
pub use like_repo::LikeRepository;
pub use post_repo::PostRepository;

use crate::models::{CommentView, FeedPost};
use async_trait::async_trait;
use resilience::TimeoutError;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Duplicate row: {0}")]
    Duplicate(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<TimeoutError<StoreError>> for StoreError {
    fn from(err: TimeoutError<StoreError>) -> Self {
        match err {
            TimeoutError::Elapsed(d) => StoreError::Timeout(d),
            TimeoutError::Failed(e) => e,
        }
    }
}

/// Map a unique-constraint violation to `StoreError::Duplicate`.
pub(crate) fn map_unique_violation(err: sqlx::Error, what: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Duplicate(what.to_string())
        }
        _ => StoreError::Database(err),
    }
}

/// Read/write access to posts.
///
/// Reads order by `created_at` with `id` as tie breaker.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn count(&self) -> Result<u64, StoreError>;

    async fn fetch_page_ascending(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<FeedPost>, StoreError>;

    async fn fetch_recent_descending(&self, limit: u64) -> Result<Vec<FeedPost>, StoreError>;

    async fn fetch_by_id_with_owner(&self, post_id: Uuid) -> Result<Option<FeedPost>, StoreError>;

    async fn list_all(&self) -> Result<Vec<FeedPost>, StoreError>;

    async fn insert(&self, user_id: Uuid, caption: &str, image: &str) -> Result<Uuid, StoreError>;

    /// Returns false when no row matched.
    async fn update(&self, post_id: Uuid, caption: &str, image: &str) -> Result<bool, StoreError>;

    /// Deletes only when `user_id` owns the post. Returns false otherwise.
    async fn delete_owned(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait LikeStore: Send + Sync {
    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, StoreError>;

    async fn exists_for_user_and_post(&self, user_id: Uuid, post_id: Uuid)
        -> Result<bool, StoreError>;

    async fn insert(&self, user_id: Uuid, post_id: Uuid, owner_id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Newest first.
    async fn fetch_for_post_with_author(&self, post_id: Uuid)
        -> Result<Vec<CommentView>, StoreError>;

    async fn insert(&self, user_id: Uuid, post_id: Uuid, text: &str) -> Result<(), StoreError>;
}
