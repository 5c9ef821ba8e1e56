/// Business logic layer for content-feed
///
/// This module provides high-level operations:
/// - Pagination: wrap-around slice planning for the feed
/// - Engagement: concurrent like/comment enrichment
/// - Feed: page orchestration and assembly
/// - Posts, likes, comments: single-row content operations
pub mod comments;
pub mod engagement;
pub mod feed;
pub mod likes;
pub mod pagination;
pub mod posts;

// Re-export commonly used services
pub use comments::CommentService;
pub use engagement::EngagementAggregator;
pub use feed::{assemble, FeedError, FeedService, FeedServiceConfig};
pub use likes::LikeService;
pub use pagination::{compute_slice, parse_page, SlicePlan, FEED_PAGE_SIZE};
pub use posts::PostService;

use crate::db::StoreError;
use resilience::with_timeout_result;
use std::future::Future;
use std::time::Duration;

/// Run a store call under `timeout`; an elapsed deadline becomes `StoreError::Timeout`.
pub(crate) async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    with_timeout_result(timeout, call)
        .await
        .map_err(StoreError::from)
}
