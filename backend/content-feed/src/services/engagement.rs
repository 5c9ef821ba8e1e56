//! Engagement aggregation: like counts and comment threads per post.
//!
//! Posts are fanned out with bounded concurrency and joined back by post id,
//! so the output order always matches the input order regardless of which
//! store call finishes first. The first failure aborts the whole page; the
//! remaining in-flight calls are dropped with the stream.

use crate::db::{CommentStore, LikeStore};
use crate::models::{CommentView, EnrichedPost, FeedPost};
use crate::services::bounded;
use crate::services::feed::FeedError;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Engagement {
    likes: i64,
    comments: Vec<CommentView>,
}

pub struct EngagementAggregator {
    likes: Arc<dyn LikeStore>,
    comments: Arc<dyn CommentStore>,
    concurrency: usize,
    store_timeout: Duration,
}

impl EngagementAggregator {
    pub fn new(
        likes: Arc<dyn LikeStore>,
        comments: Arc<dyn CommentStore>,
        concurrency: usize,
        store_timeout: Duration,
    ) -> Self {
        Self {
            likes,
            comments,
            concurrency: concurrency.max(1),
            store_timeout,
        }
    }

    /// Attach like counts and comments to `posts`, preserving their order.
    ///
    /// A post id appearing more than once is fetched once.
    pub async fn enrich(&self, posts: Vec<FeedPost>) -> Result<Vec<EnrichedPost>, FeedError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::with_capacity(posts.len());
        let distinct: Vec<Uuid> = posts
            .iter()
            .map(|p| p.id)
            .filter(|id| seen.insert(*id))
            .collect();

        debug!(
            posts = posts.len(),
            distinct = distinct.len(),
            concurrency = self.concurrency,
            "enriching feed posts"
        );

        let engagement: HashMap<Uuid, Engagement> = stream::iter(distinct)
            .map(|post_id| self.fetch_engagement(post_id))
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        posts
            .into_iter()
            .map(|post| {
                let found = engagement.get(&post.id).cloned().ok_or_else(|| {
                    FeedError::Consistency(format!("no engagement fetched for post {}", post.id))
                })?;
                Ok(EnrichedPost {
                    post,
                    likes: found.likes,
                    comments: found.comments,
                })
            })
            .collect()
    }

    async fn fetch_engagement(&self, post_id: Uuid) -> Result<(Uuid, Engagement), FeedError> {
        let (likes, comments) = tokio::try_join!(
            bounded(self.store_timeout, self.likes.count_for_post(post_id)),
            bounded(
                self.store_timeout,
                self.comments.fetch_for_post_with_author(post_id)
            ),
        )?;

        Ok((post_id, Engagement { likes, comments }))
    }
}
