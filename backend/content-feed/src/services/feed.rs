//! Feed page orchestration.
//!
//! count → plan → ascending fetch (+ most-recent fetch on wrap) → enrich →
//! assemble. The count and the page reads are independent queries, so rows
//! published or deleted in between can shift page contents (read skew). The
//! plan never produces an out-of-range offset, and a short read is returned
//! as-is.

use crate::config::FeedConfig;
use crate::db::{CommentStore, LikeStore, PostStore, StoreError};
use crate::metrics::feed::{
    FEED_PAGE_POSTS, FEED_REQUEST_DURATION_SECONDS, FEED_REQUEST_TOTAL, FEED_WRAPAROUND_TOTAL,
};
use crate::models::{EnrichedPost, FeedPage, FeedPost};
use crate::services::bounded;
use crate::services::engagement::EngagementAggregator;
use crate::services::pagination::{compute_slice, SlicePlan, FEED_PAGE_SIZE};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum FeedError {
    /// Store unreachable, timed out or returned bad data
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] StoreError),

    /// Internal invariant violated while building a page
    #[error("Consistency error: {0}")]
    Consistency(String),
}

impl FeedError {
    fn outcome(&self) -> &'static str {
        match self {
            FeedError::Retrieval(_) => "retrieval_error",
            FeedError::Consistency(_) => "consistency_error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedServiceConfig {
    pub page_size: u64,
    pub enrich_concurrency: usize,
    pub store_timeout: Duration,
}

impl Default for FeedServiceConfig {
    fn default() -> Self {
        Self {
            page_size: FEED_PAGE_SIZE,
            enrich_concurrency: 8,
            store_timeout: resilience::database_config().timeout.duration,
        }
    }
}

impl From<&FeedConfig> for FeedServiceConfig {
    fn from(cfg: &FeedConfig) -> Self {
        Self {
            page_size: cfg.page_size,
            enrich_concurrency: cfg.enrich_concurrency,
            store_timeout: Duration::from_millis(cfg.store_timeout_ms),
        }
    }
}

pub struct FeedService {
    posts: Arc<dyn PostStore>,
    aggregator: EngagementAggregator,
    config: FeedServiceConfig,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        likes: Arc<dyn LikeStore>,
        comments: Arc<dyn CommentStore>,
        config: FeedServiceConfig,
    ) -> Self {
        let aggregator = EngagementAggregator::new(
            likes,
            comments,
            config.enrich_concurrency,
            config.store_timeout,
        );
        Self {
            posts,
            aggregator,
            config,
        }
    }

    /// Build feed page `page` (1-based).
    pub async fn page(&self, page: u64) -> Result<FeedPage, FeedError> {
        let started = Instant::now();
        let result = self.build_page(page).await;

        let outcome = match &result {
            Ok(feed) => {
                FEED_PAGE_POSTS.observe(feed.content.len() as f64);
                "ok"
            }
            Err(e) => {
                warn!(page, error = %e, "feed page failed");
                e.outcome()
            }
        };
        FEED_REQUEST_TOTAL.with_label_values(&[outcome]).inc();
        FEED_REQUEST_DURATION_SECONDS
            .with_label_values(&[outcome])
            .observe(started.elapsed().as_secs_f64());

        result
    }

    async fn build_page(&self, page: u64) -> Result<FeedPage, FeedError> {
        let total = bounded(self.config.store_timeout, self.posts.count()).await?;
        let plan = compute_slice(page, self.config.page_size, total);

        debug!(
            page = plan.page,
            total = plan.total_count,
            start = plan.start,
            end = plan.end,
            wraps = plan.wraps(),
            "feed slice planned"
        );

        if plan.is_empty() {
            return Ok(FeedPage::empty());
        }

        let posts = self.fetch_slice(&plan).await?;
        let fetched_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let enriched = self.aggregator.enrich(posts).await?;

        assemble(&plan, &fetched_ids, enriched)
    }

    /// Raw rows for `plan`: the ascending slice, followed by the most recent
    /// `page_size` rows when the slice wraps.
    pub async fn fetch_slice(&self, plan: &SlicePlan) -> Result<Vec<FeedPost>, FeedError> {
        if plan.is_empty() {
            return Ok(Vec::new());
        }

        let timeout = self.config.store_timeout;
        let mut posts = bounded(
            timeout,
            self.posts.fetch_page_ascending(plan.page_size, plan.start),
        )
        .await?;

        if plan.wraps() {
            FEED_WRAPAROUND_TOTAL.inc();
            let recent = bounded(timeout, self.posts.fetch_recent_descending(plan.page_size)).await?;
            posts.extend(recent);
        }

        Ok(posts)
    }
}

/// Compose the page payload.
///
/// `enriched` must carry exactly the fetched ids in fetched order.
pub fn assemble(
    plan: &SlicePlan,
    fetched_ids: &[Uuid],
    enriched: Vec<EnrichedPost>,
) -> Result<FeedPage, FeedError> {
    if enriched.len() != fetched_ids.len() {
        return Err(FeedError::Consistency(format!(
            "expected {} enriched posts, got {}",
            fetched_ids.len(),
            enriched.len()
        )));
    }

    if let Some((idx, (want, got))) = fetched_ids
        .iter()
        .zip(enriched.iter())
        .enumerate()
        .find(|(_, (want, got))| **want != got.post.id)
    {
        return Err(FeedError::Consistency(format!(
            "position {}: expected post {}, got {}",
            idx, want, got.post.id
        )));
    }

    Ok(FeedPage {
        content: enriched,
        total_pages: plan.total_pages,
    })
}
