mod common;

use async_trait::async_trait;
use common::InMemoryStore;
use content_feed::config::FeedConfig;
use content_feed::db::{CommentStore, LikeStore, PostStore, StoreError};
use content_feed::models::{CommentView, FeedPost};
use content_feed::services::{EngagementAggregator, FeedError, FeedService, FeedServiceConfig};
use mockall::mock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn config(page_size: u64) -> FeedServiceConfig {
    FeedServiceConfig {
        page_size,
        enrich_concurrency: 4,
        store_timeout: Duration::from_secs(2),
    }
}

fn feed_over(store: &Arc<InMemoryStore>, config: FeedServiceConfig) -> FeedService {
    FeedService::new(store.clone(), store.clone(), store.clone(), config)
}

fn ids(page: &content_feed::models::FeedPage) -> Vec<Uuid> {
    page.content.iter().map(|p| p.post.id).collect()
}

#[tokio::test]
async fn first_page_returns_oldest_posts_ascending() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let posts = store.seed_posts(ana, 20);
    let feed = feed_over(&store, config(9));

    let page = feed.page(1).await.unwrap();

    assert_eq!(page.total_pages, 3);
    assert_eq!(ids(&page), posts[0..9].to_vec());
    assert_eq!(store.recent_fetches(), 0);
    assert!(page.content.iter().all(|p| p.post.username == "ana"));
}

#[tokio::test]
async fn last_page_wraps_into_most_recent_posts() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let posts = store.seed_posts(ana, 20);
    let feed = feed_over(&store, config(9));

    let page = feed.page(3).await.unwrap();

    let mut expected = posts[18..20].to_vec();
    expected.extend(posts.iter().rev().take(9));
    assert_eq!(ids(&page), expected);
    assert_eq!(page.content.len(), 11);
    assert_eq!(page.total_pages, 3);
    assert_eq!(store.recent_fetches(), 1);
}

#[tokio::test]
async fn wrapped_duplicates_share_engagement() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let bob = store.add_user("bob");
    let posts = store.seed_posts(ana, 20);
    let newest = posts[19];
    store.seed_like(newest, bob);
    store.seed_comment(newest, bob, "nice");

    let feed = feed_over(&store, config(9));
    let page = feed.page(3).await.unwrap();

    let copies: Vec<_> = page.content.iter().filter(|p| p.post.id == newest).collect();
    assert_eq!(copies.len(), 2);
    for copy in copies {
        assert_eq!(copy.likes, 1);
        assert_eq!(copy.comments[0].comment, "nice");
        assert_eq!(copy.comments[0].username, "bob");
    }
    // 11 rows, 9 distinct posts
    assert_eq!(store.like_counts(), 9);
}

#[tokio::test]
async fn empty_store_returns_empty_page_without_fetching() {
    let store = InMemoryStore::new();
    let feed = feed_over(&store, config(9));

    let page = feed.page(1).await.unwrap();

    assert!(page.content.is_empty());
    assert_eq!(page.total_pages, 0);
    assert_eq!(store.page_fetches(), 0);
    assert_eq!(store.recent_fetches(), 0);
}

#[tokio::test]
async fn post_without_engagement_enriches_to_zero() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    store.seed_posts(ana, 1);
    let feed = feed_over(&store, config(9));

    let page = feed.page(1).await.unwrap();

    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].likes, 0);
    assert!(page.content[0].comments.is_empty());
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn comments_come_back_newest_first() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let bob = store.add_user("bob");
    let post = store.seed_posts(ana, 1)[0];
    store.seed_comment(post, bob, "first");
    store.seed_comment(post, ana, "second");

    let page = feed_over(&store, config(9)).page(1).await.unwrap();

    let comments: Vec<&str> = page.content[0]
        .comments
        .iter()
        .map(|c| c.comment.as_str())
        .collect();
    assert_eq!(comments, vec!["second", "first"]);
}

#[tokio::test]
async fn page_size_covering_everything_returns_all_posts_once() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let posts = store.seed_posts(ana, 5);
    let feed = feed_over(&store, config(9));

    let page = feed.page(1).await.unwrap();
    assert_eq!(ids(&page), posts);
    assert_eq!(page.total_pages, 1);
    assert_eq!(store.recent_fetches(), 0);
}

#[tokio::test]
async fn pages_past_the_end_cycle_back() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    store.seed_posts(ana, 20);
    let feed = feed_over(&store, config(9));

    // (20 * 9) mod 20 == 0, so page 21 lines up with page 1
    let first = feed.page(1).await.unwrap();
    let cycled = feed.page(21).await.unwrap();
    assert_eq!(ids(&first), ids(&cycled));
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let bob = store.add_user("bob");
    let posts = store.seed_posts(ana, 14);
    store.seed_like(posts[3], bob);
    store.seed_comment(posts[12], bob, "hey");
    let feed = feed_over(&store, config(9));

    for page_no in 1..=3 {
        let a = feed.page(page_no).await.unwrap();
        let b = feed.page(page_no).await.unwrap();
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn order_survives_permuted_completion_times() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let posts = store.seed_posts(ana, 9);

    // Earliest posts finish last
    for (i, id) in posts.iter().enumerate() {
        store.delay_post(*id, Duration::from_millis(5 * (9 - i as u64)));
    }

    let feed = FeedService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        FeedServiceConfig {
            enrich_concurrency: 9,
            ..config(9)
        },
    );
    let page = feed.page(1).await.unwrap();
    assert_eq!(ids(&page), posts);
}

#[tokio::test]
async fn aggregator_keeps_input_order_for_any_arrangement() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let seeded = store.seed_posts(ana, 6);
    let mut posts = store.list_all().await.unwrap();
    posts.reverse();
    posts.push(posts[0].clone());

    for (i, p) in posts.iter().enumerate() {
        store.delay_post(p.id, Duration::from_millis(((i * 7) % 5) as u64 * 3));
    }

    let aggregator = EngagementAggregator::new(store.clone(), store.clone(), 3, Duration::from_secs(1));
    let expected: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let enriched = aggregator.enrich(posts).await.unwrap();

    assert_eq!(enriched.iter().map(|p| p.post.id).collect::<Vec<_>>(), expected);
    assert_eq!(expected.len(), seeded.len() + 1);
}

#[tokio::test]
async fn one_failing_post_fails_the_whole_page() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let posts = store.seed_posts(ana, 9);
    store.fail_likes_for(posts[4]);

    let err = feed_over(&store, config(9)).page(1).await.unwrap_err();
    assert!(matches!(err, FeedError::Retrieval(StoreError::Unavailable(_))));
}

#[tokio::test]
async fn count_failure_surfaces_as_retrieval_error() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    store.seed_posts(ana, 3);
    store.fail_reads(true);

    let err = feed_over(&store, config(9)).page(1).await.unwrap_err();
    assert!(matches!(err, FeedError::Retrieval(_)));
    assert_eq!(store.page_fetches(), 0);
}

#[tokio::test]
async fn slow_store_times_out() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    store.seed_posts(ana, 3);
    store.delay_all(Duration::from_millis(200));

    let feed = feed_over(
        &store,
        FeedServiceConfig {
            store_timeout: Duration::from_millis(20),
            ..config(9)
        },
    );

    let err = feed.page(1).await.unwrap_err();
    assert!(matches!(err, FeedError::Retrieval(StoreError::Timeout(_))));
}

#[tokio::test]
async fn slow_enrichment_times_out() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let posts = store.seed_posts(ana, 2);
    store.delay_post(posts[1], Duration::from_millis(200));

    let aggregator = EngagementAggregator::new(store.clone(), store.clone(), 2, Duration::from_millis(20));
    let rows = store.list_all().await.unwrap();
    let err = aggregator.enrich(rows).await.unwrap_err();
    assert!(matches!(err, FeedError::Retrieval(StoreError::Timeout(_))));
}

#[tokio::test]
async fn store_calls_in_flight_never_exceed_the_pool() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let posts = store.seed_posts(ana, 18);
    for id in &posts {
        store.delay_post(*id, Duration::from_millis(20));
    }

    let feed_config = FeedConfig {
        page_size: 18,
        enrich_concurrency: 32,
        store_timeout_ms: 2_000,
    };
    let pool_size = 10;
    let concurrency = feed_config.capped_concurrency(pool_size);

    let aggregator =
        EngagementAggregator::new(store.clone(), store.clone(), concurrency, Duration::from_secs(2));
    let rows = store.list_all().await.unwrap();
    let enriched = aggregator.enrich(rows).await.unwrap();

    assert_eq!(enriched.len(), 18);
    assert!(store.peak_in_flight() <= pool_size as usize);
    assert!(store.peak_in_flight() >= 2);
}

mock! {
    pub Likes {}

    #[async_trait]
    impl LikeStore for Likes {
        async fn count_for_post(&self, post_id: Uuid) -> Result<i64, StoreError>;
        async fn exists_for_user_and_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, StoreError>;
        async fn insert(&self, user_id: Uuid, post_id: Uuid, owner_id: Uuid) -> Result<(), StoreError>;
    }
}

/// Comment store that never answers and counts how many calls were started.
struct HangingComments {
    started: AtomicUsize,
}

#[async_trait]
impl CommentStore for HangingComments {
    async fn fetch_for_post_with_author(
        &self,
        _post_id: Uuid,
    ) -> Result<Vec<CommentView>, StoreError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    async fn insert(&self, _: Uuid, _: Uuid, _: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn like_failure_aborts_in_flight_comment_fetches() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    store.seed_posts(ana, 4);
    let rows: Vec<FeedPost> = store.list_all().await.unwrap();

    let mut likes = MockLikes::new();
    likes
        .expect_count_for_post()
        .returning(|_| Err(StoreError::Unavailable("likes down".to_string())));

    let comments = Arc::new(HangingComments {
        started: AtomicUsize::new(0),
    });

    // Generous timeout: the failure must come from the like store, not the deadline
    let aggregator =
        EngagementAggregator::new(Arc::new(likes), comments.clone(), 2, Duration::from_secs(30));

    let result = tokio::time::timeout(Duration::from_secs(5), aggregator.enrich(rows)).await;
    let err = result.expect("enrichment should fail fast").unwrap_err();

    assert!(matches!(err, FeedError::Retrieval(StoreError::Unavailable(_))));
    assert!(comments.started.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn read_skew_shrinks_the_page_instead_of_failing() {
    let store = InMemoryStore::new();
    let ana = store.add_user("ana");
    let posts = store.seed_posts(ana, 10);
    let feed = feed_over(&store, config(9));

    let plan = content_feed::services::compute_slice(2, 9, 10);
    // A delete lands between the count and the page read
    assert!(store.delete_owned(posts[0], ana).await.unwrap());
    let rows = feed.fetch_slice(&plan).await.unwrap();

    // Offset 9 of 9 remaining rows is past the end; the wrap fetch still fills the page
    assert!(plan.wraps());
    assert_eq!(rows.len(), 9);
}
