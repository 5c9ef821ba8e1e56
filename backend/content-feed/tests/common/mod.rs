//! Shared in-memory store for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use content_feed::db::{CommentStore, LikeStore, PostStore, StoreError};
use content_feed::models::{CommentView, FeedPost};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    caption: String,
    image: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct LikeRow {
    post_id: Uuid,
    user_id: Uuid,
    owner_id: Uuid,
}

#[derive(Debug, Clone)]
struct CommentRow {
    post_id: Uuid,
    user_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    users: HashMap<Uuid, String>,
    posts: Vec<PostRow>,
    likes: Vec<LikeRow>,
    comments: Vec<CommentRow>,
    clock: i64,
}

impl State {
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + ChronoDuration::seconds(self.clock)
    }

    fn to_feed_post(&self, row: &PostRow) -> FeedPost {
        FeedPost {
            id: row.id,
            user_id: row.user_id,
            username: self.users.get(&row.user_id).cloned().unwrap_or_default(),
            caption: row.caption.clone(),
            image: row.image.clone(),
            created_at: row.created_at,
        }
    }

    fn sorted_posts(&self) -> Vec<&PostRow> {
        let mut rows: Vec<&PostRow> = self.posts.iter().collect();
        rows.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        rows
    }
}

/// Store backing all three traits, with failure and latency injection.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    fail_reads: AtomicBool,
    fail_likes_for: Mutex<Option<Uuid>>,
    delays: Mutex<HashMap<Uuid, Duration>>,
    store_delay: Mutex<Option<Duration>>,
    page_fetches: AtomicUsize,
    recent_fetches: AtomicUsize,
    like_counts: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Marks one engagement call as running until dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state
            .lock()
            .unwrap()
            .users
            .insert(id, username.to_string());
        id
    }

    /// Publish `n` posts by `user_id`, oldest first. Returns ids in creation order.
    pub fn seed_posts(&self, user_id: Uuid, n: usize) -> Vec<Uuid> {
        let mut state = self.state.lock().unwrap();
        (0..n)
            .map(|i| {
                let id = Uuid::new_v4();
                let created_at = state.tick();
                state.posts.push(PostRow {
                    id,
                    user_id,
                    caption: format!("post {}", i),
                    image: format!("/uploads/{}.png", i),
                    created_at,
                });
                id
            })
            .collect()
    }

    pub fn seed_like(&self, post_id: Uuid, user_id: Uuid) {
        let mut state = self.state.lock().unwrap();
        let owner_id = state
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| p.user_id)
            .unwrap_or_default();
        state.likes.push(LikeRow {
            post_id,
            user_id,
            owner_id,
        });
    }

    pub fn seed_comment(&self, post_id: Uuid, user_id: Uuid, text: &str) {
        let mut state = self.state.lock().unwrap();
        let created_at = state.tick();
        state.comments.push(CommentRow {
            post_id,
            user_id,
            text: text.to_string(),
            created_at,
        });
    }

    pub fn like_owner(&self, post_id: Uuid, user_id: Uuid) -> Option<Uuid> {
        self.state
            .lock()
            .unwrap()
            .likes
            .iter()
            .find(|l| l.post_id == post_id && l.user_id == user_id)
            .map(|l| l.owner_id)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_likes_for(&self, post_id: Uuid) {
        *self.fail_likes_for.lock().unwrap() = Some(post_id);
    }

    /// Delay engagement reads for one post.
    pub fn delay_post(&self, post_id: Uuid, delay: Duration) {
        self.delays.lock().unwrap().insert(post_id, delay);
    }

    /// Delay every post read.
    pub fn delay_all(&self, delay: Duration) {
        *self.store_delay.lock().unwrap() = Some(delay);
    }

    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }

    pub fn recent_fetches(&self) -> usize {
        self.recent_fetches.load(Ordering::SeqCst)
    }

    pub fn like_counts(&self) -> usize {
        self.like_counts.load(Ordering::SeqCst)
    }

    /// Most engagement calls (likes plus comments) ever running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn enter(&self) -> InFlight<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight(&self.in_flight)
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }

    async fn post_delay(&self) {
        let delay = *self.store_delay.lock().unwrap();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
    }

    async fn engagement_delay(&self, post_id: Uuid) {
        let delay = self.delays.lock().unwrap().get(&post_id).copied();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
    }
}

#[async_trait]
impl PostStore for InMemoryStore {
    async fn count(&self) -> Result<u64, StoreError> {
        self.post_delay().await;
        self.check_reads()?;
        Ok(self.state.lock().unwrap().posts.len() as u64)
    }

    async fn fetch_page_ascending(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<FeedPost>, StoreError> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        self.post_delay().await;
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .sorted_posts()
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|row| state.to_feed_post(row))
            .collect())
    }

    async fn fetch_recent_descending(&self, limit: u64) -> Result<Vec<FeedPost>, StoreError> {
        self.recent_fetches.fetch_add(1, Ordering::SeqCst);
        self.post_delay().await;
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .sorted_posts()
            .into_iter()
            .rev()
            .take(limit as usize)
            .map(|row| state.to_feed_post(row))
            .collect())
    }

    async fn fetch_by_id_with_owner(&self, post_id: Uuid) -> Result<Option<FeedPost>, StoreError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|row| state.to_feed_post(row)))
    }

    async fn list_all(&self) -> Result<Vec<FeedPost>, StoreError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .sorted_posts()
            .into_iter()
            .map(|row| state.to_feed_post(row))
            .collect())
    }

    async fn insert(&self, user_id: Uuid, caption: &str, image: &str) -> Result<Uuid, StoreError> {
        let mut state = self.state.lock().unwrap();
        let id = Uuid::new_v4();
        let created_at = state.tick();
        state.posts.push(PostRow {
            id,
            user_id,
            caption: caption.to_string(),
            image: image.to_string(),
            created_at,
        });
        Ok(id)
    }

    async fn update(&self, post_id: Uuid, caption: &str, image: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        match state.posts.iter_mut().find(|p| p.id == post_id) {
            Some(row) => {
                row.caption = caption.to_string();
                row.image = image.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_owned(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.posts.len();
        state
            .posts
            .retain(|p| !(p.id == post_id && p.user_id == user_id));
        let deleted = state.posts.len() != before;
        if deleted {
            state.likes.retain(|l| l.post_id != post_id);
            state.comments.retain(|c| c.post_id != post_id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl LikeStore for InMemoryStore {
    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, StoreError> {
        self.like_counts.fetch_add(1, Ordering::SeqCst);
        let _call = self.enter();
        self.engagement_delay(post_id).await;
        self.check_reads()?;
        if *self.fail_likes_for.lock().unwrap() == Some(post_id) {
            return Err(StoreError::Unavailable(format!("likes for {}", post_id)));
        }
        let state = self.state.lock().unwrap();
        Ok(state.likes.iter().filter(|l| l.post_id == post_id).count() as i64)
    }

    async fn exists_for_user_and_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .likes
            .iter()
            .any(|l| l.post_id == post_id && l.user_id == user_id))
    }

    async fn insert(&self, user_id: Uuid, post_id: Uuid, owner_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state
            .likes
            .iter()
            .any(|l| l.post_id == post_id && l.user_id == user_id)
        {
            return Err(StoreError::Duplicate("like".to_string()));
        }
        state.likes.push(LikeRow {
            post_id,
            user_id,
            owner_id,
        });
        Ok(())
    }
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn fetch_for_post_with_author(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentView>, StoreError> {
        let _call = self.enter();
        self.engagement_delay(post_id).await;
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let mut rows: Vec<&CommentRow> = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .map(|c| CommentView {
                comment: c.text.clone(),
                username: state.users.get(&c.user_id).cloned().unwrap_or_default(),
            })
            .collect())
    }

    async fn insert(&self, user_id: Uuid, post_id: Uuid, text: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let created_at = state.tick();
        state.comments.push(CommentRow {
            post_id,
            user_id,
            text: text.to_string(),
            created_at,
        });
        Ok(())
    }
}
