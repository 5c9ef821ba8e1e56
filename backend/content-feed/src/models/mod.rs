/// Data models for content-feed
///
/// This module defines structures for:
/// - FeedPost: a post row joined with its owner's username
/// - CommentView: a comment joined with its author's username
/// - EnrichedPost / FeedPage: the derived feed payload
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Post joined with the owning user's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub caption: String,
    pub image: String,
    #[serde(rename = "createAt")]
    pub created_at: DateTime<Utc>,
}

/// Comment as shown under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CommentView {
    pub comment: String,
    pub username: String,
}

/// A post annotated with its engagement counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPost {
    #[serde(flatten)]
    pub post: FeedPost,
    pub likes: i64,
    pub comments: Vec<CommentView>,
}

/// One page of the infinite-scroll feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub content: Vec<EnrichedPost>,
    pub total_pages: u64,
}

impl FeedPage {
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
        }
    }
}
