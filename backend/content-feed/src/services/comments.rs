/// Comment service - handles comment creation and retrieval
use crate::db::{CommentStore, PostStore};
use crate::error::{AppError, Result};
use crate::models::CommentView;
use crate::services::bounded;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct CommentService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    store_timeout: Duration,
}

impl CommentService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            posts,
            comments,
            store_timeout,
        }
    }

    /// Create a new comment
    pub async fn create_comment(&self, user_id: Uuid, post_id: Uuid, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Comment must not be empty".to_string(),
            ));
        }

        let exists = bounded(self.store_timeout, self.posts.fetch_by_id_with_owner(post_id))
            .await?
            .is_some();
        if !exists {
            return Err(AppError::NotFound("Content not found".to_string()));
        }

        bounded(self.store_timeout, self.comments.insert(user_id, post_id, text)).await?;
        tracing::info!(%post_id, %user_id, "comment created");
        Ok(())
    }

    /// Get comments for a post, newest first
    pub async fn get_post_comments(&self, post_id: Uuid) -> Result<Vec<CommentView>> {
        Ok(bounded(
            self.store_timeout,
            self.comments.fetch_for_post_with_author(post_id),
        )
        .await?)
    }
}
