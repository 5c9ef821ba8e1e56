/// Post service - handles post creation, retrieval, and management
use crate::db::PostStore;
use crate::error::{AppError, Result};
use crate::models::FeedPost;
use crate::services::bounded;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct PostService {
    posts: Arc<dyn PostStore>,
    store_timeout: Duration,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, store_timeout: Duration) -> Self {
        Self {
            posts,
            store_timeout,
        }
    }

    /// Get a post by ID
    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<FeedPost>> {
        Ok(bounded(self.store_timeout, self.posts.fetch_by_id_with_owner(post_id)).await?)
    }

    /// All posts, oldest first
    pub async fn list_posts(&self) -> Result<Vec<FeedPost>> {
        Ok(bounded(self.store_timeout, self.posts.list_all()).await?)
    }

    /// Create a new post
    pub async fn create_post(&self, user_id: Uuid, caption: &str, image: &str) -> Result<Uuid> {
        let post_id = bounded(self.store_timeout, self.posts.insert(user_id, caption, image)).await?;
        tracing::info!(%post_id, %user_id, "post created");
        Ok(post_id)
    }

    /// Edit caption and optionally the image of a post owned by `user_id`
    pub async fn update_post(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        caption: &str,
        image: Option<&str>,
    ) -> Result<()> {
        let current = self
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Content not found".to_string()))?;

        if current.user_id != user_id {
            return Err(AppError::Forbidden(
                "You are not authorized to edit this content".to_string(),
            ));
        }

        let image = image.unwrap_or(&current.image);
        let updated = bounded(self.store_timeout, self.posts.update(post_id, caption, image)).await?;
        if !updated {
            // Deleted between the read and the update
            return Err(AppError::NotFound("Content not found".to_string()));
        }

        Ok(())
    }

    /// Delete a post owned by `user_id`; likes and comments cascade
    pub async fn delete_post(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let deleted = bounded(self.store_timeout, self.posts.delete_owned(post_id, user_id)).await?;
        if deleted {
            tracing::info!(%post_id, %user_id, "post deleted");
        }
        Ok(deleted)
    }
}
