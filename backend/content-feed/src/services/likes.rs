/// Like service - one like per user and post
use crate::db::{LikeStore, PostStore, StoreError};
use crate::error::{AppError, Result};
use crate::services::bounded;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct LikeService {
    posts: Arc<dyn PostStore>,
    likes: Arc<dyn LikeStore>,
    store_timeout: Duration,
}

impl LikeService {
    pub fn new(posts: Arc<dyn PostStore>, likes: Arc<dyn LikeStore>, store_timeout: Duration) -> Self {
        Self {
            posts,
            likes,
            store_timeout,
        }
    }

    /// Like a post.
    ///
    /// `claimed_owner`, when supplied by the client, must match the real owner.
    pub async fn like_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        claimed_owner: Option<Uuid>,
    ) -> Result<()> {
        let post = bounded(self.store_timeout, self.posts.fetch_by_id_with_owner(post_id))
            .await?
            .ok_or_else(|| AppError::NotFound("Content not found".to_string()))?;

        let already = bounded(
            self.store_timeout,
            self.likes.exists_for_user_and_post(user_id, post_id),
        )
        .await?;
        if already {
            return Err(AppError::BadRequest(
                "You have already liked this content".to_string(),
            ));
        }

        if let Some(owner) = claimed_owner {
            if owner != post.user_id {
                return Err(AppError::BadRequest("Invalid post owner".to_string()));
            }
        }

        match bounded(
            self.store_timeout,
            self.likes.insert(user_id, post_id, post.user_id),
        )
        .await
        {
            Ok(()) => {
                tracing::info!(%post_id, %user_id, "post liked");
                Ok(())
            }
            // Lost a race with a concurrent like by the same user
            Err(StoreError::Duplicate(_)) => Err(AppError::BadRequest(
                "You have already liked this content".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of likes on a post
    pub async fn like_count(&self, post_id: Uuid) -> Result<i64> {
        Ok(bounded(self.store_timeout, self.likes.count_for_post(post_id)).await?)
    }
}
