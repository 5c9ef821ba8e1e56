use crate::db::{map_unique_violation, LikeStore, StoreError};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for Like operations
#[derive(Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeStore for LikeRepository {
    /// Count total likes for a post
    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Check if user has liked a post
    async fn exists_for_user_and_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = $1 AND post_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// A second like by the same user surfaces as `StoreError::Duplicate`
    async fn insert(&self, user_id: Uuid, post_id: Uuid, owner_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO likes (user_id, post_id, post_owner_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "like"))?;

        Ok(())
    }
}
