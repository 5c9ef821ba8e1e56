use crate::db::{CommentStore, StoreError};
use crate::models::CommentView;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for Comment operations
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn fetch_for_post_with_author(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentView>, StoreError> {
        let comments = sqlx::query_as::<_, CommentView>(
            r#"
            SELECT c.comment, u.username
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn insert(&self, user_id: Uuid, post_id: Uuid, text: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO comments (user_id, post_id, comment)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .bind(text)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
