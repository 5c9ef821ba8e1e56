use crate::db::{PostStore, StoreError};
use crate::models::FeedPost;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for Post operations
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl PostStore for PostRepository {
    async fn count(&self) -> Result<u64, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }

    /// Oldest first, `LIMIT limit OFFSET offset`
    async fn fetch_page_ascending(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<FeedPost>, StoreError> {
        let posts = sqlx::query_as::<_, FeedPost>(
            r#"
            SELECT p.id, p.user_id, u.username, p.caption, p.image, p.created_at
            FROM posts p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at ASC, p.id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(to_i64(limit))
        .bind(to_i64(offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Newest first
    async fn fetch_recent_descending(&self, limit: u64) -> Result<Vec<FeedPost>, StoreError> {
        let posts = sqlx::query_as::<_, FeedPost>(
            r#"
            SELECT p.id, p.user_id, u.username, p.caption, p.image, p.created_at
            FROM posts p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1
            "#,
        )
        .bind(to_i64(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn fetch_by_id_with_owner(&self, post_id: Uuid) -> Result<Option<FeedPost>, StoreError> {
        let post = sqlx::query_as::<_, FeedPost>(
            r#"
            SELECT p.id, p.user_id, u.username, p.caption, p.image, p.created_at
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list_all(&self) -> Result<Vec<FeedPost>, StoreError> {
        let posts = sqlx::query_as::<_, FeedPost>(
            r#"
            SELECT p.id, p.user_id, u.username, p.caption, p.image, p.created_at
            FROM posts p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at ASC, p.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn insert(&self, user_id: Uuid, caption: &str, image: &str) -> Result<Uuid, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO posts (user_id, caption, image)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(caption)
        .bind(image)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, post_id: Uuid, caption: &str, image: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET caption = $1, image = $2
            WHERE id = $3
            "#,
        )
        .bind(caption)
        .bind(image)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_owned(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
