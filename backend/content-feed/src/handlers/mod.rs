/// HTTP handlers for content-feed endpoints
///
/// - Feed: wrap-around paginated, engagement-enriched pages
/// - Posts: create, read, edit, delete
/// - Likes and comments on a post
pub mod comments;
pub mod feed;
pub mod health;
pub mod likes;
pub mod posts;

pub use comments::{create_comment, get_comments};
pub use feed::get_feed;
pub use health::{health_check, health_live, health_ready};
pub use likes::{get_like_count, like_post};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};

use crate::db::{CommentStore, LikeStore, PostStore};
use crate::error::AppError;
use crate::services::{CommentService, FeedService, FeedServiceConfig, LikeService, PostService};
use actix_web::web;
use std::sync::Arc;

/// Services shared by every handler.
pub struct AppState {
    pub feed: FeedService,
    pub posts: PostService,
    pub likes: LikeService,
    pub comments: CommentService,
}

impl AppState {
    pub fn new(
        posts: Arc<dyn PostStore>,
        likes: Arc<dyn LikeStore>,
        comments: Arc<dyn CommentStore>,
        config: FeedServiceConfig,
    ) -> Self {
        let timeout = config.store_timeout;
        Self {
            feed: FeedService::new(posts.clone(), likes.clone(), comments.clone(), config),
            posts: PostService::new(posts.clone(), timeout),
            likes: LikeService::new(posts.clone(), likes, timeout),
            comments: CommentService::new(posts, comments, timeout),
        }
    }
}

/// Register the `/content` routes. Expects to be mounted under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Content not found".to_string()).into()),
    )
    .service(
        web::scope("/content")
            // Registered before `/{id}` so "feed" is not taken for an id
            .route("/feed", web::get().to(get_feed))
            .route("", web::get().to(list_posts))
            .route("", web::post().to(create_post))
            .route("/{id}", web::get().to(get_post))
            .route("/{id}", web::patch().to(update_post))
            .route("/{id}", web::delete().to(delete_post))
            .route("/{id}/likes", web::get().to(get_like_count))
            .route("/{id}/likes", web::post().to(like_post))
            .route("/{id}/comments", web::get().to(get_comments))
            .route("/{id}/comments", web::post().to(create_comment)),
    );
}
