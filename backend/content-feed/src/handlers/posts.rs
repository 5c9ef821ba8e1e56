/// Post handlers - HTTP endpoints for post operations
use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Caption must be 1 to 200 characters"))]
    pub caption: String,
    /// Reference returned by the upload subsystem
    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Caption must be 1 to 200 characters"))]
    pub caption: String,
    #[validate(length(min = 1, message = "Image must not be empty"))]
    pub image: Option<String>,
}

/// Create a new post
pub async fn create_post(
    state: web::Data<AppState>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let id = state
        .posts
        .create_post(user_id.0, &req.caption, &req.image)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "id": id,
        "message": "Content added successfully",
    })))
}

/// List every post with its owner's username
pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state.posts.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Get a post by ID
pub async fn get_post(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let post_id = path.into_inner();

    match state.posts.get_post(post_id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound("Content not found".to_string())),
    }
}

/// Edit a post the caller owns
pub async fn update_post(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let post_id = path.into_inner();

    state
        .posts
        .update_post(post_id, user_id.0, &req.caption, req.image.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Content updated successfully",
    })))
}

/// Delete a post the caller owns
pub async fn delete_post(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();

    // Someone else's post is indistinguishable from a missing one
    if !state.posts.delete_post(post_id, user_id.0).await? {
        return Err(AppError::NotFound("Content not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Content deleted successfully",
    })))
}
