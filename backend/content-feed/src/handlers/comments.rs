/// Comment handlers
use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub comment: String,
}

/// Comment on a post
pub async fn create_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();

    state
        .comments
        .create_comment(user_id.0, post_id, &req.comment)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Comment created successfully",
    })))
}

/// Comments on a post, newest first
pub async fn get_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = state.comments.get_post_comments(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}
