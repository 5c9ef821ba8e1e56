/// Like handlers
use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    /// Owner the client believes the post has; checked against the store
    #[serde(alias = "id_user")]
    pub owner_id: Option<Uuid>,
}

/// Like a post
pub async fn like_post(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let owner = parse_like_body(&body)?;

    state.likes.like_post(user_id.0, post_id, owner).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Content liked successfully",
    })))
}

/// Owner named in a like request body.
///
/// Only an empty body names no owner; a body that does not parse is rejected.
fn parse_like_body(body: &[u8]) -> Result<Option<Uuid>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice::<LikeRequest>(body)
        .map(|req| req.owner_id)
        .map_err(|e| {
            tracing::debug!(error = %e, "rejecting like request body");
            AppError::BadRequest("Invalid post owner".to_string())
        })
}

/// Number of likes on a post, as a bare integer
pub async fn get_like_count(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let count = state.likes.like_count(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(count))
}
