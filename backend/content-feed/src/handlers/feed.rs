use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::handlers::AppState;
use crate::services::parse_page;

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    /// Kept raw so that malformed values fall back to page 1
    pub page: Option<String>,
}

/// `GET /content/feed?page=N`
pub async fn get_feed(
    query: web::Query<FeedQueryParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let page = parse_page(query.page.as_deref());
    debug!(page, raw = ?query.page, "feed request");

    let feed = state.feed.page(page).await?;
    Ok(HttpResponse::Ok().json(feed))
}
