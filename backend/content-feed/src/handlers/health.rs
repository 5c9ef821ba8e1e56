use actix_web::{web, HttpResponse};
use sqlx::PgPool;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "content-feed",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Ready once the database answers.
pub async fn health_ready(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "ready": true })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "ready": false,
                "message": "database unavailable",
            }))
        }
    }
}

pub async fn health_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "alive": true }))
}
