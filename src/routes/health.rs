use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

/// Health check endpoint
///
/// Probes the database and reports the current status of the API. An
/// unreachable database is surfaced as a degraded 503 status rather than an
/// error response.
#[get("/health")]
pub async fn health(pool: web::Data<PgPool>) -> impl Responder {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "online",
            "database": "connected",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            log::warn!("health check database probe failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "database": "disconnected",
                "version": env!("CARGO_PKG_VERSION")
            }))
        }
    }
}
