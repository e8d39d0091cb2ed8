use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;

/// Liveness and database reachability
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "healthy",
            "database": "up"
        })),
        (status = 503, description = "Database unreachable", body = Object, example = json!({
            "status": "degraded",
            "database": "down"
        }))
    ),
    tag = "Health"
)]
pub async fn health(pool: web::Data<MySqlPool>) -> impl Responder {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(json!({"status": "healthy", "database": "up"})),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            HttpResponse::ServiceUnavailable().json(json!({"status": "degraded", "database": "down"}))
        }
    }
}
