// Route exports
pub mod account;
pub mod dashboard;
pub mod listings;

use actix_web::{web, HttpResponse, Responder};

use crate::models::{ClubCategory, HealthResponse, RaceCategory};
use crate::services::postgres;
use listings::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(listings::configure::<ClubCategory>)
            .configure(listings::configure::<RaceCategory>)
            .configure(dashboard::configure)
            .configure(account::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = postgres::health_check(&state.pool).await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
