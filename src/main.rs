mod config;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use config::Settings;
use routes::listings::AppState;
use services::{DashboardRepository, ListingRepository, PhotoClient, TokenManager, UserRepository};
use models::{ClubCategory, RaceCategory};
use std::sync::Arc;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting RunGroup API service (log level: {})...", log_level);

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize photo host client
    let photos = Arc::new(PhotoClient::new(
        settings.photos.base_url.clone(),
        settings.photos.api_key.clone(),
    ));

    info!("Photo client initialized ({})", settings.photos.base_url);

    // Initialize PostgreSQL pool and run migrations
    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let pool = services::postgres::create_pool(
        &settings.database.url,
        db_max_conn,
        db_min_conn,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .unwrap_or_else(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        panic!("PostgreSQL connection error: {}", e);
    });

    info!("PostgreSQL pool initialized (max: {} connections)", db_max_conn);

    // Initialize repositories and the token manager
    let clubs = Arc::new(ListingRepository::<ClubCategory>::new(pool.clone()));
    let races = Arc::new(ListingRepository::<RaceCategory>::new(pool.clone()));
    let dashboard = Arc::new(DashboardRepository::new(pool.clone()));
    let users = Arc::new(UserRepository::new(pool.clone()));
    let tokens = Arc::new(TokenManager::new(
        &settings.auth.secret,
        settings.auth.token_ttl_secs,
    ));

    // Build application state
    let app_state = AppState {
        pool,
        photos,
        clubs,
        races,
        dashboard,
        users,
        tokens: tokens.clone(),
        auth_enforce: settings.auth.enforce,
        max_image_bytes: settings.upload.max_image_bytes,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::from(tokens.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
