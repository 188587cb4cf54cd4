use std::sync::Arc;

use axum::{Router, http::Method, routing::get};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};

use crate::server::config::ServerConfig;

pub mod error;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(pool: SqlitePool, config: Arc<ServerConfig>) -> Router {
    let app_state = Arc::new(AppState { pool, config });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(routes::bookmark_routes::create_bookmarks_router())
        .merge(routes::tag_routes::create_tags_router())
        .layer(cors)
        .with_state(app_state)
}
