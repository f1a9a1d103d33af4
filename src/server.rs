//! Router assembly and shared request state.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::AppConfig;
use crate::handlers::predict;
use crate::services::GeminiClient;

pub struct AppState {
    pub config: AppConfig,
    pub gemini: GeminiClient,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Twice the configured cap, so the handler's own size check is the one
    // that produces the 413 body.
    let body_limit = ((state.config.max_image_mb * 2.0).ceil() as usize).max(1) * 1024 * 1024;
    let cors = build_cors(&state.config.allowed_origins);

    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
