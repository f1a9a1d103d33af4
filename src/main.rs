use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use plantai_backend::config::AppConfig;
use plantai_backend::server::{create_router, AppState};
use plantai_backend::services::GeminiClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting PlantAI backend...");

    // Load configuration once; no runtime reconfiguration
    let config = AppConfig::from_env();
    if config.gemini_api_key.is_none() {
        log::warn!(
            "⚠️ GEMINI_API_KEY not set, diagnosis requests without a key header will use the heuristic fallback"
        );
    }

    let gemini = GeminiClient::new(config.gemini_model.clone(), config.gemini_api_url.clone())?;
    log::info!(
        "✅ Gemini client initialized with model: {}",
        config.gemini_model
    );

    let addr = config.bind_addr.clone();
    let state = Arc::new(AppState { config, gemini });
    let app = create_router(state);

    log::info!("🌐 Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
