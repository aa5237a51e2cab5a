mod analyzer;
mod config;
mod model;
mod provider;
mod server;
mod utils;

use analyzer::AnalysisPipeline;
use config::{load_config, AppConfig};
use provider::{AiProvider, GeminiProvider};
use server::{build_router, AppState};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("topic_analyzer=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    // Load configuration from file and environment
    let config: AppConfig = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let gemini = match GeminiProvider::new(&config) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to initialize Gemini client: {}", e);
            return;
        }
    };
    info!("Using model {}", gemini.model());

    let provider: Arc<dyn AiProvider> = Arc::new(gemini);
    let pipeline = AnalysisPipeline::new(provider, &config);
    let app = build_router(AppState::new(pipeline));

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    info!("Server running at http://{}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl-C received, shutting down");
    });

    if let Err(e) = server.await {
        error!("Server error: {}", e);
    }
}
