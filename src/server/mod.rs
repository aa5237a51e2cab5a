pub mod cors;
pub mod handlers;

use crate::analyzer::AnalysisPipeline;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnalysisPipeline>,
}

impl AppState {
    pub fn new(pipeline: AnalysisPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route(
            "/api/analyze",
            post(handlers::analyze)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(state);

    cors::with_cors(router).layer(TraceLayer::new_for_http())
}
