use crate::model::{AnalysisRequest, AnalysisResponse, AnalyzeError};
use crate::server::AppState;
use crate::utils::iso_timestamp;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

pub const MISSING_TOPIC_MESSAGE: &str = "請提供研究主題";
pub const ANALYSIS_FAILED_MESSAGE: &str = "分析過程發生錯誤，請稍後再試";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

#[derive(Serialize)]
struct SuccessEnvelope {
    success: bool,
    data: AnalysisResponse,
}

#[derive(Serialize)]
struct FailureEnvelope {
    success: bool,
    error: &'static str,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    timestamp: String,
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        match self {
            AnalyzeError::MissingTopic => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody { error: MISSING_TOPIC_MESSAGE }),
            )
                .into_response(),
            // Details were logged by the pipeline; callers only get the generic message.
            AnalyzeError::Provider(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FailureEnvelope { success: false, error: ANALYSIS_FAILED_MESSAGE }),
            )
                .into_response(),
        }
    }
}

/// POST /api/analyze
pub async fn analyze(State(state): State<AppState>, body: Bytes) -> Response {
    // An unreadable body is treated like one without a topic.
    let request: AnalysisRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Ignoring undecodable analyze body: {}", e);
            AnalysisRequest::default()
        }
    };

    match state.pipeline.run(&request).await {
        Ok(data) => Json(SuccessEnvelope { success: true, data }).into_response(),
        Err(e) => e.into_response(),
    }
}

/// OPTIONS /api/analyze
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody { error: METHOD_NOT_ALLOWED_MESSAGE }),
    )
        .into_response()
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(Health {
        status: "OK",
        timestamp: iso_timestamp(&Utc::now()),
    })
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: "Not found" })).into_response()
}
