// Core structs: AnalysisRequest, ChartSpec, AnalysisResponse and the error types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub topic: Option<String>,
}

impl AnalysisRequest {
    /// Returns the topic when present and non-empty. Whitespace is kept as sent.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref().filter(|t| !t.is_empty())
    }
}

/// A citation returned by the research call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReference {
    pub source_type: String,
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SourceReference {
    pub fn url(id: impl Into<String>, url: impl Into<String>, title: Option<String>) -> Self {
        Self {
            source_type: "url".to_string(),
            id: id.into(),
            url: url.into(),
            title,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResearchResult {
    pub text: String,
    pub sources: Vec<SourceReference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Doughnut,
}

impl ChartType {
    pub const ALL: [ChartType; 4] = [ChartType::Bar, ChartType::Line, ChartType::Pie, ChartType::Doughnut];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Doughnut => "doughnut",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub title: String,
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Object produced by the extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub summary: String,
    pub key_findings: Vec<String>,
    pub charts: Vec<ChartSpec>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub topic: String,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub charts: Vec<ChartSpec>,
    pub sources: Vec<SourceReference>,
    #[serde(serialize_with = "crate::utils::serialize_iso")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("provider rejected credentials")]
    AuthFailed,

    #[error("provider rate limit reached")]
    RateLimited,

    #[error("provider returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("provider output violates schema: {0}")]
    SchemaViolation(String),

    #[error("provider call timed out after {0} seconds")]
    Timeout(u64),
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("topic is missing or empty")]
    MissingTopic,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
