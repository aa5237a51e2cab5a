use crate::model::{ProviderError, ResearchResult};
use serde_json::Value;

/// Generative-AI backend used by the analysis pipeline.
#[async_trait::async_trait]
pub trait AiProvider: Send + Sync {
    /// Free-text generation with search grounding enabled.
    async fn research(&self, prompt: &str) -> Result<ResearchResult, ProviderError>;

    /// Schema-constrained generation. Returns the decoded JSON object.
    async fn extract(&self, prompt: &str, schema: &Value) -> Result<Value, ProviderError>;
}
