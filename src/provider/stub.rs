// In-memory provider for tests: canned answers, recorded prompts.
use crate::model::{ProviderError, ResearchResult, SourceReference};
use crate::provider::traits::AiProvider;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

pub enum Reply<T> {
    Ok(T),
    Fail(fn() -> ProviderError),
    Hang,
}

pub struct StubProvider {
    research: Reply<ResearchResult>,
    extraction: Reply<Value>,
    pub research_prompts: Mutex<Vec<String>>,
    pub extraction_prompts: Mutex<Vec<String>>,
    extracted_at: Mutex<Option<DateTime<Utc>>>,
}

impl StubProvider {
    pub fn new(research: Reply<ResearchResult>, extraction: Reply<Value>) -> Self {
        Self {
            research,
            extraction,
            research_prompts: Mutex::new(Vec::new()),
            extraction_prompts: Mutex::new(Vec::new()),
            extracted_at: Mutex::new(None),
        }
    }

    /// Research text plus `source_count` sources, and the EV chart object.
    pub fn ev_adoption(source_count: usize) -> Self {
        let sources = (1..=source_count)
            .map(|i| SourceReference::url(format!("source-{}", i), format!("https://example.com/{}", i), None))
            .collect();
        Self::new(
            Reply::Ok(ResearchResult {
                text: "Global EV sales rose from 6.6M in 2021 to 14M in 2023.".to_string(),
                sources,
            }),
            Reply::Ok(ev_chart_object()),
        )
    }

    pub fn research_calls(&self) -> usize {
        self.research_prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn extraction_calls(&self) -> usize {
        self.extraction_prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// When the last extraction reply was handed out.
    pub fn extracted_at(&self) -> Option<DateTime<Utc>> {
        self.extracted_at.lock().ok().and_then(|t| *t)
    }
}

pub fn ev_chart_object() -> Value {
    serde_json::json!({
        "summary": "...",
        "keyFindings": ["a", "b", "c"],
        "charts": [{
            "type": "bar",
            "title": "EV Sales by Year",
            "labels": ["2021", "2022", "2023"],
            "data": [100, 150, 220]
        }]
    })
}

async fn reply<T: Clone>(reply: &Reply<T>) -> Result<T, ProviderError> {
    match reply {
        Reply::Ok(value) => Ok(value.clone()),
        Reply::Fail(make) => Err(make()),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(ProviderError::HttpError("stub hang ended".to_string()))
        }
    }
}

#[async_trait::async_trait]
impl AiProvider for StubProvider {
    async fn research(&self, prompt: &str) -> Result<ResearchResult, ProviderError> {
        if let Ok(mut prompts) = self.research_prompts.lock() {
            prompts.push(prompt.to_string());
        }
        reply(&self.research).await
    }

    async fn extract(&self, prompt: &str, _schema: &Value) -> Result<Value, ProviderError> {
        if let Ok(mut prompts) = self.extraction_prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let result = reply(&self.extraction).await;
        if let Ok(mut at) = self.extracted_at.lock() {
            *at = Some(Utc::now());
        }
        result
    }
}
