use crate::config::AppConfig;
use crate::model::{ProviderError, ResearchResult, SourceReference};
use crate::provider::traits::AiProvider;
use crate::utils::preview;

use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the Gemini `generateContent` API.
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiProvider {
    pub fn new(config: &AppConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProviderError::HttpError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout_secs: config.request_timeout_seconds,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn research_body(prompt: &str) -> Value {
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "tools": [{ "google_search": {} }],
        })
    }

    fn extract_body(prompt: &str, schema: &Value) -> Value {
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        })
    }

    async fn generate(&self, body: &Value) -> Result<Value, ProviderError> {
        let url = self.endpoint_url();
        debug!(model = self.model.as_str(), "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::HttpError(format!("Request to Gemini failed: {}", e))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            warn!("Gemini responded [{}]: {}", status, preview(&text, 300));
            return Err(Self::map_http_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| ProviderError::InvalidResponse(format!("Invalid JSON in response: {}", e)))
    }

    fn map_http_error(status: u16, body: &str) -> ProviderError {
        match status {
            401 | 403 => ProviderError::AuthFailed,
            429 => ProviderError::RateLimited,
            _ => ProviderError::ApiError {
                status,
                body: preview(body, 500),
            },
        }
    }

    fn first_candidate(body: &Value) -> Result<&Value, ProviderError> {
        let candidates = body["candidates"]
            .as_array()
            .ok_or_else(|| ProviderError::InvalidResponse("Missing 'candidates' array".to_string()))?;
        candidates
            .first()
            .ok_or_else(|| ProviderError::InvalidResponse("Empty 'candidates' array".to_string()))
    }

    /// Joins the candidate's text parts, skipping thought summaries.
    fn parse_text(body: &Value) -> Result<String, ProviderError> {
        let candidate = Self::first_candidate(body)?;
        let parts = match candidate["content"]["parts"].as_array() {
            Some(parts) => parts,
            None => {
                let reason = candidate["finishReason"].as_str().unwrap_or("unknown");
                return Err(ProviderError::InvalidResponse(format!(
                    "Candidate has no content parts (finishReason: {})",
                    reason
                )));
            }
        };

        Ok(parts
            .iter()
            .filter(|p| !p["thought"].as_bool().unwrap_or(false))
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join(""))
    }

    /// Collects web grounding chunks as source references, dropping repeated URLs.
    fn parse_sources(body: &Value) -> Vec<SourceReference> {
        let chunks = match body["candidates"][0]["groundingMetadata"]["groundingChunks"].as_array() {
            Some(chunks) => chunks,
            None => return Vec::new(),
        };

        let mut seen = HashSet::new();
        let mut sources = Vec::new();
        for chunk in chunks {
            let web = &chunk["web"];
            let Some(uri) = web["uri"].as_str() else {
                continue;
            };
            if !seen.insert(uri.to_string()) {
                continue;
            }
            let title = web["title"].as_str().map(|t| t.to_string());
            let id = format!("source-{}", sources.len() + 1);
            sources.push(SourceReference::url(id, uri, title));
        }
        sources
    }
}

#[async_trait::async_trait]
impl AiProvider for GeminiProvider {
    async fn research(&self, prompt: &str) -> Result<ResearchResult, ProviderError> {
        let body = self.generate(&Self::research_body(prompt)).await?;
        let text = Self::parse_text(&body)?;
        let sources = Self::parse_sources(&body);
        debug!("Research returned {} chars and {} sources", text.len(), sources.len());
        Ok(ResearchResult { text, sources })
    }

    async fn extract(&self, prompt: &str, schema: &Value) -> Result<Value, ProviderError> {
        let body = self.generate(&Self::extract_body(prompt, schema)).await?;
        let text = Self::parse_text(&body)?;
        if text.trim().is_empty() {
            return Err(ProviderError::InvalidResponse("Extraction returned no text".to_string()));
        }
        serde_json::from_str(&text).map_err(|e| {
            ProviderError::InvalidResponse(format!("Extraction output is not JSON: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiProvider {
        let config = AppConfig {
            api_key: "test-key".to_string(),
            base_url: "https://example.test/v1beta/".to_string(),
            ..AppConfig::default()
        };
        GeminiProvider::new(&config).unwrap()
    }

    #[test]
    fn endpoint_url_uses_model() {
        let p = provider();
        assert_eq!(
            p.endpoint_url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!p.endpoint_url().contains("test-key"));
    }

    #[test]
    fn research_body_enables_search() {
        let body = GeminiProvider::research_body("find EV data");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "find EV data");
        assert!(body["tools"][0]["google_search"].is_object());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn extract_body_carries_schema() {
        let schema = json!({ "type": "OBJECT" });
        let body = GeminiProvider::extract_body("structure this", &schema);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn parse_text_joins_parts_and_skips_thoughts() {
        let body = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "EV sales grew " },
                    { "text": "35% in 2023." }
                ]},
                "finishReason": "STOP"
            }]
        });
        assert_eq!(GeminiProvider::parse_text(&body).unwrap(), "EV sales grew 35% in 2023.");
    }

    #[test]
    fn parse_text_rejects_missing_candidates() {
        let err = GeminiProvider::parse_text(&json!({})).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));

        let err = GeminiProvider::parse_text(&json!({ "candidates": [] })).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[test]
    fn parse_text_reports_finish_reason_without_parts() {
        let body = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        match GeminiProvider::parse_text(&body) {
            Err(ProviderError::InvalidResponse(msg)) => assert!(msg.contains("SAFETY")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn parse_sources_reads_grounding_chunks() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "x" }] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://iea.org/ev", "title": "iea.org" } },
                    { "web": { "uri": "https://iea.org/ev", "title": "iea.org" } },
                    { "retrievedContext": {} },
                    { "web": { "uri": "https://ev-volumes.com" } }
                ]}
            }]
        });
        let sources = GeminiProvider::parse_sources(&body);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].id, "source-1");
        assert_eq!(sources[0].url, "https://iea.org/ev");
        assert_eq!(sources[0].title.as_deref(), Some("iea.org"));
        assert_eq!(sources[1].id, "source-2");
        assert_eq!(sources[1].title, None);
        assert_eq!(sources[1].source_type, "url");
    }

    #[test]
    fn parse_sources_without_grounding_is_empty() {
        let body = json!({ "candidates": [{ "content": { "parts": [{ "text": "x" }] } }] });
        assert!(GeminiProvider::parse_sources(&body).is_empty());
    }

    #[test]
    fn http_errors_are_mapped() {
        assert!(matches!(GeminiProvider::map_http_error(401, ""), ProviderError::AuthFailed));
        assert!(matches!(GeminiProvider::map_http_error(403, ""), ProviderError::AuthFailed));
        assert!(matches!(GeminiProvider::map_http_error(429, ""), ProviderError::RateLimited));
        match GeminiProvider::map_http_error(500, "boom") {
            ProviderError::ApiError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
