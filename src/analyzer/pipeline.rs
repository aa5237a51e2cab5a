use crate::analyzer::prompts::PromptTemplate;
use crate::analyzer::schema::chart_data_schema;
use crate::analyzer::validation::{count_warnings, validate_chart_data};
use crate::config::{AppConfig, SOURCE_LIMIT};
use crate::model::{AnalysisRequest, AnalysisResponse, AnalyzeError, ChartData, ProviderError};
use crate::provider::AiProvider;
use crate::utils::preview;

use chrono::Utc;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout, Duration, Instant};
use tracing::{debug, error, info, warn};

/// Where a request is in its linear run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ValidatingInput,
    AwaitingResearch,
    AwaitingExtraction,
    Responding,
    FailedResponding,
}

impl Stage {
    /// Next stage on the success path; terminal stages have none.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Idle => Some(Stage::ValidatingInput),
            Stage::ValidatingInput => Some(Stage::AwaitingResearch),
            Stage::AwaitingResearch => Some(Stage::AwaitingExtraction),
            Stage::AwaitingExtraction => Some(Stage::Responding),
            Stage::Responding | Stage::FailedResponding => None,
        }
    }
}

/// Current stage of one run. Every move is logged at debug level.
struct Progress {
    stage: Stage,
}

impl Progress {
    fn start() -> Self {
        debug!(stage = ?Stage::Idle, "pipeline stage");
        Self { stage: Stage::Idle }
    }

    fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            self.move_to(next);
        }
    }

    fn fail(&mut self) {
        if self.stage != Stage::FailedResponding {
            self.move_to(Stage::FailedResponding);
        }
    }

    fn move_to(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "pipeline stage");
        self.stage = stage;
    }
}

/// Research call followed by extraction call, shared by every transport.
pub struct AnalysisPipeline {
    provider: Arc<dyn AiProvider>,
    request_timeout: Duration,
    max_sources: usize,
    validate_charts: bool,
}

impl AnalysisPipeline {
    pub fn new(provider: Arc<dyn AiProvider>, config: &AppConfig) -> Self {
        Self {
            provider,
            request_timeout: config.request_timeout(),
            max_sources: config.max_sources.min(SOURCE_LIMIT),
            validate_charts: config.validate_charts,
        }
    }

    #[cfg(test)]
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Runs the full analysis. Provider failures are logged here before being returned.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalyzeError> {
        let mut progress = Progress::start();
        progress.advance();
        let Some(topic) = request.topic() else {
            progress.fail();
            return Err(AnalyzeError::MissingTopic);
        };

        info!("Starting analysis for topic: {}", preview(topic, 80));
        match self.research_and_extract(topic, &mut progress).await {
            Ok(response) => {
                progress.advance();
                Ok(response)
            }
            Err(e) => {
                progress.fail();
                error!("Analysis failed for topic {}: {}", preview(topic, 80), e);
                Err(e.into())
            }
        }
    }

    async fn research_and_extract(
        &self,
        topic: &str,
        progress: &mut Progress,
    ) -> Result<AnalysisResponse, ProviderError> {
        let deadline = Instant::now() + self.request_timeout;

        progress.advance();
        let research_prompt = PromptTemplate::build_research_prompt(topic);
        let research = self
            .bounded(deadline, self.provider.research(&research_prompt))
            .await?;
        info!(
            "Research finished: {} chars, {} sources",
            research.text.len(),
            research.sources.len()
        );

        progress.advance();
        let extraction_prompt = PromptTemplate::build_extraction_prompt(&research.text);
        let schema = chart_data_schema();
        let raw = self
            .bounded(deadline, self.provider.extract(&extraction_prompt, &schema))
            .await?;
        let chart_data = self.decode_chart_data(raw)?;
        info!("Chart data generated: {} charts", chart_data.charts.len());

        let mut sources = research.sources;
        sources.truncate(self.max_sources);

        Ok(AnalysisResponse {
            topic: topic.to_string(),
            summary: chart_data.summary,
            key_findings: chart_data.key_findings,
            charts: chart_data.charts,
            sources,
            timestamp: Utc::now(),
        })
    }

    fn decode_chart_data(&self, raw: Value) -> Result<ChartData, ProviderError> {
        let chart_data: ChartData = serde_json::from_value(raw)
            .map_err(|e| ProviderError::InvalidResponse(format!("Chart data does not match schema: {}", e)))?;

        for warning in count_warnings(&chart_data) {
            warn!("Provider output: {}", warning);
        }
        if self.validate_charts {
            validate_chart_data(&chart_data)?;
        }
        Ok(chart_data)
    }

    /// Awaits `call` within what is left of the request budget.
    async fn bounded<T, F>(&self, deadline: Instant, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match timeout(remaining, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.request_timeout.as_secs())),
        }
    }
}
