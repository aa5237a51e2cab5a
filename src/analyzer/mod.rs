// Analyzer module: prompts, extraction schema, output checks and the two-step pipeline.

pub mod pipeline;
pub mod prompts;
pub mod schema;
pub mod validation;

// Re-export the pipeline for ease of use.
pub use pipeline::AnalysisPipeline;
