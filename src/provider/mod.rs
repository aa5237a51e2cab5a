// Provider module: the AI backend seam and its Gemini implementation.

pub mod gemini;
pub mod traits;

#[cfg(test)]
pub mod stub;

pub use gemini::GeminiProvider;
pub use traits::AiProvider;
