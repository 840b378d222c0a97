//! LLM text-generation seam.
//!
//! The rest of the crate only sees the [`Summarizer`] capability; the
//! blocking OpenAI adapter lives in [`openai`] and tests substitute their own
//! implementations.

use thiserror::Error;

pub mod openai;

pub use openai::OpenAiClient;

/// Errors from the LLM transport.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response contained no choices")]
    EmptyResponse,
}

/// Text-generation capability: given an instruction and a target text,
/// return the model's response.
///
/// Calls are synchronous; one request is outstanding at a time and blocking
/// is simply call latency. Failures are not recovered here — they propagate
/// to the top-level session handler.
pub trait Summarizer {
    fn complete(&self, instruction: &str, text: &str) -> Result<String, LlmError>;
}
