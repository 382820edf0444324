// Résumé analysis: result model + schema, prompts, and the client that calls
// the generative model. All model calls go through llm_client.

pub mod client;
pub mod model;
pub mod prompts;

use thiserror::Error;

use crate::llm_client::LlmError;

pub use client::AnalysisClient;
pub use model::AnalysisResult;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Model returned non-JSON text: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Could not encode the current analysis for the prompt: {0}")]
    EncodeCurrent(#[source] serde_json::Error),

    #[error("Model output violates the analysis schema: {0}")]
    SchemaViolation(String),

    #[error("Generative service request failed: {0}")]
    Transport(#[from] LlmError),
}
