use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::input::ValidationError;

pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Analysis failed. Please ensure your API key is valid and try again.";
pub const REESTIMATE_FAILED_MESSAGE: &str = "Failed to update analysis. Please try again.";

/// Application-level error type.
/// `user_message` turns any variant into the banner/alert text shown to the user.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Primary analysis call failed.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Skill re-estimation call failed.
    #[error("Re-estimation error: {0}")]
    Reestimation(#[source] AnalysisError),
}

impl AppError {
    /// Validation problems are shown verbatim; model and transport failures
    /// collapse into one generic retry message per call kind.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => {
                if let ValidationError::UnsupportedMediaType { name, detected } = e {
                    tracing::warn!(
                        "Rejected {name}: detected type {}",
                        detected.as_deref().unwrap_or("unknown")
                    );
                }
                e.to_string()
            }
            AppError::Analysis(e) => {
                tracing::error!("Analysis error: {e}");
                ANALYSIS_FAILED_MESSAGE.to_string()
            }
            AppError::Reestimation(e) => {
                tracing::error!("Re-estimation error: {e}");
                REESTIMATE_FAILED_MESSAGE.to_string()
            }
        }
    }
}
