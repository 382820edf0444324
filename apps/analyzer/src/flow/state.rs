//! Flow state machine. `transition` is pure: (state, event) → state.

use crate::analysis::AnalysisResult;
use crate::input::{JobDescription, UploadedFile, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Upload,
    Analyzing,
    Results,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowState {
    pub stage: Stage,
    pub resume: Option<UploadedFile>,
    pub job_description: JobDescription,
    pub result: Option<AnalysisResult>,
    /// Banner text shown on the upload screen.
    pub error: Option<String>,
}

impl FlowState {
    /// Whether the Analyze action is enabled.
    pub fn can_analyze(&self) -> bool {
        self.stage == Stage::Upload && self.resume.is_some() && !self.job_description.is_blank()
    }
}

#[derive(Debug)]
pub enum FlowEvent {
    FileSelected(UploadedFile),
    /// Carries the message to show; the previously accepted file is kept.
    FileRejected(String),
    FileCleared,
    JobDescriptionChanged(String),
    AnalyzeRequested,
    AnalysisSucceeded(AnalysisResult),
    AnalysisFailed(String),
    /// A re-estimated result replacing the displayed one.
    ResultReplaced(AnalysisResult),
    Reset,
}

/// Applies one event. Events that make no sense in the current stage leave
/// the state untouched.
pub fn transition(state: FlowState, event: FlowEvent) -> FlowState {
    use FlowEvent::*;
    use Stage::*;

    match (state.stage, event) {
        (Upload, FileSelected(file)) => FlowState {
            resume: Some(file),
            error: None,
            ..state
        },
        (Upload, FileRejected(message)) => FlowState {
            error: Some(message),
            ..state
        },
        (Upload, FileCleared) => FlowState {
            resume: None,
            ..state
        },
        (Upload, JobDescriptionChanged(text)) => FlowState {
            job_description: JobDescription::new(text),
            ..state
        },
        (Upload, AnalyzeRequested) if state.can_analyze() => FlowState {
            stage: Analyzing,
            error: None,
            ..state
        },
        (Upload, AnalyzeRequested) => FlowState {
            error: Some(ValidationError::MissingInputs.to_string()),
            ..state
        },
        (Analyzing, AnalysisSucceeded(result)) => FlowState {
            stage: Results,
            result: Some(result),
            ..state
        },
        // File and job text survive so the user can retry as-is.
        (Analyzing, AnalysisFailed(message)) => FlowState {
            stage: Upload,
            result: None,
            error: Some(message),
            ..state
        },
        (Results, ResultReplaced(result)) => FlowState {
            result: Some(result),
            ..state
        },
        // No cancellation: a reset cannot interrupt an in-flight analysis.
        (Upload | Results, Reset) => FlowState::default(),
        (_, _) => state,
    }
}
