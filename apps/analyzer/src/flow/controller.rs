//! Flow Controller: owns `FlowState` and drives it through `transition`.
//!
//! Flow: select file + job text → analyze (awaited) → results →
//!       simulate skills (one at a time) → reset.

use std::future::Future;
use std::path::Path;

use tracing::debug;

use crate::analysis::AnalysisClient;
use crate::errors::AppError;
use crate::flow::state::{transition, FlowEvent, FlowState, Stage};
use crate::input::{read_resume, UploadedFile};
use crate::report::{ReportView, SkillOutcome};

pub struct FlowController {
    state: FlowState,
    client: AnalysisClient,
    report: ReportView,
}

impl FlowController {
    pub fn new(client: AnalysisClient) -> Self {
        Self {
            state: FlowState::default(),
            report: ReportView::new(client.clone()),
            client,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn report(&self) -> &ReportView {
        &self.report
    }

    fn dispatch(&mut self, event: FlowEvent) {
        let before = self.state.stage;
        debug!("Flow event {} in {:?}", event_name(&event), before);
        self.state = transition(std::mem::take(&mut self.state), event);
        if self.state.stage != before {
            debug!("Flow stage {:?} -> {:?}", before, self.state.stage);
        }
    }

    /// Reads and validates a résumé from disk. Ignored outside `Upload`.
    pub async fn select_file(&mut self, path: &Path) {
        if self.state.stage != Stage::Upload {
            return;
        }
        let outcome = read_resume(path).await;
        self.accept_file(outcome);
    }

    /// Same as `select_file`, for a résumé given as a base64 data URL. The
    /// file is named after its media type, e.g. `resume.pdf`.
    pub fn select_data_url(&mut self, url: &str) {
        if self.state.stage != Stage::Upload {
            return;
        }
        self.accept_file(UploadedFile::from_unnamed_data_url(url));
    }

    fn accept_file(&mut self, outcome: Result<UploadedFile, crate::input::ValidationError>) {
        match outcome {
            Ok(file) => self.dispatch(FlowEvent::FileSelected(file)),
            Err(e) => {
                let message = AppError::from(e).user_message();
                self.dispatch(FlowEvent::FileRejected(message));
            }
        }
    }

    pub fn clear_file(&mut self) {
        self.dispatch(FlowEvent::FileCleared);
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.dispatch(FlowEvent::JobDescriptionChanged(text.into()));
    }

    /// Runs the primary analysis. The model is only called when both inputs
    /// are present; otherwise the state just picks up a validation message.
    pub async fn analyze(&mut self) {
        self.dispatch(FlowEvent::AnalyzeRequested);
        if self.state.stage != Stage::Analyzing {
            return;
        }

        let outcome = match self.state.resume.as_ref() {
            Some(resume) => {
                self.client
                    .analyze(
                        resume.data(),
                        resume.media_type(),
                        self.state.job_description.as_str(),
                    )
                    .await
            }
            None => return,
        };

        match outcome {
            Ok(result) => self.dispatch(FlowEvent::AnalysisSucceeded(result)),
            Err(e) => {
                let message = AppError::from(e).user_message();
                self.dispatch(FlowEvent::AnalysisFailed(message));
            }
        }
    }

    /// Starts re-estimating the displayed result with `skill` added. `None`
    /// when there is no result on screen.
    ///
    /// The returned future does not borrow the controller, so the screen can
    /// still be read while it runs. Pass its outcome to `apply_skill_outcome`.
    pub fn begin_skill_update(
        &self,
        skill: &str,
    ) -> Option<impl Future<Output = SkillOutcome> + 'static> {
        let current = self.state.result.as_ref()?;
        Some(self.report.simulate_skill(current, skill))
    }

    /// Replaces the displayed result on success. On failure the current
    /// result stays on screen and the outcome carries the alert.
    pub fn apply_skill_outcome(&mut self, outcome: SkillOutcome) -> SkillOutcome {
        if let SkillOutcome::Updated(updated) = &outcome {
            self.dispatch(FlowEvent::ResultReplaced(updated.clone()));
        }
        outcome
    }

    /// `begin_skill_update` and `apply_skill_outcome` in one step.
    pub async fn simulate_skill(&mut self, skill: &str) -> SkillOutcome {
        let Some(update) = self.begin_skill_update(skill) else {
            return SkillOutcome::Skipped;
        };
        let outcome = update.await;
        self.apply_skill_outcome(outcome)
    }

    pub fn reset(&mut self) {
        self.dispatch(FlowEvent::Reset);
    }
}

fn event_name(event: &FlowEvent) -> &'static str {
    match event {
        FlowEvent::FileSelected(_) => "FileSelected",
        FlowEvent::FileRejected(_) => "FileRejected",
        FlowEvent::FileCleared => "FileCleared",
        FlowEvent::JobDescriptionChanged(_) => "JobDescriptionChanged",
        FlowEvent::AnalyzeRequested => "AnalyzeRequested",
        FlowEvent::AnalysisSucceeded(_) => "AnalysisSucceeded",
        FlowEvent::AnalysisFailed(_) => "AnalysisFailed",
        FlowEvent::ResultReplaced(_) => "ResultReplaced",
        FlowEvent::Reset => "Reset",
    }
}
