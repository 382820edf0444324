//! Report View: renders an `AnalysisResult` and runs "simulate adding this
//! skill" re-estimations, at most one at a time.

pub mod render;

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use tracing::debug;

use crate::analysis::{AnalysisClient, AnalysisResult};
use crate::errors::AppError;

#[derive(Debug)]
pub enum SkillOutcome {
    /// The model returned a complete replacement result.
    Updated(AnalysisResult),
    /// Nothing was dispatched (busy, blank skill, or no result on screen).
    Skipped,
    /// The call failed; the displayed result must stay as it was.
    Failed(AppError),
}

/// Owns the busy flag. Single-threaded by construction (`Rc<Cell>`), matching
/// the cooperative event loop that drives it.
pub struct ReportView {
    client: AnalysisClient,
    busy: Rc<Cell<bool>>,
}

impl ReportView {
    pub fn new(client: AnalysisClient) -> Self {
        Self {
            client,
            busy: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Re-estimates `current` with `skill` added. The busy flag is taken when
    /// this is called, not when the future is first polled, and is held until
    /// the future completes or is dropped. A call made while another update is
    /// outstanding resolves to `Skipped` without touching the model.
    ///
    /// The future owns everything it needs, so the caller may keep rendering
    /// `current` while it runs.
    pub fn simulate_skill(
        &self,
        current: &AnalysisResult,
        skill: &str,
    ) -> impl Future<Output = SkillOutcome> + 'static {
        let skill = skill.trim().to_string();
        let guard = if skill.is_empty() {
            None
        } else {
            let guard = BusyGuard::acquire(&self.busy);
            if guard.is_none() {
                debug!("Re-estimation already in flight; ignoring '{skill}'");
            }
            guard
        };
        let client = self.client.clone();
        let current = current.clone();

        async move {
            let Some(_guard) = guard else {
                return SkillOutcome::Skipped;
            };
            match client.reestimate_with_skill(&current, &skill).await {
                Ok(updated) => SkillOutcome::Updated(updated),
                Err(e) => SkillOutcome::Failed(AppError::Reestimation(e)),
            }
        }
    }

    pub fn render(&self, result: &AnalysisResult) -> String {
        render::render_report(result, self.is_busy())
    }
}

/// Clears the busy flag on drop, whichever way the call ends.
struct BusyGuard(Rc<Cell<bool>>);

impl BusyGuard {
    fn acquire(flag: &Rc<Cell<bool>>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(Rc::clone(flag)))
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
