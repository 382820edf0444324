//! Analysis Client: shapes prompts/schemas and parses typed results.
//!
//! Flow: build request → `GenerativeModel::generate_content` → extract text →
//!       strip fences → parse + validate `AnalysisResult`.
//!
//! No retries and no fallbacks: every failure goes straight back to the caller.

use std::sync::Arc;

use tracing::{info, warn};

use crate::analysis::model::{response_schema, AnalysisResult};
use crate::analysis::prompts::{
    fill, ANALYZE_PROMPT_TEMPLATE, ANALYZE_TEMPERATURE, REESTIMATE_PROMPT_TEMPLATE,
};
use crate::analysis::AnalysisError;
use crate::input::MediaType;
use crate::llm_client::{strip_json_fences, GenerateContentRequest, GenerativeModel, Part};

/// Cheap to clone; all clones share one model backend.
#[derive(Clone)]
pub struct AnalysisClient {
    model: Arc<dyn GenerativeModel>,
}

impl AnalysisClient {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Scores a résumé against a job description.
    ///
    /// `resume_base64` is the full encoded file; the caller guarantees a
    /// non-blank `job_description`.
    pub async fn analyze(
        &self,
        resume_base64: &str,
        media_type: MediaType,
        job_description: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let request = build_analyze_request(resume_base64, media_type, job_description);
        let result = self.execute(&request).await.inspect_err(|e| {
            warn!("Resume analysis failed: {e}");
        })?;

        info!(
            "Analysis complete: match={}, ats={}, missing_skills={}",
            result.match_score,
            result.ats_score,
            result.missing_skills.len()
        );
        Ok(result)
    }

    /// Asks the model to re-score `current` as if `new_skill` had been added.
    ///
    /// The returned result replaces `current` wholesale. Score deltas and list
    /// edits are the model's; they are only checked, never corrected.
    pub async fn reestimate_with_skill(
        &self,
        current: &AnalysisResult,
        new_skill: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let request = build_reestimate_request(current, new_skill)?;
        let updated = self.execute(&request).await.inspect_err(|e| {
            warn!("Skill re-estimation for '{new_skill}' failed: {e}");
        })?;

        if !updated.has_matching_skill(new_skill) || updated.has_missing_skill(new_skill) {
            warn!("Re-estimation did not move '{new_skill}' into matchingSkills");
        }
        if updated.match_score < current.match_score {
            warn!(
                "Re-estimation lowered matchScore {} -> {} after adding '{new_skill}'",
                current.match_score, updated.match_score
            );
        }
        info!(
            "Re-estimated with '{}': match {} -> {}",
            new_skill, current.match_score, updated.match_score
        );
        Ok(updated)
    }

    async fn execute(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let response = self.model.generate_content(request).await?;
        let Some(text) = response.text() else {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none");
            warn!("Model returned no text (finish reason: {reason})");
            return Err(AnalysisError::EmptyResponse);
        };
        AnalysisResult::from_model_text(strip_json_fences(&text))
    }
}

fn build_analyze_request(
    resume_base64: &str,
    media_type: MediaType,
    job_description: &str,
) -> GenerateContentRequest {
    let instruction = fill(
        ANALYZE_PROMPT_TEMPLATE,
        &[("job_description", job_description)],
    );
    GenerateContentRequest::structured(
        vec![
            Part::text(instruction),
            Part::inline(media_type.mime(), resume_base64),
        ],
        response_schema(true),
        Some(ANALYZE_TEMPERATURE),
    )
}

fn build_reestimate_request(
    current: &AnalysisResult,
    new_skill: &str,
) -> Result<GenerateContentRequest, AnalysisError> {
    let current_json =
        serde_json::to_string_pretty(current).map_err(AnalysisError::EncodeCurrent)?;
    let match_score = current.match_score.to_string();
    let missing_skills = current.missing_skills.join(", ");
    let prompt = fill(
        REESTIMATE_PROMPT_TEMPLATE,
        &[
            ("skill", new_skill),
            ("match_score", match_score.as_str()),
            ("missing_skills", missing_skills.as_str()),
            ("current_json", current_json.as_str()),
        ],
    );

    Ok(GenerateContentRequest::structured(
        vec![Part::text(prompt)],
        response_schema(false),
        None,
    ))
}
