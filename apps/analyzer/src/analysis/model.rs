//! The analysis report and the output schema the model is constrained to.
//! Both live here so field names cannot drift apart.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::analysis::AnalysisError;

pub const MAX_SCORE: u32 = 100;

/// Structured résumé-vs-job report. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub match_score: u32,
    pub ats_score: u32,
    pub summary: String,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommended_actions: Vec<String>,
}

enum FieldKind {
    Score,
    Text,
    List,
}

/// (wire name, kind, description) for every field of `AnalysisResult`.
const FIELDS: [(&str, FieldKind, &str); 8] = [
    (
        "matchScore",
        FieldKind::Score,
        "A score from 0 to 100 indicating how well the resume matches the job description.",
    ),
    (
        "atsScore",
        FieldKind::Score,
        "A score from 0 to 100 indicating how ATS-friendly the resume formatting and keyword usage is.",
    ),
    (
        "summary",
        FieldKind::Text,
        "A brief executive summary of the analysis (max 2 sentences).",
    ),
    (
        "matchingSkills",
        FieldKind::List,
        "List of hard and soft skills found in both the resume and job description.",
    ),
    (
        "missingSkills",
        FieldKind::List,
        "Critical skills mentioned in the job description that are missing or weak in the resume.",
    ),
    (
        "strengths",
        FieldKind::List,
        "Key strong points of the candidate.",
    ),
    (
        "weaknesses",
        FieldKind::List,
        "Areas where the candidate falls short compared to the requirements.",
    ),
    (
        "recommendedActions",
        FieldKind::List,
        "Specific, actionable advice to improve the resume for this specific job.",
    ),
];

/// Builds the Gemini response schema. The primary analysis marks every field
/// required and carries descriptions; the re-estimation schema is bare.
pub fn response_schema(strict: bool) -> Value {
    let mut properties = Map::new();
    for (name, kind, description) in FIELDS {
        let mut prop = match kind {
            FieldKind::Score => json!({"type": "INTEGER"}),
            FieldKind::Text => json!({"type": "STRING"}),
            FieldKind::List => json!({"type": "ARRAY", "items": {"type": "STRING"}}),
        };
        if strict {
            prop["description"] = Value::String(description.to_string());
        }
        properties.insert(name.to_string(), prop);
    }

    let mut schema = json!({
        "type": "OBJECT",
        "properties": Value::Object(properties),
    });
    if strict {
        schema["required"] = json!(FIELDS.iter().map(|(name, _, _)| *name).collect::<Vec<_>>());
    }
    schema
}

impl AnalysisResult {
    /// Parses model output. Non-JSON text and JSON that does not satisfy the
    /// schema are distinct failures; nothing is defaulted.
    pub fn from_model_text(text: &str) -> Result<Self, AnalysisError> {
        let value: Value = serde_json::from_str(text).map_err(AnalysisError::InvalidJson)?;
        let result: AnalysisResult = serde_json::from_value(value)
            .map_err(|e| AnalysisError::SchemaViolation(e.to_string()))?;
        result.validate()?;
        Ok(result)
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        for (name, score) in [("matchScore", self.match_score), ("atsScore", self.ats_score)] {
            if score > MAX_SCORE {
                return Err(AnalysisError::SchemaViolation(format!(
                    "{name} must be within 0..={MAX_SCORE}, got {score}"
                )));
            }
        }
        Ok(())
    }

    pub fn has_matching_skill(&self, skill: &str) -> bool {
        contains_skill(&self.matching_skills, skill)
    }

    pub fn has_missing_skill(&self, skill: &str) -> bool {
        contains_skill(&self.missing_skills, skill)
    }
}

fn contains_skill(list: &[String], skill: &str) -> bool {
    let skill = skill.trim();
    list.iter().any(|s| s.trim().eq_ignore_ascii_case(skill))
}
