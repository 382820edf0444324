// Prompt text for the analysis and skill re-estimation calls.

/// Primary analysis instruction. Fill `{job_description}` before sending;
/// the résumé travels as an inline file part right after this text.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"You are an expert HR Resume Analyzer and ATS (Applicant Tracking System) specialist.
Analyze the provided resume against the job description below.
Be critical but constructive.

JOB DESCRIPTION:
{job_description}

Analyze the attached resume file."#;

/// Low temperature keeps scores repeatable for similar inputs.
pub const ANALYZE_TEMPERATURE: f32 = 0.2;

/// Hypothetical skill addition. Placeholders: {skill}, {match_score},
/// {missing_skills}, {current_json}
pub const REESTIMATE_PROMPT_TEMPLATE: &str = r#"The user wants to update their resume to include the skill: "{skill}".

Current Analysis Status:
- Match Score: {match_score}
- Missing Skills: {missing_skills}

Full current analysis (JSON):
{current_json}

Assume the user effectively adds "{skill}" to their resume.
Re-calculate the scores and update the lists.
Remove "{skill}" from missingSkills and add it to matchingSkills.
Increase the matchScore appropriately (usually by 5-10 points depending on relevance).
Keep the summary mostly the same but mention the improvement.
Return every field of the analysis, including the ones that did not change."#;

/// Substitutes `{name}` placeholders in a single left-to-right pass.
/// Inserted values are never rescanned, so user or model text containing
/// `{skill}` and the like passes through untouched. Unknown placeholders are
/// left as written.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_every_occurrence() {
        let text = fill("{a} and {a}, then {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(text, "x and x, then y");
    }

    #[test]
    fn test_fill_does_not_rescan_inserted_values() {
        let text = fill("{first}|{second}", &[("first", "{second}"), ("second", "2")]);
        assert_eq!(text, "{second}|2");
    }

    #[test]
    fn test_fill_keeps_unknown_and_unclosed_braces() {
        let text = fill("{\"k\": {unknown}} {open", &[("k", "v")]);
        assert_eq!(text, "{\"k\": {unknown}} {open");
    }

    #[test]
    fn test_reestimate_template_names_every_placeholder() {
        for key in ["{skill}", "{match_score}", "{missing_skills}", "{current_json}"] {
            assert!(REESTIMATE_PROMPT_TEMPLATE.contains(key), "missing {key}");
        }
    }
}
