//! Plain-text rendering of an analysis report.
//!
//! Every section is drawn from one `&AnalysisResult` snapshot, so scores,
//! skill lists, and the action plan always come from the same result.

use std::fmt::Write;

use crate::analysis::model::MAX_SCORE;
use crate::analysis::AnalysisResult;

const GAUGE_WIDTH: usize = 20;
pub const BUSY_BANNER: &str = "Re-calibrating Score...";
pub const NO_MISSING_SKILLS: &str = "No critical skills missing!";

/// `Match Score   [█████████████░░░░░░░]  68/100`
pub fn score_gauge(label: &str, score: u32) -> String {
    let score = score.min(MAX_SCORE);
    let filled = (score as usize * GAUGE_WIDTH + 50) / MAX_SCORE as usize;
    format!(
        "{label:<13} [{}{}] {score:>3}/{MAX_SCORE}",
        "█".repeat(filled),
        "░".repeat(GAUGE_WIDTH - filled)
    )
}

pub fn render_report(result: &AnalysisResult, busy: bool) -> String {
    let mut out = String::new();

    // writeln! into a String cannot fail.
    let _ = writeln!(out, "== Analysis Complete ==");
    let _ = writeln!(out, "{}", result.summary);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", score_gauge("Match Score", result.match_score));
    let _ = writeln!(out, "{}", score_gauge("ATS Friendly", result.ats_score));

    section(&mut out, "Matching Skills");
    if result.matching_skills.is_empty() {
        let _ = writeln!(out, "  (none)");
    } else {
        let _ = writeln!(out, "  {}", result.matching_skills.join(" · "));
    }

    section(&mut out, "Missing Skills (add <n> to simulate adding)");
    if busy {
        let _ = writeln!(out, "  {BUSY_BANNER}");
    }
    if result.missing_skills.is_empty() {
        let _ = writeln!(out, "  {NO_MISSING_SKILLS}");
    } else {
        for (i, skill) in result.missing_skills.iter().enumerate() {
            let _ = writeln!(out, "  [{}] + {skill}", i + 1);
        }
    }

    section(&mut out, "Strong Points");
    bullets(&mut out, &result.strengths);

    section(&mut out, "Areas for Improvement");
    bullets(&mut out, &result.weaknesses);

    section(&mut out, "Action Plan");
    for (i, action) in result.recommended_actions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {action}", i + 1);
    }

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "-- {title} --");
}

fn bullets(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "  | {item}");
    }
}
