//! Terminal front-end: an interactive shell over `FlowController`, plus a
//! one-shot batch mode for scripted use.

pub mod commands;

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::warn;

use crate::analysis::AnalysisResult;
use crate::flow::{FlowController, FlowState, Stage};
use crate::llm_client::MODEL;
use crate::report::SkillOutcome;
use crate::ui::commands::{parse_command, Command, HELP};

#[derive(Debug, Parser)]
#[command(
    name = "resume-analyzer",
    version,
    about = "Score a resume against a job description and explore skill gaps"
)]
pub struct Args {
    /// Resume to analyze: a PDF/TXT/PNG/JPEG/WebP path or a base64 data URL
    #[arg(long)]
    pub resume: Option<String>,

    /// File holding the job description text
    #[arg(long, value_name = "PATH")]
    pub job_file: Option<PathBuf>,

    /// Skill to simulate adding after the analysis (repeatable, batch mode only)
    #[arg(long = "simulate", value_name = "SKILL")]
    pub simulate: Vec<String>,

    /// Print results as JSON instead of the formatted report
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Batch mode runs when both inputs are supplied on the command line.
    pub fn is_batch(&self) -> bool {
        self.resume.is_some() && self.job_file.is_some()
    }
}

/// Runs the whole flow without prompting and prints the final result.
pub async fn run_batch<W: Write>(
    controller: &mut FlowController,
    args: &Args,
    out: &mut W,
) -> Result<()> {
    let (Some(resume), Some(job_file)) = (&args.resume, &args.job_file) else {
        bail!("batch mode needs both --resume and --job-file");
    };

    load_resume(controller, resume).await;
    if let Some(error) = &controller.state().error {
        bail!("{error}");
    }
    controller.set_job_description(read_job_file(job_file).await?);

    controller.analyze().await;
    if controller.state().stage != Stage::Results {
        let error = controller.state().error.clone().unwrap_or_default();
        bail!("{error}");
    }

    for skill in &args.simulate {
        match controller.simulate_skill(skill).await {
            SkillOutcome::Updated(_) => {}
            SkillOutcome::Skipped => warn!("Skipped simulating '{skill}'"),
            SkillOutcome::Failed(e) => eprintln!("{}", e.user_message()),
        }
    }

    if let Some(result) = &controller.state().result {
        print_result(controller, result, out, args.json)?;
    }
    Ok(())
}

/// Interactive shell on stdin/stdout.
pub async fn run_interactive(controller: &mut FlowController, args: &Args) -> Result<()> {
    if let Some(resume) = &args.resume {
        load_resume(controller, resume).await;
    }
    if let Some(job_file) = &args.job_file {
        controller.set_job_description(read_job_file(job_file).await?);
    }

    let mut out = std::io::stdout();
    writeln!(out, "ResumeAI · Powered by {MODEL}")?;
    writeln!(out, "{HELP}")?;
    print_screen(controller, &mut out, args.json)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    run_shell(controller, &mut lines, &mut out, args.json).await
}

type PendingUpdate = Pin<Box<dyn Future<Output = SkillOutcome>>>;

enum Input {
    Line(Option<String>),
    Updated(SkillOutcome),
}

/// Command loop. Analysis is awaited before the next line is read; a skill
/// update is not. While one is pending the loop keeps reading, so the previous
/// result can still be shown and further `add`s hit the busy flag.
pub async fn run_shell<R, W>(
    controller: &mut FlowController,
    lines: &mut Lines<R>,
    out: &mut W,
    json: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut pending: Option<PendingUpdate> = None;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let input = match pending.as_mut() {
            Some(update) => tokio::select! {
                outcome = update => Input::Updated(outcome),
                line = lines.next_line() => Input::Line(line?),
            },
            None => Input::Line(lines.next_line().await?),
        };
        let line = match input {
            Input::Updated(outcome) => {
                pending = None;
                writeln!(out)?;
                show_skill_outcome(controller, outcome, out, json)?;
                continue;
            }
            Input::Line(Some(line)) => line,
            Input::Line(None) => break,
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Show => print_screen(controller, out, json)?,
            Command::Json => match &controller.state().result {
                Some(result) => writeln!(out, "{}", serde_json::to_string_pretty(result)?)?,
                None => writeln!(out, "No analysis yet.")?,
            },
            Command::Resume(arg) => {
                if upload_only(controller, out)? {
                    load_resume(controller, &arg).await;
                    print_screen(controller, out, json)?;
                }
            }
            Command::Remove => {
                if upload_only(controller, out)? {
                    controller.clear_file();
                    print_screen(controller, out, json)?;
                }
            }
            Command::Job => {
                if upload_only(controller, out)? {
                    writeln!(
                        out,
                        "Paste the job description; finish with a line containing only '.'"
                    )?;
                    let text = read_block(lines).await?;
                    controller.set_job_description(text);
                    print_screen(controller, out, json)?;
                }
            }
            Command::JobFile(path) => {
                if upload_only(controller, out)? {
                    match read_job_file(&path).await {
                        Ok(text) => controller.set_job_description(text),
                        Err(e) => writeln!(out, "{e:#}")?,
                    }
                    print_screen(controller, out, json)?;
                }
            }
            Command::Analyze => {
                if controller.state().can_analyze() {
                    writeln!(out, "Analyzing Profile")?;
                    writeln!(out, "Comparing skills against market requirements...")?;
                }
                controller.analyze().await;
                print_screen(controller, out, json)?;
            }
            Command::Add(skill_ref) => {
                let Some(result) = &controller.state().result else {
                    writeln!(out, "Run an analysis first.")?;
                    continue;
                };
                let Some(skill) = skill_ref.resolve(result) else {
                    writeln!(out, "No missing skill with that number.")?;
                    continue;
                };
                let Some(update) = controller.begin_skill_update(&skill) else {
                    continue;
                };
                if pending.is_some() {
                    // Busy flag is held, so this resolves at once without a call.
                    let outcome = update.await;
                    show_skill_outcome(controller, outcome, out, json)?;
                } else {
                    pending = Some(Box::pin(update));
                    print_screen(controller, out, json)?;
                }
            }
            Command::Reset => {
                if controller.state().stage == Stage::Analyzing {
                    writeln!(out, "Please wait for the analysis to finish.")?;
                } else if pending.is_some() {
                    writeln!(out, "Please wait for the score update to finish.")?;
                } else {
                    controller.reset();
                    print_screen(controller, out, json)?;
                }
            }
        }
    }

    if let Some(update) = pending {
        let outcome = update.await;
        show_skill_outcome(controller, outcome, out, json)?;
    }
    Ok(())
}

fn show_skill_outcome<W: Write>(
    controller: &mut FlowController,
    outcome: SkillOutcome,
    out: &mut W,
    json: bool,
) -> Result<()> {
    match controller.apply_skill_outcome(outcome) {
        SkillOutcome::Updated(_) => print_screen(controller, out, json)?,
        SkillOutcome::Skipped => writeln!(out, "An update is already in progress.")?,
        SkillOutcome::Failed(e) => writeln!(out, "! {}", e.user_message())?,
    }
    Ok(())
}

async fn load_resume(controller: &mut FlowController, arg: &str) {
    if arg.trim_start().starts_with("data:") {
        controller.select_data_url(arg);
    } else {
        controller.select_file(Path::new(arg)).await;
    }
}

async fn read_job_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read job description from {}", path.display()))
}

/// Collects lines until a lone `.` or end of input.
async fn read_block<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Result<String> {
    let mut block = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "." {
            break;
        }
        block.push(line);
    }
    Ok(block.join("\n"))
}

fn upload_only<W: Write>(controller: &FlowController, out: &mut W) -> Result<bool> {
    let ok = controller.state().stage == Stage::Upload;
    if !ok {
        writeln!(out, "Type 'reset' to start over with a new resume.")?;
    }
    Ok(ok)
}

fn print_screen<W: Write>(controller: &FlowController, out: &mut W, json: bool) -> Result<()> {
    let state = controller.state();
    match (&state.stage, &state.result) {
        (Stage::Results, Some(result)) => print_result(controller, result, out, json)?,
        _ => writeln!(out, "{}", render_upload(state))?,
    }
    Ok(())
}

fn print_result<W: Write>(
    controller: &FlowController,
    result: &AnalysisResult,
    out: &mut W,
    json: bool,
) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
    } else {
        writeln!(out, "{}", controller.report().render(result))?;
    }
    Ok(())
}

pub fn render_upload(state: &FlowState) -> String {
    let resume = match &state.resume {
        Some(file) => format!("{} ({}) · Ready for Analysis", file.name(), file.media_type()),
        None => "(none) · use 'resume <path>'".to_string(),
    };
    let job = if state.job_description.is_blank() {
        "(empty) · use 'job' or 'job-file <path>'".to_string()
    } else {
        format!("{} characters", state.job_description.as_str().chars().count())
    };
    let action = if state.can_analyze() {
        "ready · type 'analyze'"
    } else {
        "disabled · needs a resume and a job description"
    };

    let mut screen = format!(
        "== Optimize Your Resume for Your Dream Job ==\n\
         Your Resume:      {resume}\n\
         Job Description:  {job}\n\
         Analyze Resume:   {action}"
    );
    if let Some(error) = &state.error {
        screen.push_str(&format!("\n! {error}"));
    }
    screen
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Notify;

    use super::*;
    use crate::analysis::model::fixtures::{sample_json, sample_result};
    use crate::analysis::AnalysisClient;
    use crate::errors::ANALYSIS_FAILED_MESSAGE;
    use crate::input::{JobDescription, MediaType, UploadedFile, UNSUPPORTED_FILE_MESSAGE};
    use crate::llm_client::mock::ScriptedModel;
    use crate::report::render::BUSY_BANNER;

    const JOB_TEXT: &[u8] = b"Senior Rust engineer. Kubernetes and Kafka a plus.";

    fn controller_with(model: ScriptedModel) -> (FlowController, Arc<ScriptedModel>) {
        let model = Arc::new(model);
        (FlowController::new(AnalysisClient::new(model.clone())), model)
    }

    fn temp_file(suffix: &str, bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        tmp.write_all(bytes).unwrap();
        tmp
    }

    fn batch_args(resume: &Path, job_file: &Path, simulate: &[&str], json: bool) -> Args {
        Args {
            resume: Some(resume.display().to_string()),
            job_file: Some(job_file.to_path_buf()),
            simulate: simulate.iter().map(|s| s.to_string()).collect(),
            json,
        }
    }

    fn with_skill(score: u32, skill: &str) -> AnalysisResult {
        let mut result = sample_result();
        result.match_score = score;
        result.missing_skills.retain(|s| s != skill);
        result.matching_skills.push(skill.to_string());
        result
    }

    #[test]
    fn test_args_batch_requires_both_inputs() {
        let args = Args::parse_from(["resume-analyzer", "--resume", "cv.pdf"]);
        assert!(!args.is_batch());

        let args = Args::parse_from([
            "resume-analyzer",
            "--resume",
            "cv.pdf",
            "--job-file",
            "jd.txt",
            "--simulate",
            "Kubernetes",
            "--simulate",
            "Kafka",
            "--json",
        ]);
        assert!(args.is_batch());
        assert_eq!(args.simulate, vec!["Kubernetes", "Kafka"]);
        assert!(args.json);
    }

    #[test]
    fn test_upload_screen_disabled_without_inputs() {
        let screen = render_upload(&FlowState::default());
        assert!(screen.contains("(none)"));
        assert!(screen.contains("disabled"));
    }

    #[test]
    fn test_upload_screen_ready_with_inputs() {
        let state = FlowState {
            resume: Some(UploadedFile::from_bytes("cv.pdf", MediaType::Pdf, b"%PDF")),
            job_description: JobDescription::new("Rust"),
            ..FlowState::default()
        };
        let screen = render_upload(&state);
        assert!(screen.contains("cv.pdf (application/pdf) · Ready for Analysis"));
        assert!(screen.contains("4 characters"));
        assert!(screen.contains("ready · type 'analyze'"));
    }

    #[test]
    fn test_upload_screen_shows_error_banner() {
        let state = FlowState {
            error: Some(UNSUPPORTED_FILE_MESSAGE.to_string()),
            ..FlowState::default()
        };
        assert!(render_upload(&state).ends_with(&format!("! {UNSUPPORTED_FILE_MESSAGE}")));
    }

    #[tokio::test]
    async fn test_batch_rejected_resume_stops_before_any_call() {
        let resume = temp_file(".gif", b"GIF89a\x01\x00\x01\x00");
        let job = temp_file(".txt", JOB_TEXT);
        let (mut controller, model) = controller_with(ScriptedModel::new());
        let mut out = Vec::new();

        let err = run_batch(
            &mut controller,
            &batch_args(resume.path(), job.path(), &[], false),
            &mut out,
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), UNSUPPORTED_FILE_MESSAGE);
        assert_eq!(model.calls(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_batch_failed_analysis_reports_generic_message() {
        let resume = temp_file(".txt", b"Jane Doe - Rust, Tokio");
        let job = temp_file(".txt", JOB_TEXT);
        let (mut controller, model) =
            controller_with(ScriptedModel::new().reply_error(403, "API key not valid"));
        let mut out = Vec::new();

        let err = run_batch(
            &mut controller,
            &batch_args(resume.path(), job.path(), &["Kubernetes"], false),
            &mut out,
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), ANALYSIS_FAILED_MESSAGE);
        assert_eq!(model.calls(), 1);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_batch_failed_simulation_keeps_result_and_continues() {
        let kafka = with_skill(74, "Kafka");
        let resume = temp_file(".txt", b"Jane Doe - Rust, Tokio");
        let job = temp_file(".txt", JOB_TEXT);
        let (mut controller, model) = controller_with(
            ScriptedModel::new()
                .reply_text(sample_json())
                .reply_error(500, "internal")
                .reply_text(serde_json::to_string(&kafka).unwrap()),
        );
        let mut out = Vec::new();

        run_batch(
            &mut controller,
            &batch_args(resume.path(), job.path(), &["Kubernetes", "Kafka"], true),
            &mut out,
        )
        .await
        .unwrap();

        let printed: AnalysisResult = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed, kafka);
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test]
    async fn test_batch_single_failed_simulation_prints_original_report() {
        let resume = temp_file(".txt", b"Jane Doe - Rust, Tokio");
        let job = temp_file(".txt", JOB_TEXT);
        let (mut controller, _) = controller_with(
            ScriptedModel::new()
                .reply_text(sample_json())
                .reply_text("not json"),
        );
        let mut out = Vec::new();

        run_batch(
            &mut controller,
            &batch_args(resume.path(), job.path(), &["Kubernetes"], false),
            &mut out,
        )
        .await
        .unwrap();

        let screen = String::from_utf8(out).unwrap();
        assert!(screen.contains("== Analysis Complete =="));
        assert!(screen.contains(" 68/100"));
        assert!(screen.contains("[1] + Kubernetes"));
    }

    #[tokio::test]
    async fn test_shell_keeps_reading_while_score_update_pending() {
        let gate = Arc::new(Notify::new());
        let (mut controller, model) = controller_with(
            ScriptedModel::gated(gate.clone())
                .reply_text(sample_json())
                .reply_text(serde_json::to_string(&with_skill(75, "Kubernetes")).unwrap()),
        );
        let resume = temp_file(".txt", b"Jane Doe - Rust, Tokio");
        controller.select_file(resume.path()).await;
        controller.set_job_description("Senior Rust engineer");
        gate.notify_one();
        controller.analyze().await;
        assert_eq!(controller.state().stage, Stage::Results);

        let mut lines = b"add 1\nadd Kafka\nshow\nreset\nquit\n".as_slice().lines();
        let mut out = Vec::new();
        let shell = run_shell(&mut controller, &mut lines, &mut out, false);
        let release = async {
            while model.calls() < 2 {
                tokio::task::yield_now().await;
            }
            gate.notify_one();
        };
        let (outcome, _) = tokio::join!(shell, release);
        outcome.unwrap();

        let screen = String::from_utf8(out).unwrap();
        assert!(screen.matches(BUSY_BANNER).count() >= 2);
        assert!(screen.contains("An update is already in progress."));
        assert!(screen.contains("Please wait for the score update to finish."));

        let last = screen.rsplit("== Analysis Complete ==").next().unwrap();
        assert!(last.contains(" 75/100"));
        assert!(!last.contains(BUSY_BANNER));

        assert_eq!(model.calls(), 2);
        assert!(!controller.report().is_busy());
        assert_eq!(controller.state().stage, Stage::Results);
        assert_eq!(controller.state().result.as_ref().unwrap().match_score, 75);
    }

    #[tokio::test]
    async fn test_shell_analyze_then_add_by_index() {
        let (mut controller, model) = controller_with(
            ScriptedModel::new()
                .reply_text(sample_json())
                .reply_text(serde_json::to_string(&with_skill(76, "Kafka")).unwrap()),
        );
        let resume = temp_file(".txt", b"Jane Doe - Rust, Tokio");
        let job = temp_file(".txt", JOB_TEXT);
        let script = format!(
            "resume {}\njob-file {}\nanalyze\nadd 2\n",
            resume.path().display(),
            job.path().display()
        );
        let mut lines = script.as_bytes().lines();
        let mut out = Vec::new();

        run_shell(&mut controller, &mut lines, &mut out, false)
            .await
            .unwrap();

        let screen = String::from_utf8(out).unwrap();
        assert!(screen.contains("Analyzing Profile"));
        let last = screen.rsplit("== Analysis Complete ==").next().unwrap();
        assert!(last.contains(" 76/100"));
        assert!(!last.contains("[2] + Kafka"));
        assert_eq!(controller.state().result, Some(with_skill(76, "Kafka")));

        let request = &model.requests()[1];
        let prompt = request.contents[0].parts[0].text.as_deref().unwrap();
        assert!(prompt.contains("include the skill: \"Kafka\""));
    }
}
