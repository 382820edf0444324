//! Line-oriented command parser for the interactive front-end.

use std::path::PathBuf;

use crate::analysis::AnalysisResult;

pub const HELP: &str = "\
Commands:
  resume <path|data-url>   select a resume (PDF, TXT, PNG, JPEG, WebP)
  remove                   discard the selected resume
  job                      paste a job description, end with a line containing only '.'
  job-file <path>          load the job description from a file
  analyze                  run the analysis
  add <n|skill>            simulate adding a missing skill (results screen)
  show                     redraw the current screen
  json                     print the current analysis as JSON
  reset                    start over with a new resume
  help                     show this help
  quit                     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillRef {
    /// 1-based position in the missing-skills list as rendered.
    Index(usize),
    Name(String),
}

impl SkillRef {
    /// Resolves to a skill name. Names need not appear in `missingSkills`.
    pub fn resolve(&self, result: &AnalysisResult) -> Option<String> {
        match self {
            SkillRef::Index(n) => n
                .checked_sub(1)
                .and_then(|i| result.missing_skills.get(i))
                .cloned(),
            SkillRef::Name(name) => Some(name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Resume(String),
    Remove,
    Job,
    JobFile(PathBuf),
    Analyze,
    Add(SkillRef),
    Show,
    Json,
    Reset,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "resume" | "file" => Command::Resume(required(rest, "resume <path|data-url>")?.to_string()),
        "remove" | "clear" => Command::Remove,
        "job" => Command::Job,
        "job-file" => Command::JobFile(PathBuf::from(required(rest, "job-file <path>")?)),
        "analyze" => Command::Analyze,
        "add" => {
            let arg = required(rest, "add <n|skill>")?;
            match arg.parse::<usize>() {
                Ok(n) => Command::Add(SkillRef::Index(n)),
                Err(_) => Command::Add(SkillRef::Name(arg.to_string())),
            }
        }
        "show" => Command::Show,
        "json" => Command::Json,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command '{other}'. Type 'help' for commands.")),
    };
    Ok(Some(command))
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(rest)
    }
}
