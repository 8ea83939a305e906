use std::fmt;

use colored::{ColoredString, Colorize};

use crate::config::Settings;
use crate::models::{Outcome, PingResult, PingRun, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Up,
    Warn,
    Down,
}

impl Level {
    pub fn of(result: &PingResult) -> Self {
        match result.outcome {
            Outcome::Responded { status } if status >= 500 => Level::Warn,
            Outcome::Responded { .. } => Level::Up,
            Outcome::Failed { .. } => Level::Down,
        }
    }

    /// Fixed-width label so columns line up.
    pub fn label(self) -> &'static str {
        match self {
            Level::Up => "UP  ",
            Level::Warn => "WARN",
            Level::Down => "DOWN",
        }
    }

    fn painted(self) -> ColoredString {
        match self {
            Level::Up => self.label().green(),
            Level::Warn => self.label().yellow(),
            Level::Down => self.label().red(),
        }
    }
}

/// One console line for a probe, minus coloring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub level: Level,
    pub detail: String,
}

impl Line {
    pub fn of(result: &PingResult) -> Self {
        let head = match &result.outcome {
            Outcome::Responded { status } => status.to_string(),
            Outcome::Failed { error } => error.clone(),
        };
        Line {
            level: Level::of(result),
            detail: format!("{} {}ms  {}", head, result.elapsed_ms, result.url),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.label(), self.detail)
    }
}

pub fn header_line(started_at: &str, targets: usize, timeout_ms: u64) -> String {
    format!(
        "[{}] Pinging {} target(s) (timeout {}ms)",
        started_at, targets, timeout_ms
    )
}

pub fn completion_line(summary: &Summary) -> String {
    if summary.down > 0 {
        format!("Completed with {} failure(s).", summary.down)
    } else {
        "Completed successfully.".to_string()
    }
}

/// Whether a pass counts as successful: downs only fail it when the
/// failure flag is set.
pub fn exit_ok(settings: &Settings, summary: &Summary) -> bool {
    !(settings.fail_on_error() && summary.down > 0)
}

pub fn print_run(run: &PingRun) {
    for result in &run.results {
        let line = Line::of(result);
        println!("{} {}", line.level.painted(), line.detail);
    }
    println!("{}", completion_line(&run.summary));
}
