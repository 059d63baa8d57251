//! Result reporting.
//!
//! Every event prints immediately in a kind-specific style and, unless
//! suppressed, is appended to an ordered JSON-lines log file. The log lives
//! inside the run's temporary root so helper subprocesses can append
//! sub-step events and the file vanishes with the root, signals included.
//! `summarize()` replays the log in original order as one consolidated block.

use anyhow::{Context, Result};
use console::style;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Kind of a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The entry ran to completion.
    Updated,

    /// The entry was not applicable or already current.
    Skipped,

    /// Loading or condition checking failed, or the run step failed.
    Aborted,

    /// Informational sub-step nested inside a run.
    Subtarget,
}

/// One reported event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub title: String,
    pub detail: String,
}

impl Event {
    /// Styled single-line rendering.
    pub fn render(&self) -> String {
        let (mark, title) = match self.kind {
            EventKind::Updated => ("\u{2714}", style(self.title.as_str()).green().bold()),
            EventKind::Skipped => ("\u{2298}", style(self.title.as_str()).yellow()),
            EventKind::Aborted => ("\u{2718}", style(self.title.as_str()).red().bold()),
            EventKind::Subtarget => ("\u{00b7}", style(self.title.as_str()).cyan()),
        };
        if self.detail.is_empty() {
            format!("{mark} {title}")
        } else {
            format!("{mark} {title}: {}", self.detail)
        }
    }
}

/// Renders events immediately and keeps the ordered log for the summary.
#[derive(Debug)]
pub struct Reporter {
    log_path: PathBuf,
}

impl Reporter {
    /// Create a reporter whose log lives at `log_path`.
    pub fn new(log_path: &Path) -> Result<Self> {
        // Truncate any leftover content; the log is process-scoped.
        std::fs::write(log_path, b"")
            .with_context(|| format!("Failed to create report log at {}", log_path.display()))?;
        Ok(Self {
            log_path: log_path.to_path_buf(),
        })
    }

    /// Path of the log file, exported to entry scripts as `FRESHEN_LOG`.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Print an event immediately and, unless `suppress_log`, append it to
    /// the ordered log.
    pub fn report_with(
        &self,
        kind: EventKind,
        title: &str,
        detail: &str,
        suppress_log: bool,
    ) -> Result<()> {
        let event = Event {
            kind,
            title: title.to_string(),
            detail: detail.to_string(),
        };
        println!("{}", event.render());

        if !suppress_log {
            append_event(&self.log_path, &event)?;
        }
        Ok(())
    }

    /// Report and log an event.
    pub fn report(&self, kind: EventKind, title: &str, detail: &str) -> Result<()> {
        self.report_with(kind, title, detail, false)
    }

    /// Read back every logged event in original order.
    pub fn events(&self) -> Result<Vec<Event>> {
        let content = std::fs::read_to_string(&self.log_path)
            .with_context(|| format!("Failed to read report log at {}", self.log_path.display()))?;
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|line| serde_json::from_str(line).context("Malformed report log line"))
            .collect()
    }

    /// Replay every logged event, framed by a header and separator.
    pub fn summarize(&self) -> Result<()> {
        let events = self.events()?;

        println!();
        println!("{}", style("Summary").bold());
        println!("{}", style("\u{2500}".repeat(40)).dim());
        for event in &events {
            self.report_with(event.kind, &event.title, &event.detail, true)?;
        }
        println!("{}", style("\u{2500}".repeat(40)).dim());
        Ok(())
    }
}

/// Append one event to a log file. Also used by the helper subcommand that
/// lets entry scripts record sub-step events into the parent's log.
pub fn append_event(log_path: &Path, event: &Event) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open report log at {}", log_path.display()))?;
    let line = serde_json::to_string(event).context("Failed to serialize report event")?;
    writeln!(file, "{line}")?;
    Ok(())
}
