//! Execution engine.
//!
//! Runs catalog entries strictly in the given order. Each entry gets a fresh
//! working directory under the run's temporary root and an environment that
//! points it back at this process (`FRESHEN`), the report log
//! (`FRESHEN_LOG`), and the detected platform. A failing entry never blocks
//! the rest of the run unless `abort_on_fail` is set, in which case the run
//! stops and the failing entry's exit status becomes the process exit code.

pub mod context;

pub use context::RunContext;

use crate::catalog::{ConditionSignal, DescriptionSignal, UpdateEntry};
use crate::error::Result;
use crate::platform::{OsFamily, PlatformDescriptor};
use crate::report::{EventKind, Reporter};
use crate::shell::{self, CommandOptions, OutputLine};
use std::collections::HashMap;
use std::path::Path;

/// Terminal state of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Updated,
    Skipped,
    Failed { exit_code: i32 },
}

/// What happened to one entry, in run order.
#[derive(Debug, Clone)]
pub struct EntryOutcome {
    pub id: String,
    pub status: EntryStatus,
}

/// Aggregate result of a run.
#[derive(Debug)]
pub struct RunOutcome {
    pub outcomes: Vec<EntryOutcome>,
    pub exit_code: i32,
}

/// Environment exported to every entry procedure.
fn entry_environment(
    descriptor: &PlatformDescriptor,
    log_path: &Path,
) -> HashMap<String, String> {
    let mut env = HashMap::new();

    let exe = std::env::current_exe()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "freshen".to_string());
    env.insert("FRESHEN".to_string(), exe);
    env.insert(
        "FRESHEN_LOG".to_string(),
        log_path.to_string_lossy().to_string(),
    );

    let os = match descriptor.family {
        OsFamily::MacOs => "macos",
        OsFamily::Linux => "linux",
    };
    env.insert("FRESHEN_OS".to_string(), os.to_string());
    env.insert(
        "FRESHEN_DISTRO".to_string(),
        descriptor.distro.clone().unwrap_or_default(),
    );
    env.insert("FRESHEN_OS_VERSION".to_string(), descriptor.version.clone());
    env.insert(
        "FRESHEN_OS_CODENAME".to_string(),
        descriptor.codename.clone(),
    );
    env.insert(
        "FRESHEN_OS_DETAILS".to_string(),
        descriptor
            .details
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(" "),
    );

    env
}

fn failure_detail(exit_code: Option<i32>, stderr: &str) -> String {
    let tail = stderr.lines().rev().find(|l| !l.trim().is_empty());
    match (tail, exit_code) {
        (Some(line), Some(code)) => format!("{} (exit {code})", line.trim()),
        (Some(line), None) => line.trim().to_string(),
        (None, Some(code)) => format!("exit status {code}"),
        (None, None) => "terminated by signal".to_string(),
    }
}

fn run_one(
    catalog_dir: &Path,
    id: &str,
    context: &RunContext,
    reporter: &Reporter,
    env: &HashMap<String, String>,
) -> Result<EntryStatus> {
    let entry = match UpdateEntry::load(catalog_dir, id) {
        Ok(entry) => entry,
        Err(err) => {
            reporter.report(EventKind::Aborted, id, &err.to_string())?;
            return Ok(EntryStatus::Failed { exit_code: 1 });
        }
    };

    let workdir = context.create_entry_dir(id)?;
    let options = CommandOptions {
        cwd: Some(workdir.clone()),
        env: env.clone(),
    };

    let status = run_in_workdir(&entry, id, &options, reporter);
    context.remove_entry_dir(&workdir);
    status
}

fn run_in_workdir(
    entry: &UpdateEntry,
    id: &str,
    options: &CommandOptions,
    reporter: &Reporter,
) -> Result<EntryStatus> {
    let title = match entry.description(options) {
        Ok(DescriptionSignal::Title(title)) => title,
        Ok(DescriptionSignal::Failed { detail, status }) => {
            reporter.report(
                EventKind::Aborted,
                id,
                &format!("description failed: {detail}"),
            )?;
            return Ok(EntryStatus::Failed { exit_code: status });
        }
        Err(err) => {
            reporter.report(EventKind::Aborted, id, &err.to_string())?;
            return Ok(EntryStatus::Failed { exit_code: 1 });
        }
    };

    if let Some(signal) = entry.condition(options) {
        match signal {
            Ok(ConditionSignal::Proceed) => {}
            Ok(ConditionSignal::Skip { detail }) => {
                reporter.report(EventKind::Skipped, &title, &detail)?;
                return Ok(EntryStatus::Skipped);
            }
            Ok(ConditionSignal::Abort { detail, status }) => {
                reporter.report(EventKind::Aborted, &title, &detail)?;
                return Ok(EntryStatus::Failed { exit_code: status });
            }
            Err(err) => {
                reporter.report(EventKind::Aborted, &title, &err.to_string())?;
                return Ok(EntryStatus::Failed { exit_code: 1 });
            }
        }
    }

    tracing::info!(id, title, "running entry");
    let result = entry.run(
        options,
        Box::new(|line| match line {
            OutputLine::Stdout(l) => println!("{l}"),
            OutputLine::Stderr(l) => eprintln!("{l}"),
        }),
    )?;

    if result.success {
        reporter.report(
            EventKind::Updated,
            &title,
            &shell::format_duration(result.duration),
        )?;
        Ok(EntryStatus::Updated)
    } else {
        reporter.report(
            EventKind::Aborted,
            &title,
            &failure_detail(result.exit_code, &result.stderr),
        )?;
        Ok(EntryStatus::Failed {
            exit_code: result.exit_code.unwrap_or(1),
        })
    }
}

/// Run the given entries in order.
///
/// The returned exit code is 0 unless `abort_on_fail` stopped the run, in
/// which case it is the failing entry's status.
pub fn run_entries(
    catalog_dir: &Path,
    ids: &[String],
    descriptor: &PlatformDescriptor,
    context: &RunContext,
    reporter: &Reporter,
    abort_on_fail: bool,
) -> Result<RunOutcome> {
    let env = entry_environment(descriptor, reporter.log_path());

    let mut outcomes = Vec::with_capacity(ids.len());
    let mut exit_code = 0;

    for id in ids {
        let status = run_one(catalog_dir, id, context, reporter, &env)?;
        let failed_code = match &status {
            EntryStatus::Failed { exit_code } => Some(*exit_code),
            _ => None,
        };
        outcomes.push(EntryOutcome {
            id: id.clone(),
            status,
        });

        if abort_on_fail {
            if let Some(code) = failed_code {
                tracing::warn!(id, code, "aborting run on first failure");
                exit_code = code;
                break;
            }
        }
    }

    Ok(RunOutcome {
        outcomes,
        exit_code,
    })
}
