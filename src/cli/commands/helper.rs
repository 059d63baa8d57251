//! Internal helpers invoked by entry scripts.
//!
//! Entry procedures reach back into this binary through `$FRESHEN`, so the
//! constraint matcher, version queries, and candidate resolution run with one
//! implementation instead of being re-invented per script. Gate helpers use
//! the condition exit protocol: 0 proceed, 2 clean skip.
//!
//! When run by the engine, the platform is taken from the exported
//! `FRESHEN_*` variables so every script in a run sees the same descriptor;
//! outside a run it is detected fresh.

use crate::catalog::CONDITION_SKIP_STATUS;
use crate::cli::args::HelperArgs;
use crate::error::Result;
use crate::platform::{continue_if, skip_if, Gate, OsFamily, PlatformDescriptor};
use crate::report::{append_event, Event, EventKind};
use crate::resolver::{
    find_installable_version, last_git_tags, latest_page_versions, query_installed_version,
    query_version_script, CommandIndex, HttpProbe, Resolution,
};
use anyhow::{anyhow, Context};
use std::collections::BTreeSet;

use super::dispatcher::{Command, CommandResult};

/// The helper command implementation.
pub struct HelperCommand {
    args: HelperArgs,
}

impl HelperCommand {
    /// Create a new helper command.
    pub fn new(args: HelperArgs) -> Self {
        Self { args }
    }
}

fn descriptor_from_env() -> Option<PlatformDescriptor> {
    let family = match std::env::var("FRESHEN_OS").ok()?.as_str() {
        "macos" => OsFamily::MacOs,
        "linux" => OsFamily::Linux,
        _ => return None,
    };

    let var = |name: &str| std::env::var(name).unwrap_or_default();
    let distro = Some(var("FRESHEN_DISTRO")).filter(|d| !d.is_empty());
    let details: BTreeSet<String> = var("FRESHEN_OS_DETAILS")
        .split_whitespace()
        .map(str::to_string)
        .collect();

    Some(PlatformDescriptor {
        family,
        distro,
        version: var("FRESHEN_OS_VERSION"),
        codename: var("FRESHEN_OS_CODENAME"),
        details,
    })
}

fn current_descriptor() -> PlatformDescriptor {
    descriptor_from_env().unwrap_or_else(PlatformDescriptor::detect)
}

fn gate_result(gate: Gate) -> CommandResult {
    match gate {
        Gate::Proceed => CommandResult::success(),
        Gate::Skip { reason } => {
            println!("{reason}");
            CommandResult::failure(CONDITION_SKIP_STATUS)
        }
    }
}

impl Command for HelperCommand {
    fn execute(&self) -> Result<CommandResult> {
        match &self.args {
            HelperArgs::ContinueIf { expr } => {
                Ok(gate_result(continue_if(expr, &current_descriptor())?))
            }
            HelperArgs::SkipIf { expr } => {
                Ok(gate_result(skip_if(expr, &current_descriptor())?))
            }
            HelperArgs::InstalledVersion { invocation } => {
                let mut index = CommandIndex::new();
                println!(
                    "{}",
                    query_installed_version(&mut index, &invocation.join(" "))
                );
                Ok(CommandResult::success())
            }
            HelperArgs::ScriptVersion {
                name,
                check_existence,
            } => {
                let mut index = CommandIndex::new();
                println!("{}", query_version_script(&mut index, name, *check_existence));
                Ok(CommandResult::success())
            }
            HelperArgs::FindInstallable {
                template,
                installed,
                candidates,
            } => {
                let probe = HttpProbe::new()?;
                let resolution =
                    find_installable_version(&probe, template, candidates, installed)?;
                println!("{}", resolution.message());
                Ok(match resolution {
                    Resolution::Update { .. } => CommandResult::success(),
                    Resolution::AlreadyNewest { .. }
                    | Resolution::AlreadyNewestInstallable { .. } => {
                        CommandResult::failure(CONDITION_SKIP_STATUS)
                    }
                    Resolution::NotFound => CommandResult::failure(1),
                })
            }
            HelperArgs::LastGitTag {
                url,
                pattern,
                limit,
            } => {
                for tag in last_git_tags(url, pattern.as_deref(), *limit)? {
                    println!("{tag}");
                }
                Ok(CommandResult::success())
            }
            HelperArgs::PageVersions {
                url,
                pattern,
                limit,
            } => {
                for version in latest_page_versions(url, pattern.as_deref(), *limit)? {
                    println!("{version}");
                }
                Ok(CommandResult::success())
            }
            HelperArgs::Report { title, detail } => {
                let log_path = std::env::var_os("FRESHEN_LOG")
                    .map(std::path::PathBuf::from)
                    .ok_or_else(|| anyhow!("FRESHEN_LOG is not set; not inside a run"))?;
                let event = Event {
                    kind: EventKind::Subtarget,
                    title: title.clone(),
                    detail: detail.clone(),
                };
                println!("{}", event.render());
                append_event(&log_path, &event).context("Failed to record sub-step event")?;
                Ok(CommandResult::success())
            }
        }
    }
}
