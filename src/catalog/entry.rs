//! Update entry loading and procedure invocation.
//!
//! An entry is a POSIX shell script in the catalog directory defining a
//! `description` function, a `run` function, and optionally a `condition`
//! function. The condition capability is probed once at load time by scanning
//! the script text; it is not re-probed per invocation.

use crate::error::{FreshenError, Result};
use crate::shell::{self, CommandOptions, CommandResult, OutputCallback};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// File name of the order file at the catalog root.
pub const ORDER_FILE_NAME: &str = "update-order";

/// Exit status a condition uses to signal a clean, expected skip.
///
/// 0 means proceed; anything other than 0 or this value means the check
/// itself failed and the entry is aborted.
pub const CONDITION_SKIP_STATUS: i32 = 2;

/// Signal produced by evaluating an entry's condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionSignal {
    /// Run the entry.
    Proceed,

    /// Clean, expected "not applicable here" result.
    Skip { detail: String },

    /// The condition check itself failed — ambiguous or broken state.
    /// `status` is the check's own exit status.
    Abort { detail: String, status: i32 },
}

/// Signal produced by running the mandatory description step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionSignal {
    /// Title used in all subsequent reporting for this entry.
    Title(String),

    /// The description step itself failed.
    Failed { detail: String, status: i32 },
}

/// One named update procedure loaded from the catalog.
#[derive(Debug, Clone)]
pub struct UpdateEntry {
    id: String,
    path: PathBuf,
    has_condition: bool,
}

/// Whether the script text defines a shell function with the given name.
fn defines_function(source: &str, name: &str) -> bool {
    static CACHE: OnceLock<regex::Regex> = OnceLock::new();
    let re = CACHE.get_or_init(|| {
        regex::Regex::new(r"(?m)^\s*(\w+)\s*\(\s*\)").expect("static regex")
    });
    re.captures_iter(source).any(|caps| &caps[1] == name)
}

impl UpdateEntry {
    /// Load an entry by identifier from the catalog directory.
    pub fn load(catalog_dir: &Path, id: &str) -> Result<Self> {
        let path = catalog_dir.join(id);
        let source = std::fs::read_to_string(&path).map_err(|err| {
            FreshenError::EntryNotLoadable {
                id: id.to_string(),
                reason: err.to_string(),
            }
        })?;

        if !defines_function(&source, "description") || !defines_function(&source, "run") {
            return Err(FreshenError::EntryNotLoadable {
                id: id.to_string(),
                reason: "script must define description() and run()".to_string(),
            });
        }

        Ok(Self {
            id: id.to_string(),
            path,
            has_condition: defines_function(&source, "condition"),
        })
    }

    /// Entry identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the script defines a condition (determined at load time).
    pub fn has_condition(&self) -> bool {
        self.has_condition
    }

    fn invocation(&self, function: &str) -> String {
        format!(". '{}' && {}", self.path.display(), function)
    }

    /// Run the mandatory `description` procedure; its stdout is the title
    /// used in all subsequent reporting for this entry. A failing step keeps
    /// its own exit status so callers can propagate it.
    pub fn description(&self, options: &CommandOptions) -> Result<DescriptionSignal> {
        let result = shell::execute(&self.invocation("description"), options)?;
        if !result.success {
            return Ok(DescriptionSignal::Failed {
                detail: result.stderr.trim().to_string(),
                status: result.exit_code.unwrap_or(1),
            });
        }
        let title = result.stdout.trim();
        Ok(DescriptionSignal::Title(if title.is_empty() {
            self.id.clone()
        } else {
            title.to_string()
        }))
    }

    /// Evaluate the optional condition. `None` when the entry defines none.
    pub fn condition(&self, options: &CommandOptions) -> Option<Result<ConditionSignal>> {
        if !self.has_condition {
            return None;
        }

        Some(
            shell::execute(&self.invocation("condition"), options).map(|result| {
                let detail = if result.stdout.trim().is_empty() {
                    result.stderr.trim().to_string()
                } else {
                    result.stdout.trim().to_string()
                };
                match result.exit_code {
                    Some(0) => ConditionSignal::Proceed,
                    Some(CONDITION_SKIP_STATUS) => ConditionSignal::Skip { detail },
                    code => ConditionSignal::Abort {
                        detail,
                        status: code.unwrap_or(1),
                    },
                }
            }),
        )
    }

    /// Run the mandatory `run` procedure, streaming output through `callback`.
    pub fn run(&self, options: &CommandOptions, callback: OutputCallback) -> Result<CommandResult> {
        shell::execute_streaming(&self.invocation("run"), options, callback)
    }
}
