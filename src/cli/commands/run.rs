//! The `run` command: synchronize the catalog and execute entries in order.

use crate::catalog::{self, ORDER_FILE_NAME};
use crate::cli::args::RunArgs;
use crate::config::Settings;
use crate::engine::{self, RunContext};
use crate::error::Result;
use crate::platform::PlatformDescriptor;
use crate::report::Reporter;
use std::path::{Path, PathBuf};

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    config_path: PathBuf,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(config_path: &Path, args: RunArgs) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
            args,
        }
    }

    fn resolve_targets(&self, catalog_dir: &Path) -> Result<Vec<String>> {
        if self.args.targets.len() == 1 && self.args.targets[0] == "all" {
            catalog::load_order(&catalog_dir.join(ORDER_FILE_NAME))
        } else {
            Ok(self.args.targets.clone())
        }
    }
}

impl Command for RunCommand {
    fn execute(&self) -> Result<CommandResult> {
        let settings = Settings::load_from(&self.config_path)?;
        settings.require_catalog_source(&self.config_path)?;

        let catalog_dir = settings.catalog_dir();
        if settings.needs_sync() {
            let url = settings.catalog.url.as_deref().unwrap_or_default();
            catalog::sync_catalog(&catalog_dir, url, settings.catalog.git_ref.as_deref())?;
        }

        let ids = self.resolve_targets(&catalog_dir)?;
        tracing::debug!(count = ids.len(), "resolved run targets");

        let descriptor = PlatformDescriptor::detect();
        let context = RunContext::create()?;
        let reporter = Reporter::new(&context.root().join("report.log"))?;

        let outcome = engine::run_entries(
            &catalog_dir,
            &ids,
            &descriptor,
            &context,
            &reporter,
            self.args.abort_on_fail,
        )?;

        reporter.summarize()?;

        if outcome.exit_code == 0 {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(outcome.exit_code))
        }
    }
}
