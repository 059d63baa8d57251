//! The `list` command: show the catalog's run order.

use crate::catalog::{self, ORDER_FILE_NAME};
use crate::cli::args::ListArgs;
use crate::config::Settings;
use crate::error::Result;
use std::path::{Path, PathBuf};

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    config_path: PathBuf,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(config_path: &Path, _args: ListArgs) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
        }
    }
}

impl Command for ListCommand {
    fn execute(&self) -> Result<CommandResult> {
        let settings = Settings::load_from(&self.config_path)?;
        settings.require_catalog_source(&self.config_path)?;

        let order = catalog::load_order(&settings.catalog_dir().join(ORDER_FILE_NAME))?;
        for id in order {
            println!("{id}");
        }

        Ok(CommandResult::success())
    }
}
