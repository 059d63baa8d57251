//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, returning success/failure and an exit code.
    fn execute(&self) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config_path: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher reading settings from `config_path`.
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Path of the config file in use.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli) -> Result<CommandResult> {
        match &cli.command {
            Commands::Run(args) => {
                let cmd = super::run::RunCommand::new(&self.config_path, args.clone());
                cmd.execute()
            }
            Commands::List(args) => {
                let cmd = super::list::ListCommand::new(&self.config_path, args.clone());
                cmd.execute()
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute()
            }
            Commands::Helper(args) => {
                let cmd = super::helper::HelperCommand::new(args.clone());
                cmd.execute()
            }
        }
    }
}
