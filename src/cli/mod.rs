//! Command-line interface.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations and dispatching

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, HelperArgs, ListArgs, RunArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
