//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Freshen - keep the tools on this machine up to date.
#[derive(Debug, Parser)]
#[command(name = "freshen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides ~/.config/freshen/config.yml)
    #[arg(short, long, global = true, env = "FRESHEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run update entries
    Run(RunArgs),

    /// List the entries in the catalog's run order
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Internal helpers invoked by entry scripts via $FRESHEN
    #[command(subcommand, hide = true)]
    Helper(HelperArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Stop at the first failing entry and exit with its status
    #[arg(long)]
    pub abort_on_fail: bool,

    /// Entry ids to run, or "all" for the full catalog order
    #[arg(required = true)]
    pub targets: Vec<String>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Helper subcommands for entry scripts.
///
/// Exit codes follow the condition protocol where applicable: 0 proceed,
/// 2 clean skip, anything else a failure.
#[derive(Debug, Clone, Subcommand)]
pub enum HelperArgs {
    /// Exit 0 when the OS constraint matches the platform, 2 otherwise
    ContinueIf {
        /// Constraint expression, e.g. "macos,ubuntu[wsl]"
        expr: String,
    },

    /// Exit 2 when the OS constraint matches the platform, 0 otherwise
    SkipIf {
        /// Constraint expression, e.g. "macos,ubuntu[wsl]"
        expr: String,
    },

    /// Print the installed version reported by an invocation like "vim --version"
    InstalledVersion {
        /// Command and arguments, joined into one invocation
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        invocation: Vec<String>,
    },

    /// Print the version reported by the companion "<name>-version" script
    ScriptVersion {
        /// Primary command name
        name: String,

        /// Report "(none)" unless the primary command itself resolves
        #[arg(long)]
        check_existence: bool,
    },

    /// Probe candidates against a URL template for the best installable version
    ///
    /// Exit 0 when an update is available (prints "installed -> available"),
    /// 2 when already newest, 1 when nothing is installable.
    FindInstallable {
        /// URL template containing "{version}"
        template: String,

        /// Currently installed version
        #[arg(long, default_value = "(none)")]
        installed: String,

        /// Candidate versions, most-preferred first
        #[arg(required = true)]
        candidates: Vec<String>,
    },

    /// Print the newest version tags of a git repository, one per line
    LastGitTag {
        /// Repository URL
        url: String,

        /// Tag pattern override
        #[arg(long)]
        pattern: Option<String>,

        /// How many tags to print
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },

    /// Print the newest version strings found on a release page, one per line
    PageVersions {
        /// Page URL
        url: String,

        /// Version pattern override
        #[arg(long)]
        pattern: Option<String>,

        /// How many versions to print
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },

    /// Append a sub-step event to the run's report log ($FRESHEN_LOG)
    Report {
        /// Event title
        title: String,

        /// Event detail
        #[arg(default_value = "")]
        detail: String,
    },
}
