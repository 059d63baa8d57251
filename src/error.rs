//! Error types for freshen operations.
//!
//! [`FreshenError`] is the primary error type. Startup configuration problems
//! carry dedicated process exit codes so callers and scripts can tell "no
//! catalog source configured" apart from "order file missing".

use std::path::PathBuf;
use thiserror::Error;

/// Exit code when no catalog source is configured.
pub const EXIT_NO_CATALOG_SOURCE: i32 = 3;

/// Exit code when the order file is missing on an `all` invocation.
pub const EXIT_NO_ORDER_FILE: i32 = 4;

/// Core error type for freshen operations.
#[derive(Debug, Error)]
pub enum FreshenError {
    /// No catalog source (URL or local path) is configured.
    #[error("No catalog source configured: set catalog.url or catalog.path in {config_path}")]
    CatalogSourceMissing { config_path: PathBuf },

    /// The order file was not found in the catalog.
    #[error("Order file not found: {path}")]
    OrderFileMissing { path: PathBuf },

    /// An entry identifier does not resolve to a readable definition.
    #[error("Entry '{id}' is not loadable: {reason}")]
    EntryNotLoadable { id: String, reason: String },

    /// An OS constraint expression could not be parsed.
    #[error("Invalid OS constraint '{expr}': {message}")]
    ConstraintParse { expr: String, message: String },

    /// Shell command failed to start or exited with a failure status.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FreshenError {
    /// Process exit code associated with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            FreshenError::CatalogSourceMissing { .. } => EXIT_NO_CATALOG_SOURCE,
            FreshenError::OrderFileMissing { .. } => EXIT_NO_ORDER_FILE,
            _ => 1,
        }
    }
}

/// Result type alias for freshen operations.
pub type Result<T> = std::result::Result<T, FreshenError>;
