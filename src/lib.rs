//! Freshen - catalog-driven tool update orchestration.
//!
//! Freshen keeps the tools on a machine current by running an ordered catalog
//! of small shell-script entries, each declaring what it updates, whether it
//! applies here, and how to do the work. The binary supplies the shared
//! machinery: platform detection, OS constraint matching, version freshness
//! resolution, and structured result reporting.
//!
//! # Modules
//!
//! - [`catalog`] - Entry loading, run order, and catalog source sync
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading
//! - [`engine`] - Ordered entry execution
//! - [`error`] - Error types and result aliases
//! - [`platform`] - Platform detection and OS constraint matching
//! - [`report`] - Immediate event output and the run summary
//! - [`resolver`] - Installed and installable version resolution
//! - [`shell`] - Shell command execution
//!
//! # Example
//!
//! ```
//! use freshen::platform::{OsConstraint, PlatformDescriptor};
//!
//! let constraint: OsConstraint = "macos,ubuntu[wsl]".parse().unwrap();
//! let platform = PlatformDescriptor::detect();
//! let _applies_here = constraint.matches(&platform);
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod platform;
pub mod report;
pub mod resolver;
pub mod shell;

pub use error::{FreshenError, Result};
