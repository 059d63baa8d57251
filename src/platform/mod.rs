//! Platform detection and OS constraint matching.
//!
//! The descriptor is built once per run and consulted by entry conditions
//! through the constraint matcher.

pub mod constraint;
pub mod descriptor;

pub use constraint::{continue_if, skip_if, Gate, OsConstraint};
pub use descriptor::{OsFamily, PlatformDescriptor};
