//! Run-scoped temporary directories.
//!
//! One temporary root exists per process; each entry gets a fresh
//! sub-directory under it as its working directory, removed as soon as the
//! entry finishes. The root itself is removed on normal exit (Drop) and on
//! SIGINT/SIGTERM via a signal handler.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

static CLEANUP_PATH: OnceLock<PathBuf> = OnceLock::new();

#[cfg(unix)]
extern "C" fn cleanup_on_signal(sig: libc::c_int) {
    // Not strictly async-signal-safe, but the process exits immediately
    // afterwards and the only shared state is the temp root path.
    if let Some(path) = CLEANUP_PATH.get() {
        let _ = std::fs::remove_dir_all(path);
    }
    unsafe { libc::_exit(128 + sig) }
}

#[cfg(unix)]
fn install_signal_cleanup() {
    let handler = cleanup_on_signal as usize;
    unsafe {
        libc::signal(libc::SIGINT, handler);
        libc::signal(libc::SIGTERM, handler);
        libc::signal(libc::SIGHUP, handler);
    }
}

#[cfg(not(unix))]
fn install_signal_cleanup() {}

/// Process-scoped temporary root plus per-entry working directories.
#[derive(Debug)]
pub struct RunContext {
    root: TempDir,
}

impl RunContext {
    /// Create the temporary root and register signal cleanup for it.
    pub fn create() -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix("freshen-")
            .tempdir()
            .context("Failed to create run temp directory")?;

        // First RunContext in the process wins the handler registration;
        // in practice there is exactly one per run.
        if CLEANUP_PATH.set(root.path().to_path_buf()).is_ok() {
            install_signal_cleanup();
        }

        Ok(Self { root })
    }

    /// Path of the temporary root.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Create a fresh working directory for an entry.
    pub fn create_entry_dir(&self, id: &str) -> Result<PathBuf> {
        let sanitized: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        let dir = self.root.path().join(sanitized);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create working directory for '{id}'"))?;
        Ok(dir)
    }

    /// Remove an entry's working directory. Called unconditionally after the
    /// entry finishes, whatever the outcome.
    pub fn remove_entry_dir(&self, dir: &Path) {
        if let Err(err) = std::fs::remove_dir_all(dir) {
            tracing::warn!(path = %dir.display(), %err, "failed to remove entry directory");
        }
    }
}
