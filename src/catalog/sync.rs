//! Catalog source synchronization.
//!
//! The configured upstream is synchronized before any entries run: an
//! existing clone that still points at the configured URL is fast-forwarded
//! in place; anything else is replaced by a fresh clone.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

fn git(args: &[&str], cwd: Option<&Path>) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn origin_url(dir: &Path) -> Option<String> {
    git(&["remote", "get-url", "origin"], Some(dir)).ok()
}

/// Synchronize the catalog clone at `dir` with `url`.
///
/// Fast-forwards in place when `dir` is already a clone of `url`; otherwise
/// removes whatever is there and clones from scratch (shallow).
pub fn sync_catalog(dir: &Path, url: &str, git_ref: Option<&str>) -> Result<()> {
    if dir.join(".git").exists() && origin_url(dir).as_deref() == Some(url) {
        tracing::info!(path = %dir.display(), "fast-forwarding catalog");
        git(&["fetch", "origin"], Some(dir))?;
        let refspec = match git_ref {
            Some(r) => format!("origin/{r}"),
            None => "origin/HEAD".to_string(),
        };
        git(&["merge", "--ff-only", &refspec], Some(dir))?;
        return Ok(());
    }

    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to clear stale catalog at {}", dir.display()))?;
    }
    if let Some(parent) = dir.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(url, path = %dir.display(), "cloning catalog");
    let dir_str = dir.to_string_lossy();
    let mut args = vec!["clone", "--depth", "1"];
    if let Some(r) = git_ref {
        args.extend(["--branch", r]);
    }
    args.extend([url, dir_str.as_ref()]);
    git(&args, None)?;

    Ok(())
}
