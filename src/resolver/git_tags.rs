//! Candidate discovery from git tags.
//!
//! `git ls-remote --tags` gives the full tag list of a repository without a
//! clone; the newest few tags, sorted numerically, form a ready-made
//! preference-ordered candidate list for the resolver.

use anyhow::{bail, Context, Result};
use regex::Regex;

/// Default tag pattern: optional `v` prefix, `major.minor(.revision)`,
/// anchored at the end of the ref name.
pub const DEFAULT_TAG_PATTERN: &str = r"[vV]?(\d+)\.(\d+)(?:\.(\d+))?$";

/// How many tags to return by default.
pub const DEFAULT_TAG_LIMIT: usize = 3;

/// Return the latest `limit` version tags of `repo_url`, most-preferred first.
///
/// Tags are matched against `pattern` (default [`DEFAULT_TAG_PATTERN`]) and
/// ordered by their captured numeric components, not by tag history.
pub fn last_git_tags(repo_url: &str, pattern: Option<&str>, limit: usize) -> Result<Vec<String>> {
    let output = std::process::Command::new("git")
        .args(["ls-remote", "--tags", repo_url])
        .output()
        .context("Failed to run git ls-remote")?;

    if !output.status.success() {
        bail!(
            "git ls-remote failed for {repo_url}: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let listing = String::from_utf8_lossy(&output.stdout);
    extract_version_tags(&listing, pattern, limit)
}

/// Parse an `ls-remote --tags` listing into the top version tags.
pub fn extract_version_tags(
    listing: &str,
    pattern: Option<&str>,
    limit: usize,
) -> Result<Vec<String>> {
    let pattern = pattern.unwrap_or(DEFAULT_TAG_PATTERN);
    let re = Regex::new(&format!("refs/tags/({pattern})"))
        .with_context(|| format!("Invalid tag pattern: {pattern}"))?;

    let mut matches: Vec<(Vec<u64>, String)> = Vec::new();
    for line in listing.lines() {
        // Dereferenced annotated tags appear twice; skip the ^{} form.
        if line.ends_with("^{}") {
            continue;
        }
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let tag = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
        let key: Vec<u64> = caps
            .iter()
            .skip(2)
            .flatten()
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        matches.push((key, tag));
    }

    matches.sort_by(|a, b| b.0.cmp(&a.0));
    matches.dedup_by(|a, b| a.1 == b.1);

    Ok(matches.into_iter().take(limit).map(|(_, tag)| tag).collect())
}
