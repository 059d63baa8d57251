//! Candidate discovery from release pages.
//!
//! Some projects publish tarballs on a plain download page instead of tagged
//! releases. This extracts version strings from the page text by regex, after
//! stripping path components and known archive extensions from candidate
//! tokens, and returns the newest few in preference order.

use anyhow::{bail, Context, Result};
use regex::Regex;
use reqwest::blocking::Client;
use std::time::Duration;

/// Default version pattern, matching `major.minor(.revision)` with an
/// optional `v` prefix.
pub const DEFAULT_VERSION_PATTERN: &str = r"[vV]?(\d+)\.(\d+)(?:\.(\d+))?$";

const MAX_TRIES: usize = 3;
const RETRY_WAIT: Duration = Duration::from_secs(10);

/// Archive extensions stripped before version matching.
const KNOWN_EXTENSIONS: &[&str] = &["tar.gz", "tar.bz2", "tar.xz", "gzip", "tgz", "tar", "zip"];

/// Fetch `url` and return the latest `limit` version strings found on it,
/// most-preferred first.
pub fn latest_page_versions(url: &str, pattern: Option<&str>, limit: usize) -> Result<Vec<String>> {
    let client = Client::builder()
        .user_agent(concat!("freshen/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(15))
        .build()
        .context("Failed to build HTTP client")?;

    let mut body = None;
    for attempt in 1..=MAX_TRIES {
        match client.get(url).send() {
            Ok(resp) if resp.status().is_success() => {
                body = Some(resp.text().context("Failed to read page body")?);
                break;
            }
            Ok(resp) => {
                tracing::debug!(url, status = %resp.status(), attempt, "page fetch failed");
            }
            Err(err) => {
                tracing::debug!(url, %err, attempt, "page fetch failed");
            }
        }
        if attempt < MAX_TRIES {
            std::thread::sleep(RETRY_WAIT);
        }
    }

    let Some(body) = body else {
        bail!("{url} could not be downloaded");
    };

    extract_page_versions(&body, pattern, limit)
}

/// Extract version strings from page text.
pub fn extract_page_versions(body: &str, pattern: Option<&str>, limit: usize) -> Result<Vec<String>> {
    let pattern = pattern.unwrap_or(DEFAULT_VERSION_PATTERN);
    let re = Regex::new(pattern).with_context(|| format!("Invalid version pattern: {pattern}"))?;

    let mut matches: Vec<(Vec<u64>, String)> = Vec::new();
    for token in body.split(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>')) {
        let candidate = strip_path_and_extension(token);
        let Some(caps) = re.captures(candidate) else {
            continue;
        };
        let version = caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default();
        let key: Vec<u64> = caps
            .iter()
            .skip(1)
            .flatten()
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        if !matches.iter().any(|(_, v)| *v == version) {
            matches.push((key, version));
        }
    }

    matches.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(matches.into_iter().take(limit).map(|(_, v)| v).collect())
}

/// Keep the last path component and drop a known archive extension.
fn strip_path_and_extension(token: &str) -> &str {
    let basename = token.rsplit('/').next().unwrap_or(token);
    for ext in KNOWN_EXTENSIONS {
        if let Some(stripped) = basename.strip_suffix(&format!(".{ext}")) {
            return stripped;
        }
    }
    basename
}
