//! Candidate version resolution.
//!
//! Candidates arrive in preference order, most-preferred first. The resolver
//! probes each against a URL template and returns the first reachable
//! candidate that differs from the installed version. The three "no update"
//! outcomes stay distinct: truly newest, newest we can actually fetch, and
//! nothing reachable at all.

use crate::resolver::probe::ExistenceProbe;
use anyhow::Result;

/// Placeholder substituted with the candidate in URL templates.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Outcome of a candidate resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A newer installable version was found.
    Update { installed: String, available: String },

    /// The most-preferred candidate is reachable and equals the installed
    /// version.
    AlreadyNewest { version: String },

    /// A candidate equals the installed version, but a more-preferred one was
    /// unreachable — newest *installable*, not necessarily newest.
    AlreadyNewestInstallable { version: String },

    /// No candidate was reachable at all; an environment or network problem
    /// rather than a normal no-op.
    NotFound,
}

impl Resolution {
    /// Human-readable message for reports and helper output.
    pub fn message(&self) -> String {
        match self {
            Resolution::Update {
                installed,
                available,
            } => format!("{installed} \u{2192} {available}"),
            Resolution::AlreadyNewest { version } => {
                format!("{version} is already the newest version")
            }
            Resolution::AlreadyNewestInstallable { version } => {
                format!("{version} is already the newest installable version")
            }
            Resolution::NotFound => "no installable version found".to_string(),
        }
    }
}

/// Minimum length for a string to be treated as an abbreviated content hash
/// (git's default abbreviation floor).
const MIN_HASH_LEN: usize = 7;

fn is_hash_like(s: &str) -> bool {
    s.len() >= MIN_HASH_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Comparison rule shared by the resolver and the offline comparison.
///
/// Hash-like strings (all hex digits) compare by prefix so an abbreviated
/// hash equals its full form; prefix equivalence means "no update". Anything
/// else compares by exact string equality.
pub fn same_version(installed: &str, candidate: &str) -> bool {
    if installed == candidate {
        return true;
    }
    if is_hash_like(installed) && is_hash_like(candidate) {
        return installed.starts_with(candidate) || candidate.starts_with(installed);
    }
    false
}

/// Offline freshness check: true when an update is warranted.
pub fn compare_installed_and_latest_version(installed: &str, latest: &str) -> bool {
    !same_version(installed, latest)
}

/// Find the best installable version among preference-ordered candidates.
///
/// For each candidate in order, substitute it into `url_template` and probe
/// for existence. The first candidate that exists and differs from
/// `installed` wins. See [`Resolution`] for the terminal outcomes.
pub fn find_installable_version(
    probe: &dyn ExistenceProbe,
    url_template: &str,
    candidates: &[String],
    installed: &str,
) -> Result<Resolution> {
    let mut unreachable_seen = false;

    for candidate in candidates {
        let url = substitute(url_template, candidate);
        if !probe.exists(&url)? {
            tracing::debug!(candidate, url, "candidate not reachable");
            unreachable_seen = true;
            continue;
        }

        if same_version(installed, candidate) {
            return Ok(if unreachable_seen {
                Resolution::AlreadyNewestInstallable {
                    version: candidate.clone(),
                }
            } else {
                Resolution::AlreadyNewest {
                    version: candidate.clone(),
                }
            });
        }

        return Ok(Resolution::Update {
            installed: installed.to_string(),
            available: candidate.clone(),
        });
    }

    Ok(Resolution::NotFound)
}

fn substitute(template: &str, candidate: &str) -> String {
    if template.contains(VERSION_PLACEHOLDER) {
        template.replace(VERSION_PLACEHOLDER, candidate)
    } else {
        template.replace("{}", candidate)
    }
}
