//! OS constraint expressions.
//!
//! An expression is a comma-separated list of alternatives; each alternative
//! is `name` or `name[tag,tag,...]`. Matching is case-insensitive and ignores
//! whitespace. The expression matches when at least one alternative matches.

use crate::error::{FreshenError, Result};
use crate::platform::descriptor::{OsFamily, PlatformDescriptor};
use std::collections::BTreeSet;
use std::str::FromStr;

/// One alternative of a constraint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Alternative {
    /// OS name: "macos", "linux", or a distro id.
    name: String,

    /// Detail tags that must all be present.
    tags: BTreeSet<String>,
}

impl Alternative {
    fn matches(&self, descriptor: &PlatformDescriptor) -> bool {
        let os_matches = match descriptor.family {
            OsFamily::MacOs => self.name == "macos",
            OsFamily::Linux => {
                self.name == "linux"
                    || descriptor
                        .distro
                        .as_deref()
                        .is_some_and(|d| d.eq_ignore_ascii_case(&self.name))
            }
        };

        os_matches && self.tags.iter().all(|t| descriptor.details.contains(t))
    }
}

/// A parsed OS constraint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsConstraint {
    alternatives: Vec<Alternative>,
}

impl OsConstraint {
    /// Check whether the expression matches the given platform.
    pub fn matches(&self, descriptor: &PlatformDescriptor) -> bool {
        self.alternatives.iter().any(|a| a.matches(descriptor))
    }
}

impl FromStr for OsConstraint {
    type Err = FreshenError;

    fn from_str(expr: &str) -> Result<Self> {
        let parse_err = |message: &str| FreshenError::ConstraintParse {
            expr: expr.to_string(),
            message: message.to_string(),
        };

        let normalized: String = expr
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if normalized.is_empty() {
            return Err(parse_err("empty expression"));
        }

        // Split on commas outside brackets; tags reuse the comma separator.
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        for c in normalized.chars() {
            match c {
                '[' => {
                    depth += 1;
                    if depth > 1 {
                        return Err(parse_err("nested brackets"));
                    }
                    current.push(c);
                }
                ']' => {
                    if depth == 0 {
                        return Err(parse_err("unmatched ']'"));
                    }
                    depth -= 1;
                    current.push(c);
                }
                ',' if depth == 0 => {
                    parts.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            }
        }
        if depth != 0 {
            return Err(parse_err("unclosed tag list"));
        }
        parts.push(current);

        let mut alternatives = Vec::new();
        for part in parts {
            if part.is_empty() {
                return Err(parse_err("empty alternative"));
            }
            let (name, tags) = match part.split_once('[') {
                Some((name, rest)) => {
                    let inner = rest
                        .strip_suffix(']')
                        .ok_or_else(|| parse_err("trailing text after tag list"))?;
                    let tags: BTreeSet<String> = inner
                        .split(',')
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect();
                    if tags.is_empty() {
                        return Err(parse_err("empty tag list"));
                    }
                    (name.to_string(), tags)
                }
                None => (part, BTreeSet::new()),
            };
            if name.is_empty() {
                return Err(parse_err("alternative without an OS name"));
            }
            alternatives.push(Alternative { name, tags });
        }

        Ok(OsConstraint { alternatives })
    }
}

/// Condition gate derived from a constraint check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Run the entry.
    Proceed,

    /// Skip the entry; `reason` is the platform's descriptive name.
    Skip { reason: String },
}

/// Proceed iff the expression matches the platform.
pub fn continue_if(expr: &str, descriptor: &PlatformDescriptor) -> Result<Gate> {
    let constraint: OsConstraint = expr.parse()?;
    if constraint.matches(descriptor) {
        Ok(Gate::Proceed)
    } else {
        Ok(Gate::Skip {
            reason: descriptor.descriptive_name(),
        })
    }
}

/// Logical complement of [`continue_if`] with identical detail text.
pub fn skip_if(expr: &str, descriptor: &PlatformDescriptor) -> Result<Gate> {
    match continue_if(expr, descriptor)? {
        Gate::Proceed => Ok(Gate::Skip {
            reason: descriptor.descriptive_name(),
        }),
        Gate::Skip { .. } => Ok(Gate::Proceed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux(distro: &str, details: &[&str]) -> PlatformDescriptor {
        PlatformDescriptor {
            family: OsFamily::Linux,
            distro: Some(distro.to_string()),
            version: "24.04".to_string(),
            codename: "noble".to_string(),
            details: details.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn macos() -> PlatformDescriptor {
        PlatformDescriptor {
            family: OsFamily::MacOs,
            distro: None,
            version: "14.2".to_string(),
            codename: String::new(),
            details: Default::default(),
        }
    }

    #[test]
    fn macos_name_matches_macos_family() {
        let c: OsConstraint = "macos".parse().unwrap();
        assert!(c.matches(&macos()));
        assert!(!c.matches(&linux("ubuntu", &[])));
    }

    #[test]
    fn linux_name_matches_any_distro() {
        let c: OsConstraint = "linux".parse().unwrap();
        assert!(c.matches(&linux("ubuntu", &[])));
        assert!(c.matches(&linux("fedora", &[])));
        assert!(!c.matches(&macos()));
    }

    #[test]
    fn distro_name_matches_that_distro_only() {
        let c: OsConstraint = "ubuntu".parse().unwrap();
        assert!(c.matches(&linux("ubuntu", &[])));
        assert!(!c.matches(&linux("fedora", &[])));
    }

    #[test]
    fn tags_are_all_or_nothing() {
        let c: OsConstraint = "linux[wsl]".parse().unwrap();
        assert!(c.matches(&linux("ubuntu", &["wsl"])));
        assert!(!c.matches(&linux("ubuntu", &[])));

        let c: OsConstraint = "linux[wsl,container]".parse().unwrap();
        assert!(c.matches(&linux("ubuntu", &["container", "wsl"])));
        assert!(!c.matches(&linux("ubuntu", &["wsl"])));
    }

    #[test]
    fn any_alternative_suffices() {
        let c: OsConstraint = "macos,ubuntu[wsl]".parse().unwrap();
        assert!(c.matches(&macos()));
        assert!(c.matches(&linux("ubuntu", &["wsl"])));
        assert!(!c.matches(&linux("ubuntu", &[])));
        assert!(!c.matches(&linux("fedora", &["wsl"])));
    }

    #[test]
    fn parsing_is_case_insensitive_and_ignores_whitespace() {
        let c: OsConstraint = " MacOS , Ubuntu [ WSL ] ".parse().unwrap();
        assert!(c.matches(&macos()));
        assert!(c.matches(&linux("ubuntu", &["wsl"])));
    }

    #[test]
    fn malformed_expressions_error() {
        assert!("".parse::<OsConstraint>().is_err());
        assert!("linux[".parse::<OsConstraint>().is_err());
        assert!("linux]".parse::<OsConstraint>().is_err());
        assert!("linux[]".parse::<OsConstraint>().is_err());
        assert!("linux[a]b".parse::<OsConstraint>().is_err());
        assert!("[wsl]".parse::<OsConstraint>().is_err());
        assert!("linux,,macos".parse::<OsConstraint>().is_err());
    }

    #[test]
    fn continue_if_proceeds_on_match() {
        let gate = continue_if("linux", &linux("ubuntu", &[])).unwrap();
        assert_eq!(gate, Gate::Proceed);
    }

    #[test]
    fn continue_if_skips_with_platform_name() {
        let gate = continue_if("macos", &linux("ubuntu", &[])).unwrap();
        assert_eq!(
            gate,
            Gate::Skip {
                reason: "ubuntu 24.04 (noble)".to_string()
            }
        );
    }

    #[test]
    fn skip_if_is_the_inverse_with_same_detail() {
        let d = linux("ubuntu", &[]);
        assert_eq!(skip_if("macos", &d).unwrap(), Gate::Proceed);
        assert_eq!(
            skip_if("linux", &d).unwrap(),
            Gate::Skip {
                reason: d.descriptive_name()
            }
        );
    }

    #[test]
    fn continue_if_propagates_parse_errors() {
        assert!(continue_if("linux[", &linux("ubuntu", &[])).is_err());
    }
}
