//! Installed-version queries.
//!
//! Absence of a tool is a normal, representable state: queries report the
//! [`NONE_SENTINEL`] instead of failing. Lookups go through a [`CommandIndex`]
//! that caches PATH resolution and is refreshed after every entry, since an
//! entry may have just installed a binary the next entry needs to detect.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Version reported when a tool is not installed or not queryable.
pub const NONE_SENTINEL: &str = "(none)";

/// Cached command-location index over the search path.
#[derive(Debug, Default)]
pub struct CommandIndex {
    dirs: Vec<PathBuf>,
    explicit_dirs: bool,
    cache: HashMap<String, Option<PathBuf>>,
}

impl CommandIndex {
    /// Build an index over the current `PATH`.
    pub fn new() -> Self {
        let mut index = Self::default();
        index.refresh();
        index
    }

    /// Build an index over explicit directories (for tests and sandboxes).
    /// Explicit directories survive [`refresh`](Self::refresh).
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            explicit_dirs: true,
            cache: HashMap::new(),
        }
    }

    /// Drop cached locations; a `PATH`-backed index also re-reads `PATH`.
    pub fn refresh(&mut self) {
        self.cache.clear();
        if !self.explicit_dirs {
            self.dirs = std::env::var_os("PATH")
                .map(|p| std::env::split_paths(&p).collect())
                .unwrap_or_default();
        }
    }

    /// Resolve a command name to an executable path, caching the answer.
    pub fn lookup(&mut self, name: &str) -> Option<PathBuf> {
        if let Some(cached) = self.cache.get(name) {
            return cached.clone();
        }

        let found = self
            .dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|p| is_executable(p));
        self.cache.insert(name.to_string(), found.clone());
        found
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Run an invocation like `"vim --version"` and capture its version output.
///
/// Reports [`NONE_SENTINEL`] when the executable is not on the search path or
/// produces no output. Both streams are captured; many tools print their
/// version to stderr.
pub fn query_installed_version(index: &mut CommandIndex, invocation: &str) -> String {
    let mut parts = invocation.split_whitespace();
    let Some(program) = parts.next() else {
        return NONE_SENTINEL.to_string();
    };
    let Some(path) = index.lookup(program) else {
        return NONE_SENTINEL.to_string();
    };

    let output = Command::new(path).args(parts).output();
    match output {
        Ok(out) => {
            let stdout = String::from_utf8_lossy(&out.stdout);
            let text = if stdout.trim().is_empty() {
                String::from_utf8_lossy(&out.stderr).trim().to_string()
            } else {
                stdout.trim().to_string()
            };
            if text.is_empty() {
                NONE_SENTINEL.to_string()
            } else {
                text
            }
        }
        Err(_) => NONE_SENTINEL.to_string(),
    }
}

/// Query a companion `"<name>-version"` helper script.
///
/// With `check_existence`, the primary command must itself resolve first.
/// Reports [`NONE_SENTINEL`] when either check fails.
pub fn query_version_script(
    index: &mut CommandIndex,
    name: &str,
    check_existence: bool,
) -> String {
    if check_existence && index.lookup(name).is_none() {
        return NONE_SENTINEL.to_string();
    }

    let helper = format!("{name}-version");
    if index.lookup(&helper).is_none() {
        return NONE_SENTINEL.to_string();
    }

    query_installed_version(index, &helper)
}

/// Extract a dotted version number from command output, if any.
pub fn extract_version(output: &str) -> Option<String> {
    let patterns = [r"(\d+\.\d+\.\d+)", r"version\s+(\d+\.\d+)", r"v(\d+\.\d+)"];

    for pattern in &patterns {
        if let Ok(re) = regex::Regex::new(pattern) {
            if let Some(caps) = re.captures(output) {
                if let Some(m) = caps.get(1) {
                    return Some(m.as_str().to_string());
                }
            }
        }
    }

    None
}
