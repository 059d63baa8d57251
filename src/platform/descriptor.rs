//! Platform descriptor detection.
//!
//! Detection is best-effort and never fails: unknown fields stay empty and
//! simply match fewer constraint alternatives downstream.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    MacOs,
    Linux,
}

/// Detected platform information, built once per run.
#[derive(Debug, Clone)]
pub struct PlatformDescriptor {
    /// OS family.
    pub family: OsFamily,

    /// Distro identifier for Linux (e.g. "ubuntu", "fedora").
    pub distro: Option<String>,

    /// Version string (e.g. "24.04", "14.2").
    pub version: String,

    /// Release codename if the platform publishes one.
    pub codename: String,

    /// Free-form detail tags (e.g. "wsl", "container"). Order-irrelevant.
    pub details: BTreeSet<String>,
}

impl PlatformDescriptor {
    /// Detect the current platform.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::detect_macos()
        } else {
            Self::detect_linux()
        }
    }

    fn detect_macos() -> Self {
        let version = Command::new("sw_vers")
            .arg("-productVersion")
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
            .unwrap_or_default();

        Self {
            family: OsFamily::MacOs,
            distro: None,
            version,
            codename: String::new(),
            details: BTreeSet::new(),
        }
    }

    fn detect_linux() -> Self {
        let os_release = std::fs::read_to_string("/etc/os-release").unwrap_or_default();
        let mut descriptor = Self::from_os_release(&os_release);

        let proc_version = std::fs::read_to_string("/proc/version").unwrap_or_default();
        if proc_version.to_lowercase().contains("microsoft") {
            descriptor.details.insert("wsl".to_string());
        }
        if Path::new("/.dockerenv").exists() {
            descriptor.details.insert("container".to_string());
        }

        descriptor
    }

    /// Build a Linux descriptor from `/etc/os-release` contents.
    pub fn from_os_release(content: &str) -> Self {
        let mut distro = None;
        let mut version = String::new();
        let mut codename = String::new();

        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').to_string();
            match key.trim() {
                "ID" => distro = Some(value.to_lowercase()),
                "VERSION_ID" => version = value,
                "VERSION_CODENAME" => codename = value,
                _ => {}
            }
        }

        Self {
            family: OsFamily::Linux,
            distro,
            version,
            codename,
            details: BTreeSet::new(),
        }
    }

    /// Human-readable platform name, used as the detail text of OS skips.
    pub fn descriptive_name(&self) -> String {
        let mut name = match self.family {
            OsFamily::MacOs => "macOS".to_string(),
            OsFamily::Linux => self
                .distro
                .clone()
                .unwrap_or_else(|| "Linux".to_string()),
        };

        if !self.version.is_empty() {
            name.push(' ');
            name.push_str(&self.version);
        }
        if !self.codename.is_empty() {
            name.push_str(&format!(" ({})", self.codename));
        }
        if !self.details.is_empty() {
            let tags: Vec<&str> = self.details.iter().map(String::as_str).collect();
            name.push_str(&format!(" [{}]", tags.join(", ")));
        }

        name
    }
}
