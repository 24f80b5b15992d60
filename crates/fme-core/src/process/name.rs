//! Emulator process name selection.
//!
//! A single configuration channel: when `FME_FLYCAST_PROCESS_NAME` is
//! set and non-empty its value is the sole accepted name, otherwise a
//! per-OS default set applies. Windows compares case-insensitively
//! (executable names there are not case-sensitive); Linux and macOS
//! compare exactly.

/// Environment variable overriding the default process name set.
pub const PROCESS_NAME_ENV: &str = "FME_FLYCAST_PROCESS_NAME";

#[cfg(target_os = "windows")]
const DEFAULT_NAMES: &[&str] = &["flycast.exe"];

#[cfg(target_os = "linux")]
const DEFAULT_NAMES: &[&str] = &["flycast", "flycast-qt", "flycast-qt6"];

#[cfg(target_os = "macos")]
const DEFAULT_NAMES: &[&str] = &["Flycast", "flycast", "flycast-qt", "flycast-qt6"];

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const DEFAULT_NAMES: &[&str] = &[];

#[derive(Debug, Clone)]
pub struct NameSelector {
    override_name: Option<String>,
    case_insensitive: bool,
}

impl NameSelector {
    /// Build the selector for the current platform, consulting the
    /// environment override.
    pub fn from_env() -> Self {
        let override_name = std::env::var(PROCESS_NAME_ENV)
            .ok()
            .filter(|name| !name.is_empty());
        Self {
            override_name,
            case_insensitive: cfg!(target_os = "windows"),
        }
    }

    #[cfg(test)]
    pub fn with_override(name: &str, case_insensitive: bool) -> Self {
        Self {
            override_name: Some(name.to_string()),
            case_insensitive,
        }
    }

    #[cfg(test)]
    pub fn defaults(case_insensitive: bool) -> Self {
        Self {
            override_name: None,
            case_insensitive,
        }
    }

    /// Whether `candidate` is an accepted emulator executable name.
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.override_name {
            Some(wanted) => self.name_eq(candidate, wanted),
            None => DEFAULT_NAMES.iter().any(|wanted| self.name_eq(candidate, wanted)),
        }
    }

    fn name_eq(&self, a: &str, b: &str) -> bool {
        if self.case_insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }
}
