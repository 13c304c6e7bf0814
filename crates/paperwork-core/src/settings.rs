//! Settings system for the paperwork runtime.
//!
//! This module provides the [`Settings`] struct, which holds runtime
//! configuration shared by every form, and [`LazySettings`], a globally
//! accessible, lazily-initialized settings instance.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// The complete set of runtime settings.
///
/// # Examples
///
/// ```
/// use paperwork_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.print_placeholder, "N/A");
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Rendering ────────────────────────────────────────────────────

    /// Text shown in Print mode in place of an empty value.
    pub print_placeholder: String,
    /// `chrono` format used when parsing date inputs.
    pub date_format: String,

    // ── Theme ────────────────────────────────────────────────────────

    /// Optional path to a theme catalog file (TOML or JSON) replacing the
    /// built-in catalog.
    pub theme_catalog: Option<PathBuf>,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level filter (e.g. "info", "paperwork_forms=debug").
    pub log_level: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            print_placeholder: "N/A".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            theme_catalog: None,
            log_level: "info".to_string(),
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup. Readers use
/// [`get`](LazySettings::get), which falls back to defaults when nothing was
/// configured.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings.
    ///
    /// Returns the rejected settings if configuration already happened.
    pub fn configure(&self, settings: Settings) -> Result<(), Settings> {
        self.inner.set(settings)
    }

    /// Returns the configured settings, or the defaults if none were configured.
    pub fn get(&self) -> &Settings {
        self.inner.get_or_init(Settings::default)
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.print_placeholder, "N/A");
        assert_eq!(s.date_format, "%Y-%m-%d");
        assert!(s.theme_catalog.is_none());
        assert_eq!(s.log_level, "info");
        assert!(s.extra.is_empty());
    }

    #[test]
    fn test_lazy_settings_configure_and_get() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());

        let settings = Settings {
            print_placeholder: "-".to_string(),
            ..Settings::default()
        };
        assert!(lazy.configure(settings).is_ok());
        assert!(lazy.is_configured());
        assert_eq!(lazy.get().print_placeholder, "-");
    }

    #[test]
    fn test_lazy_settings_double_configure_rejected() {
        let lazy = LazySettings::new();
        assert!(lazy.configure(Settings::default()).is_ok());
        let rejected = lazy.configure(Settings {
            debug: false,
            ..Settings::default()
        });
        assert!(rejected.is_err());
        assert!(lazy.get().debug);
    }

    #[test]
    fn test_lazy_settings_defaults_when_unconfigured() {
        let lazy = LazySettings::new();
        assert_eq!(lazy.get().print_placeholder, "N/A");
    }
}
