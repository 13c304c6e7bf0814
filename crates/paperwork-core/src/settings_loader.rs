//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `PAPERWORK_DEBUG` | `debug` |
//! | `PAPERWORK_LOG_LEVEL` | `log_level` |
//! | `PAPERWORK_PRINT_PLACEHOLDER` | `print_placeholder` |
//! | `PAPERWORK_DATE_FORMAT` | `date_format` |
//! | `PAPERWORK_THEME_CATALOG` | `theme_catalog` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use paperwork_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/paperwork.toml").unwrap();
//! let settings = settings_loader::from_json_file_with_env("config/paperwork.json").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::PaperworkError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, PaperworkError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| PaperworkError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, PaperworkError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, PaperworkError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, PaperworkError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| PaperworkError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, PaperworkError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, PaperworkError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `PAPERWORK_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("PAPERWORK_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("PAPERWORK_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("PAPERWORK_PRINT_PLACEHOLDER") {
        settings.print_placeholder = val;
    }

    if let Ok(val) = std::env::var("PAPERWORK_DATE_FORMAT") {
        settings.date_format = val;
    }

    if let Ok(val) = std::env::var("PAPERWORK_THEME_CATALOG") {
        settings.theme_catalog = (!val.trim().is_empty()).then(|| PathBuf::from(val));
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, PaperworkError> {
    std::fs::read_to_string(path).map_err(|e| {
        PaperworkError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(
    overrides: serde_json::Value,
    format: &str,
) -> Result<Settings, PaperworkError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        PaperworkError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;
    let merged = merge_json(default_json, overrides);
    serde_json::from_value(merged).map_err(|e| {
        PaperworkError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
pub(crate) fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
pub fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

/// Parses a TOML document into plain JSON, for other crates that merge
/// file contents over defaults the same way settings do.
pub fn toml_str_to_json(toml_str: &str) -> Result<serde_json::Value, PaperworkError> {
    let value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| PaperworkError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    Ok(toml_to_json(value))
}
