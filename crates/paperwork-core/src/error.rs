//! Core error types for the paperwork runtime.
//!
//! This module provides the error enum [`PaperworkError`] covering path
//! resolution, unknown form parts, validation, theme catalog lookups,
//! configuration, serialization and submit failures.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-path error lists).
///
/// # Examples
///
/// ```
/// use paperwork_core::error::ValidationError;
///
/// let err = ValidationError::new("This field is required.", "required");
///
/// let mut field_errors = std::collections::HashMap::new();
/// field_errors.insert(
///     "signatures.0.name".to_string(),
///     vec![ValidationError::new("This field is required.", "required")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "required", "invalid").
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: HashMap<String, String>,
    /// Per-path validation errors, keyed by canonical field path.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-path errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: HashMap::new(),
            field_errors,
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns the number of paths carrying errors.
    pub fn field_count(&self) -> usize {
        self.field_errors.len()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut paths: Vec<&String> = self.field_errors.keys().collect();
            paths.sort();
            let mut first = true;
            for path in paths {
                for error in &self.field_errors[path] {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{path}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for the paperwork runtime.
#[derive(Error, Debug)]
pub enum PaperworkError {
    // ── Addressing ───────────────────────────────────────────────────

    /// A field path could not be parsed.
    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath {
        /// The offending path text.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No collection with this name is declared on the form.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// No computed table with this name is declared on the form.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// The path points at a derived field, which only the engine writes.
    #[error("Field is derived and cannot be set directly: {0}")]
    ReadOnlyField(String),

    // ── Validation ───────────────────────────────────────────────────

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    // ── Theme ────────────────────────────────────────────────────────

    /// A theme setting named a key that is not in the catalog.
    #[error("Unknown theme option '{key}' for category '{category}'")]
    UnknownThemeOption {
        /// The theme category (e.g. "color").
        category: String,
        /// The rejected option key.
        key: String,
    },

    /// A theme category name could not be recognised.
    #[error("Unknown theme category: {0}")]
    UnknownThemeCategory(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── Submit ───────────────────────────────────────────────────────

    /// The external submit collaborator rejected the submission.
    #[error("Submit failed: {0}")]
    SubmitFailed(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PaperworkError {
    /// Returns `true` if this error is caused by user input rather than by
    /// a programming or configuration mistake.
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}

impl From<serde_json::Error> for PaperworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, PaperworkError>`.
pub type PaperworkResult<T> = Result<T, PaperworkError>;
