//! Value validators attached to field definitions.
//!
//! A validator checks one constraint on a stored [`Value`]. Blank values
//! always pass; whether a field may be blank is the field's `required` flag,
//! not a validator's concern.

use std::fmt;
use std::sync::OnceLock;

use paperwork_core::{PaperworkError, ValidationError, Value};
use regex::Regex;

/// A trait for validating field values.
///
/// # Examples
///
/// ```
/// use paperwork_forms::validators::{MaxLengthValidator, Validator};
/// use paperwork_core::Value;
///
/// let v = MaxLengthValidator::new(5);
/// assert!(v.validate(&Value::from("hi")).is_ok());
/// assert!(v.validate(&Value::from("toolong")).is_err());
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Validates the given value, returning an error if invalid.
    fn validate(&self, value: &Value) -> Result<(), PaperworkError>;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str;
}

fn invalid(message: String, code: &str) -> PaperworkError {
    PaperworkError::ValidationError(ValidationError::new(message, code))
}

/// Validates that a text value does not exceed a maximum length.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    /// The maximum allowed length in characters.
    pub max_length: usize,
}

impl MaxLengthValidator {
    /// Creates a new `MaxLengthValidator`.
    pub const fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &Value) -> Result<(), PaperworkError> {
        if let Value::String(s) = value {
            let len = s.chars().count();
            if len > self.max_length {
                return Err(invalid(
                    format!(
                        "Ensure this value has at most {} characters (it has {len}).",
                        self.max_length
                    ),
                    "max_length",
                ));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "MaxLengthValidator"
    }
}

/// Validates that a text value meets a minimum length.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    /// The minimum required length in characters.
    pub min_length: usize,
}

impl MinLengthValidator {
    /// Creates a new `MinLengthValidator`.
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &Value) -> Result<(), PaperworkError> {
        if let Value::String(s) = value {
            let len = s.trim().chars().count();
            if len > 0 && len < self.min_length {
                return Err(invalid(
                    format!(
                        "Ensure this value has at least {} characters (it has {len}).",
                        self.min_length
                    ),
                    "min_length",
                ));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "MinLengthValidator"
    }
}

/// Validates that a numeric value does not exceed a maximum.
#[derive(Debug, Clone)]
pub struct MaxValueValidator {
    /// The maximum allowed value.
    pub max_value: f64,
}

impl MaxValueValidator {
    /// Creates a new `MaxValueValidator`.
    pub const fn new(max_value: f64) -> Self {
        Self { max_value }
    }
}

impl Validator for MaxValueValidator {
    fn validate(&self, value: &Value) -> Result<(), PaperworkError> {
        match value.as_number() {
            Some(n) if n > self.max_value => Err(invalid(
                format!(
                    "Ensure this value is less than or equal to {}.",
                    self.max_value
                ),
                "max_value",
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MaxValueValidator"
    }
}

/// Validates that a numeric value is at least a minimum.
#[derive(Debug, Clone)]
pub struct MinValueValidator {
    /// The minimum allowed value.
    pub min_value: f64,
}

impl MinValueValidator {
    /// Creates a new `MinValueValidator`.
    pub const fn new(min_value: f64) -> Self {
        Self { min_value }
    }
}

impl Validator for MinValueValidator {
    fn validate(&self, value: &Value) -> Result<(), PaperworkError> {
        match value.as_number() {
            Some(n) if n < self.min_value => Err(invalid(
                format!(
                    "Ensure this value is greater than or equal to {}.",
                    self.min_value
                ),
                "min_value",
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MinValueValidator"
    }
}

/// Validates a text value against a regular expression.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
    message: String,
    code: String,
}

impl RegexValidator {
    /// Creates a validator from a pattern.
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self, PaperworkError> {
        let regex = Regex::new(pattern).map_err(|e| {
            PaperworkError::ConfigurationError(format!(
                "Invalid validator pattern '{pattern}': {e}"
            ))
        })?;
        Ok(Self {
            regex,
            message: message.into(),
            code: "invalid".to_string(),
        })
    }

    /// Overrides the error code (defaults to `invalid`).
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &Value) -> Result<(), PaperworkError> {
        if value.is_blank() {
            return Ok(());
        }
        let text = value.to_form_text();
        if self.regex.is_match(&text) {
            Ok(())
        } else {
            Err(invalid(self.message.clone(), &self.code))
        }
    }

    fn name(&self) -> &str {
        "RegexValidator"
    }
}

/// Returns the shared email pattern.
pub(crate) fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
    })
}

/// Validates an email address.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl Validator for EmailValidator {
    fn validate(&self, value: &Value) -> Result<(), PaperworkError> {
        if value.is_blank() || email_regex().is_match(value.to_form_text().trim()) {
            Ok(())
        } else {
            Err(invalid("Enter a valid email address.".to_string(), "invalid"))
        }
    }

    fn name(&self) -> &str {
        "EmailValidator"
    }
}

/// Validates the extension and size of an attached file.
#[derive(Debug, Clone, Default)]
pub struct FileValidator {
    /// Allowed lowercase extensions. Empty allows any.
    pub allowed_extensions: Vec<String>,
    /// Maximum size in bytes.
    pub max_size: Option<u64>,
}

impl FileValidator {
    /// Creates a validator accepting the given extensions.
    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_size: None,
        }
    }

    /// Sets the maximum size in bytes.
    #[must_use]
    pub const fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }
}

impl Validator for FileValidator {
    fn validate(&self, value: &Value) -> Result<(), PaperworkError> {
        let Some(file) = value.as_file() else {
            return Ok(());
        };
        if !self.allowed_extensions.is_empty() {
            let ext = file.extension().unwrap_or_default();
            if !self.allowed_extensions.contains(&ext) {
                return Err(invalid(
                    format!(
                        "File extension \"{ext}\" is not allowed. Allowed extensions are: {}.",
                        self.allowed_extensions.join(", ")
                    ),
                    "invalid_extension",
                ));
            }
        }
        if let Some(max) = self.max_size {
            if file.size > max {
                return Err(invalid(
                    format!("Ensure this file is at most {max} bytes (it is {}).", file.size),
                    "max_size",
                ));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "FileValidator"
    }
}
