//! Field definitions and type-level validation.
//!
//! Each [`FieldDef`] describes one input of a form: its [`FieldKind`], label,
//! widget, validators and custom error messages. The same definitions are
//! used for top-level fields and for the per-item fields of a collection.

use std::collections::HashMap;

use chrono::NaiveDate;
use paperwork_core::utils::text::humanize_key;
use paperwork_core::value::DATE_FORMAT;
use paperwork_core::{PaperworkError, Value};

use crate::validators::{email_regex, Validator};
use crate::widgets::WidgetType;

/// The type of a field, with its type-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Single-line text.
    Text {
        /// Minimum length (characters).
        min_length: Option<usize>,
        /// Maximum length (characters).
        max_length: Option<usize>,
    },
    /// Multi-line text.
    LongText {
        /// Maximum length (characters).
        max_length: Option<usize>,
    },
    /// A number (integer or decimal).
    Number {
        /// Minimum allowed value.
        min_value: Option<f64>,
        /// Maximum allowed value.
        max_value: Option<f64>,
    },
    /// A calendar date.
    Date,
    /// An email address.
    Email,
    /// A yes/no checkbox.
    Checkbox,
    /// One value out of a fixed list.
    Choice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
    /// A picked file.
    File,
    /// A captured signature.
    Signature,
}

/// Complete definition of a form field.
///
/// Fields are optional unless marked [`required`](Self::required).
#[derive(Debug)]
pub struct FieldDef {
    /// The field key (last segment of its path).
    pub name: String,
    /// The field type, controlling input parsing and type checks.
    pub kind: FieldKind,
    /// Whether this field must be filled in.
    pub required: bool,
    /// Initial value.
    pub initial: Option<Value>,
    /// Help text displayed next to the Edit control.
    pub help_text: String,
    /// Human-readable label.
    pub label: String,
    /// The widget used in Edit mode.
    pub widget: WidgetType,
    /// Additional validators applied after the type checks.
    pub validators: Vec<Box<dyn Validator>>,
    /// Custom error messages keyed by error code.
    pub error_messages: HashMap<String, String>,
    /// Whether the field is shown but not editable.
    pub disabled: bool,
}

impl FieldDef {
    /// Creates a new `FieldDef` with the default widget for its kind and a
    /// label derived from the key.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let widget = default_widget_for_kind(&kind);
        let label = humanize_key(&name);
        Self {
            name,
            kind,
            required: false,
            initial: None,
            help_text: String::new(),
            label,
            widget,
            validators: Vec::new(),
            error_messages: HashMap::new(),
            disabled: false,
        }
    }

    /// A single-line text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Text {
                min_length: None,
                max_length: None,
            },
        )
    }

    /// A multi-line text field.
    pub fn long_text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::LongText { max_length: None })
    }

    /// A number field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Number {
                min_value: None,
                max_value: None,
            },
        )
    }

    /// A date field.
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// An email field.
    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Email)
    }

    /// A checkbox field.
    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Checkbox)
    }

    /// A choice field.
    pub fn choice<I, V, L>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        let choices = choices
            .into_iter()
            .map(|(v, l)| (v.into(), l.into()))
            .collect();
        Self::new(name, FieldKind::Choice { choices })
    }

    /// A file field.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::File)
    }

    /// A signature field.
    pub fn signature(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Signature)
    }

    /// Sets whether this field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the widget type.
    #[must_use]
    pub fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = widget;
        self
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Sets a custom error message for a given code.
    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), msg.into());
        self
    }

    /// Sets whether this field is disabled.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns the choices of a choice field.
    pub fn choices(&self) -> &[(String, String)] {
        match &self.kind {
            FieldKind::Choice { choices } => choices,
            _ => &[],
        }
    }

    /// Returns the initial value, or `Null`.
    pub fn initial_value(&self) -> Value {
        self.initial.clone().unwrap_or_default()
    }

    /// Converts the raw text of an Edit control into a stored value.
    ///
    /// Parsing never fails: text that does not fit the kind is kept as a
    /// string so the control keeps showing it and validation can report it.
    pub fn parse_input(&self, raw: &str, date_format: &str) -> Value {
        if raw.is_empty() {
            return if matches!(self.kind, FieldKind::Checkbox) {
                Value::Bool(false)
            } else {
                Value::Null
            };
        }
        match &self.kind {
            FieldKind::Number { .. } => {
                let trimmed = raw.trim();
                trimmed
                    .parse::<i64>()
                    .map(Value::Int)
                    .ok()
                    .or_else(|| {
                        trimmed
                            .parse::<f64>()
                            .ok()
                            .filter(|n| n.is_finite())
                            .map(Value::Float)
                    })
                    .unwrap_or_else(|| Value::String(raw.to_string()))
            }
            FieldKind::Date => parse_date(raw.trim(), date_format)
                .map_or_else(|| Value::String(raw.to_string()), Value::Date),
            FieldKind::Checkbox => Value::Bool(matches!(
                raw.to_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )),
            _ => Value::String(raw.to_string()),
        }
    }

    /// Validates a stored value: required check, type checks, then validators.
    ///
    /// Errors accumulate; all messages are returned at once.
    pub fn clean(&self, value: &Value) -> Result<(), Vec<String>> {
        if self.disabled {
            return Ok(());
        }

        let missing = value.is_blank() || matches!(value, Value::Bool(false));
        if self.required && missing {
            return Err(vec![self.message("required", "This field is required.")]);
        }
        if value.is_blank() {
            return Ok(());
        }

        let mut errors = self.type_errors(value);
        for validator in &self.validators {
            if let Err(err) = validator.validate(value) {
                errors.push(match err {
                    PaperworkError::ValidationError(ve) => self.message(&ve.code, &ve.message),
                    other => other.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn type_errors(&self, value: &Value) -> Vec<String> {
        let mut errors = Vec::new();
        match &self.kind {
            FieldKind::Text {
                min_length,
                max_length,
            } => {
                let len = value.to_form_text().trim().chars().count();
                if let Some(min) = min_length {
                    if len < *min {
                        errors.push(format!(
                            "Ensure this value has at least {min} characters (it has {len})."
                        ));
                    }
                }
                if let Some(max) = max_length {
                    if len > *max {
                        errors.push(format!(
                            "Ensure this value has at most {max} characters (it has {len})."
                        ));
                    }
                }
            }
            FieldKind::LongText {
                max_length: Some(max),
            } => {
                let len = value.to_form_text().chars().count();
                if len > *max {
                    errors.push(format!(
                        "Ensure this value has at most {max} characters (it has {len})."
                    ));
                }
            }
            FieldKind::Number {
                min_value,
                max_value,
            } => match value.as_number() {
                Some(n) => {
                    if let Some(min) = min_value {
                        if n < *min {
                            errors.push(format!(
                                "Ensure this value is greater than or equal to {min}."
                            ));
                        }
                    }
                    if let Some(max) = max_value {
                        if n > *max {
                            errors.push(format!(
                                "Ensure this value is less than or equal to {max}."
                            ));
                        }
                    }
                }
                None => errors.push(self.message("invalid", "Enter a number.")),
            },
            FieldKind::Date => {
                let ok = match value {
                    Value::Date(_) => true,
                    Value::String(s) => parse_date(s.trim(), DATE_FORMAT).is_some(),
                    _ => false,
                };
                if !ok {
                    errors.push(self.message("invalid", "Enter a valid date."));
                }
            }
            FieldKind::Email => {
                if !email_regex().is_match(value.to_form_text().trim()) {
                    errors.push(self.message("invalid", "Enter a valid email address."));
                }
            }
            FieldKind::Choice { choices } => {
                let text = value.to_form_text();
                if !choices.iter().any(|(v, _)| *v == text) {
                    errors.push(format!(
                        "Select a valid choice. {text} is not one of the available choices."
                    ));
                }
            }
            FieldKind::File => {
                if !matches!(value, Value::File(_) | Value::String(_)) {
                    errors.push(self.message("invalid", "No file was chosen."));
                }
            }
            FieldKind::LongText { max_length: None }
            | FieldKind::Checkbox
            | FieldKind::Signature => {}
        }
        errors
    }

    fn message(&self, code: &str, default: &str) -> String {
        self.error_messages
            .get(code)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

fn parse_date(text: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, format)
        .or_else(|_| NaiveDate::parse_from_str(text, DATE_FORMAT))
        .ok()
}

/// Returns the default widget type for a field kind.
pub const fn default_widget_for_kind(kind: &FieldKind) -> WidgetType {
    match kind {
        FieldKind::Text { .. } => WidgetType::TextInput,
        FieldKind::LongText { .. } => WidgetType::Textarea,
        FieldKind::Number { .. } => WidgetType::NumberInput,
        FieldKind::Date => WidgetType::DateInput,
        FieldKind::Email => WidgetType::EmailInput,
        FieldKind::Checkbox => WidgetType::CheckboxInput,
        FieldKind::Choice { .. } => WidgetType::Select,
        FieldKind::File => WidgetType::FileInput,
        FieldKind::Signature => WidgetType::SignaturePad,
    }
}
