//! Validation pipeline for a form instance.
//!
//! Validation runs in three passes:
//! 1. Top-level fields ([`clean_fields`])
//! 2. Collection entry fields and entry-count bounds ([`clean_collections`])
//! 3. Form-level rules declared on the model
//!
//! Errors accumulate rather than short-circuiting and are keyed by canonical
//! field path, so every problem is reported at once and renders next to the
//! control it belongs to.

use std::collections::{BTreeMap, HashMap};

use paperwork_core::{ValidationError, Value};

use crate::collection::CollectionSpec;
use crate::fields::FieldDef;
use crate::model::FormModel;
use crate::values::FormValues;

/// The key under which form-level errors not tied to a path are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Error messages keyed by canonical field path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one message for `path`.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_default().push(message.into());
    }

    /// Adds several messages for `path`.
    pub fn extend(&mut self, path: impl Into<String>, messages: impl IntoIterator<Item = String>) {
        let messages: Vec<String> = messages.into_iter().collect();
        if !messages.is_empty() {
            self.0.entry(path.into()).or_default().extend(messages);
        }
    }

    /// Returns the messages for `path`.
    pub fn get(&self, path: &str) -> &[String] {
        self.0.get(path).map_or(&[], Vec::as_slice)
    }

    /// Returns the form-level messages.
    pub fn non_field_errors(&self) -> &[String] {
        self.get(NON_FIELD_ERRORS)
    }

    /// Removes the messages for `path`. Returns `true` if there were any.
    pub fn clear_path(&mut self, path: &str) -> bool {
        self.0.remove(path).is_some()
    }

    /// Removes the messages for `root` and every path below it.
    pub fn clear_under(&mut self, root: &str) {
        let prefix = format!("{root}.");
        self.0.retain(|path, _| path != root && !path.starts_with(&prefix));
    }

    /// Removes every message.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns `true` if no path has errors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of paths with errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates `(path, messages)` in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Converts into the core error type carried by failed submissions.
    pub fn to_validation_error(&self) -> ValidationError {
        let field_errors: HashMap<String, Vec<ValidationError>> = self
            .0
            .iter()
            .map(|(path, messages)| {
                let errors = messages
                    .iter()
                    .map(|m| ValidationError::new(m.clone(), "invalid"))
                    .collect();
                (path.clone(), errors)
            })
            .collect();
        ValidationError::with_field_errors(field_errors)
    }
}

/// Validates every top-level field.
///
/// Fields with no stored value are checked as `Null`.
pub fn clean_fields(fields: &[FieldDef], values: &FormValues, errors: &mut ValidationErrors) {
    for field in fields {
        let value = values.scalar(&field.name).cloned().unwrap_or_default();
        if let Err(messages) = field.clean(&value) {
            errors.extend(field.name.clone(), messages);
        }
    }
}

/// Validates every collection entry and the entry-count bounds.
///
/// Entry errors use index paths (`signatures.1.name`); bounds errors use the
/// collection name.
pub fn clean_collections(
    specs: &[CollectionSpec],
    values: &FormValues,
    errors: &mut ValidationErrors,
) {
    for spec in specs {
        let Ok(collection) = values.collection(&spec.name) else {
            continue;
        };

        for (index, item) in collection.iter().enumerate() {
            for field in &spec.fields {
                let value = item.get(&field.name).unwrap_or(&Value::Null);
                if let Err(messages) = field.clean(value) {
                    let path = format!("{}.{index}.{}", spec.name, field.name);
                    errors.extend(path, messages);
                }
            }
        }

        let count = collection.len();
        if count < spec.min_items {
            errors.add(
                spec.name.clone(),
                format!("Please submit at least {} entries.", spec.min_items),
            );
        }
        if let Some(max) = spec.max_items {
            if count > max {
                errors.add(spec.name.clone(), format!("Please submit at most {max} entries."));
            }
        }
    }
}

/// Runs the full pipeline: fields, collections, then form-level rules.
pub fn full_clean(model: &FormModel, values: &FormValues) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    clean_fields(model.fields(), values, &mut errors);
    clean_collections(model.collections(), values, &mut errors);
    for rule in model.rules() {
        rule(values, &mut errors);
    }
    errors
}
