//! Bound fields: a field definition paired with a path, a value and errors.
//!
//! A [`BoundField`] is what a renderer consumes. It owns a snapshot of the
//! field metadata so it can outlive the borrow of the form model.

use paperwork_core::utils::text::escape_html;
use paperwork_core::Value;

use crate::fields::FieldDef;
use crate::widgets::{self, Attrs, Widget};

/// Minimal field definition snapshot stored in a `BoundField`.
#[derive(Debug, Clone)]
pub struct BoundFieldDef {
    /// The field key.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Help text.
    pub help_text: String,
    /// Whether the field is required.
    pub required: bool,
    /// Whether the field is disabled.
    pub disabled: bool,
}

/// A field bound to one path of the form values.
#[derive(Debug)]
pub struct BoundField {
    /// The canonical field path (also the control's `name`).
    pub path: String,
    /// Field metadata.
    pub field: BoundFieldDef,
    /// The stored value.
    pub value: Value,
    /// Validation error messages for this path.
    pub errors: Vec<String>,
    /// The Edit-mode widget.
    pub widget: Box<dyn Widget>,
}

impl BoundField {
    /// Binds a field definition to a path, its value and its errors.
    pub fn new(
        field_def: &FieldDef,
        path: impl Into<String>,
        value: Value,
        errors: Vec<String>,
    ) -> Self {
        Self {
            path: path.into(),
            field: BoundFieldDef {
                name: field_def.name.clone(),
                label: field_def.label.clone(),
                help_text: field_def.help_text.clone(),
                required: field_def.required,
                disabled: field_def.disabled,
            },
            value,
            errors,
            widget: widgets::create_widget(field_def.widget, field_def.choices()),
        }
    }

    /// Returns the form text both render modes read.
    pub fn text(&self) -> String {
        self.value.to_form_text()
    }

    /// Renders the Edit control for this field.
    pub fn render_widget(&self, extra_attrs: &Attrs) -> String {
        let mut attrs = extra_attrs.clone();
        attrs.entry("id".to_string()).or_insert_with(|| self.auto_id());
        if self.field.disabled {
            attrs.insert("disabled".to_string(), "disabled".to_string());
        }
        if self.field.required {
            attrs.insert("required".to_string(), "required".to_string());
        }
        if self.has_errors() {
            attrs.insert("aria-invalid".to_string(), "true".to_string());
        }
        self.widget.render(&self.path, &self.text(), &attrs)
    }

    /// Renders a `<label>` element for this field.
    pub fn label_tag(&self) -> String {
        let label = escape_html(&self.field.label);
        let label_id = self.widget.id_for_label(&self.auto_id());
        if label_id.is_empty() {
            format!("<label>{label}</label>")
        } else {
            format!(r#"<label for="{label_id}">{label}</label>"#)
        }
    }

    /// Returns the HTML `id` derived from the path.
    pub fn auto_id(&self) -> String {
        let slug: String = self
            .path
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("id_{slug}")
    }

    /// Returns `true` if this field has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Renders the error list as an HTML `<ul>` element.
    pub fn errors_as_ul(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        let items: String = self
            .errors
            .iter()
            .map(|e| format!("<li>{}</li>", escape_html(e)))
            .collect();
        format!(r#"<ul class="errorlist">{items}</ul>"#)
    }
}
