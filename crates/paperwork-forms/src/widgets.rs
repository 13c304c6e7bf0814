//! Edit-mode widgets.
//!
//! A widget renders the interactive HTML control for one field path. The
//! control's `name` is the canonical field path and its value is the value's
//! form text, so whatever the control shows is exactly what Print mode
//! projects for the same path.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use paperwork_core::utils::text::escape_html;

/// Enumerates the built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="date">`.
    DateInput,
    /// `<input type="hidden">`.
    HiddenInput,
    /// `<textarea>`.
    Textarea,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<select>`.
    Select,
    /// `<input type="file">` plus the chosen file's name.
    FileInput,
    /// A signature capture surface backed by a hidden input.
    SignaturePad,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::DateInput => "DateInput",
            Self::HiddenInput => "HiddenInput",
            Self::Textarea => "Textarea",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::FileInput => "FileInput",
            Self::SignaturePad => "SignaturePad",
        };
        write!(f, "{name}")
    }
}

/// Extra HTML attributes, rendered in key order.
pub type Attrs = BTreeMap<String, String>;

/// A trait for Edit-mode controls.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the widget type enum variant.
    fn widget_type(&self) -> WidgetType;

    /// Renders the control.
    ///
    /// `name` is the canonical field path and `value` the form text bound to it.
    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String;

    /// Returns the HTML `id` a `<label>` should target.
    fn id_for_label(&self, id: &str) -> String {
        id.to_string()
    }
}

/// Formats attributes as ` key="value" key2="value2"`.
fn render_attrs(attrs: &Attrs) -> String {
    let mut out = String::new();
    for (k, v) in attrs {
        let _ = write!(out, r#" {k}="{}""#, escape_html(v));
    }
    out
}

/// A single-line `<input>` of a fixed type.
#[derive(Debug, Clone)]
pub struct Input {
    input_type: &'static str,
    widget_type: WidgetType,
}

impl Input {
    /// `<input type="text">`.
    pub const fn text() -> Self {
        Self {
            input_type: "text",
            widget_type: WidgetType::TextInput,
        }
    }

    /// `<input type="number">`.
    pub const fn number() -> Self {
        Self {
            input_type: "number",
            widget_type: WidgetType::NumberInput,
        }
    }

    /// `<input type="email">`.
    pub const fn email() -> Self {
        Self {
            input_type: "email",
            widget_type: WidgetType::EmailInput,
        }
    }

    /// `<input type="date">`.
    pub const fn date() -> Self {
        Self {
            input_type: "date",
            widget_type: WidgetType::DateInput,
        }
    }

    /// `<input type="hidden">`.
    pub const fn hidden() -> Self {
        Self {
            input_type: "hidden",
            widget_type: WidgetType::HiddenInput,
        }
    }
}

impl Widget for Input {
    fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        format!(
            r#"<input type="{}" name="{}" value="{}"{} />"#,
            self.input_type,
            escape_html(name),
            escape_html(value),
            render_attrs(attrs)
        )
    }
}

/// A `<textarea>` widget.
#[derive(Debug, Clone)]
pub struct Textarea;

impl Widget for Textarea {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Textarea
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        format!(
            r#"<textarea name="{}"{}>{}</textarea>"#,
            escape_html(name),
            render_attrs(attrs),
            escape_html(value)
        )
    }
}

/// A `<input type="checkbox">` widget. The bound text is `true` or `false`.
#[derive(Debug, Clone)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CheckboxInput
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        let checked = matches!(value, "true" | "on" | "1");
        let checked_attr = if checked { " checked" } else { "" };
        format!(
            r#"<input type="checkbox" name="{}" value="true"{checked_attr}{} />"#,
            escape_html(name),
            render_attrs(attrs)
        )
    }
}

/// A `<select>` widget.
#[derive(Debug, Clone)]
pub struct Select {
    /// The available choices as `(value, display_label)` pairs.
    pub choices: Vec<(String, String)>,
}

impl Select {
    /// Creates a new `Select` widget with the given choices.
    pub const fn new(choices: Vec<(String, String)>) -> Self {
        Self { choices }
    }
}

impl Widget for Select {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Select
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        let mut options = String::from(r#"<option value=""></option>"#);
        for (val, label) in &self.choices {
            let selected = if val == value { " selected" } else { "" };
            let _ = write!(
                options,
                r#"<option value="{}"{selected}>{}</option>"#,
                escape_html(val),
                escape_html(label)
            );
        }
        format!(
            r#"<select name="{}"{}>{options}</select>"#,
            escape_html(name),
            render_attrs(attrs)
        )
    }
}

/// A file picker. Browsers cannot prefill a file input, so the bound file
/// name is shown next to it.
#[derive(Debug, Clone)]
pub struct FileInput;

impl Widget for FileInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::FileInput
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        format!(
            r#"<input type="file" name="{}" data-file-name="{value}"{} /><span class="file-name">{value}</span>"#,
            escape_html(name),
            render_attrs(attrs),
            value = escape_html(value)
        )
    }
}

/// A signature capture surface. Drawing is handled by the host; the
/// captured signature travels through the hidden input.
#[derive(Debug, Clone)]
pub struct SignaturePad;

impl Widget for SignaturePad {
    fn widget_type(&self) -> WidgetType {
        WidgetType::SignaturePad
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        let name = escape_html(name);
        let value = escape_html(value);
        format!(
            r#"<div class="signature-pad" data-target="{name}"{}></div><input type="hidden" name="{name}" value="{value}" />"#,
            render_attrs(attrs)
        )
    }

    fn id_for_label(&self, _id: &str) -> String {
        String::new()
    }
}

/// Creates a boxed widget, populating choices for selects.
pub fn create_widget(widget_type: WidgetType, choices: &[(String, String)]) -> Box<dyn Widget> {
    match widget_type {
        WidgetType::TextInput => Box::new(Input::text()),
        WidgetType::NumberInput => Box::new(Input::number()),
        WidgetType::EmailInput => Box::new(Input::email()),
        WidgetType::DateInput => Box::new(Input::date()),
        WidgetType::HiddenInput => Box::new(Input::hidden()),
        WidgetType::Textarea => Box::new(Textarea),
        WidgetType::CheckboxInput => Box::new(CheckboxInput),
        WidgetType::Select => Box::new(Select::new(choices.to_vec())),
        WidgetType::FileInput => Box::new(FileInput),
        WidgetType::SignaturePad => Box::new(SignaturePad),
    }
}
