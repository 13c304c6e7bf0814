//! Render modes and field renderers.
//!
//! A [`RenderContext`] carries the [`RenderMode`] chosen by the host, the
//! placeholder Print mode shows for empty values, and optionally a
//! [`ThemeHandle`]. The context has no setter: switching modes means building
//! a new context.
//!
//! The mode is resolved once per render pass through [`renderer_for`], which
//! returns the [`FieldRenderer`] strategy for that mode. Both strategies read
//! a field through [`BoundField::text`], so Edit and Print always show the
//! same logical value for the same path.

use std::fmt;

use serde::{Deserialize, Serialize};

use paperwork_core::utils::text::escape_html;
use paperwork_core::Settings;
use paperwork_theme::ThemeHandle;

use crate::bound_field::BoundField;
use crate::widgets::Attrs;

/// The two render modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Interactive controls bound to field paths.
    #[default]
    Edit,
    /// Read-only projection for printing.
    Print,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Edit => "edit",
            Self::Print => "print",
        })
    }
}

/// The default text Print mode shows in place of an empty value.
pub const DEFAULT_PLACEHOLDER: &str = "N/A";

/// Read-only render settings for one pass over a form.
#[derive(Debug, Clone)]
pub struct RenderContext {
    mode: RenderMode,
    placeholder: String,
    theme: Option<ThemeHandle>,
}

impl RenderContext {
    /// Creates a context for `mode` with the default placeholder.
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            theme: None,
        }
    }

    /// Shorthand for an Edit context.
    pub fn edit() -> Self {
        Self::new(RenderMode::Edit)
    }

    /// Shorthand for a Print context.
    pub fn print() -> Self {
        Self::new(RenderMode::Print)
    }

    /// Creates a context taking the placeholder from runtime settings.
    pub fn from_settings(mode: RenderMode, settings: &Settings) -> Self {
        Self::new(mode).with_placeholder(settings.print_placeholder.clone())
    }

    /// Overrides the Print placeholder.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Attaches a theme handle; rendered forms then carry its variables.
    #[must_use]
    pub fn with_theme(mut self, theme: ThemeHandle) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Returns the mode.
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Returns the Print placeholder.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Returns the theme handle, if any.
    pub const fn theme(&self) -> Option<&ThemeHandle> {
        self.theme.as_ref()
    }

    /// Returns the renderer for this context's mode.
    pub fn renderer(&self) -> &'static dyn FieldRenderer {
        renderer_for(self.mode)
    }
}

/// The output of rendering one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    /// The canonical field path.
    pub path: String,
    /// The label shown next to the value.
    pub label: String,
    /// The form text read from the path.
    pub bound_value: String,
    /// The text a reader sees: the bound value, or in Print mode the
    /// placeholder when the value is empty.
    pub display: String,
    /// The rendered HTML.
    pub html: String,
}

/// A rendering strategy for one mode.
pub trait FieldRenderer: Send + Sync + fmt::Debug {
    /// The mode this renderer implements.
    fn mode(&self) -> RenderMode;

    /// Renders an editable field.
    fn render_field(&self, field: &BoundField, ctx: &RenderContext) -> RenderedField;

    /// Renders a value no user edits directly (derived cells, computed totals).
    fn render_readonly(
        &self,
        path: &str,
        label: &str,
        text: &str,
        ctx: &RenderContext,
    ) -> RenderedField;
}

/// Renders interactive controls with adjacent errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditRenderer;

impl FieldRenderer for EditRenderer {
    fn mode(&self) -> RenderMode {
        RenderMode::Edit
    }

    fn render_field(&self, field: &BoundField, _ctx: &RenderContext) -> RenderedField {
        let text = field.text();
        let class = if field.has_errors() {
            "form-field has-errors"
        } else {
            "form-field"
        };
        let help = if field.field.help_text.is_empty() {
            String::new()
        } else {
            format!(
                r#"<span class="helptext">{}</span>"#,
                escape_html(&field.field.help_text)
            )
        };
        let html = format!(
            r#"<div class="{class}">{}{}{}{help}</div>"#,
            field.label_tag(),
            field.render_widget(&Attrs::new()),
            field.errors_as_ul(),
        );
        RenderedField {
            path: field.path.clone(),
            label: field.field.label.clone(),
            display: text.clone(),
            bound_value: text,
            html,
        }
    }

    fn render_readonly(
        &self,
        path: &str,
        label: &str,
        text: &str,
        _ctx: &RenderContext,
    ) -> RenderedField {
        let html = format!(
            r#"<div class="form-field computed"><label>{}</label><output name="{}">{}</output></div>"#,
            escape_html(label),
            escape_html(path),
            escape_html(text)
        );
        RenderedField {
            path: path.to_string(),
            label: label.to_string(),
            bound_value: text.to_string(),
            display: text.to_string(),
            html,
        }
    }
}

/// Renders a read-only projection. Never renders errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintRenderer;

impl PrintRenderer {
    fn project(path: &str, label: &str, text: &str, ctx: &RenderContext) -> RenderedField {
        let empty = text.trim().is_empty();
        let display = if empty { ctx.placeholder() } else { text };
        let value_class = if empty {
            "print-value print-empty"
        } else {
            "print-value"
        };
        let html = format!(
            r#"<div class="print-field" data-path="{}"><span class="print-label">{}</span><span class="{value_class}">{}</span></div>"#,
            escape_html(path),
            escape_html(label),
            escape_html(display)
        );
        RenderedField {
            path: path.to_string(),
            label: label.to_string(),
            bound_value: text.to_string(),
            display: display.to_string(),
            html,
        }
    }
}

impl FieldRenderer for PrintRenderer {
    fn mode(&self) -> RenderMode {
        RenderMode::Print
    }

    fn render_field(&self, field: &BoundField, ctx: &RenderContext) -> RenderedField {
        Self::project(&field.path, &field.field.label, &field.text(), ctx)
    }

    fn render_readonly(
        &self,
        path: &str,
        label: &str,
        text: &str,
        ctx: &RenderContext,
    ) -> RenderedField {
        Self::project(path, label, text, ctx)
    }
}

static EDIT: EditRenderer = EditRenderer;
static PRINT: PrintRenderer = PrintRenderer;

/// Returns the renderer for a mode.
pub fn renderer_for(mode: RenderMode) -> &'static dyn FieldRenderer {
    match mode {
        RenderMode::Edit => &EDIT,
        RenderMode::Print => &PRINT,
    }
}

/// A whole rendered form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedForm {
    /// The mode it was rendered in.
    pub mode: RenderMode,
    /// Every rendered path, in document order.
    pub fields: Vec<RenderedField>,
    /// The full document.
    pub html: String,
}

impl RenderedForm {
    /// Looks up the rendering of one path.
    pub fn field(&self, path: &str) -> Option<&RenderedField> {
        self.fields.iter().find(|f| f.path == path)
    }
}
