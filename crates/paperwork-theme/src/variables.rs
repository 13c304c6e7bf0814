//! Style variables derived from theme settings.
//!
//! [`derive_variables`] resolves each setting through the catalog and
//! produces a flat, named variable set ([`StyleVariables`]). The two boolean
//! settings do not become variables; they are exposed as
//! [`DocumentEffects`] applied to the document root.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::catalog::{ThemeCategory, ThemeConfig};
use crate::settings::ThemeSettings;
use paperwork_core::{PaperworkError, PaperworkResult};

/// `--primary-color`
pub const PRIMARY_COLOR: &str = "--primary-color";
/// `--secondary-color`
pub const SECONDARY_COLOR: &str = "--secondary-color";
/// `--accent-color`
pub const ACCENT_COLOR: &str = "--accent-color";
/// `--text-contrast-color`
pub const TEXT_CONTRAST_COLOR: &str = "--text-contrast-color";
/// `--spacing-unit`
pub const SPACING_UNIT: &str = "--spacing-unit";
/// `--font-family`
pub const FONT_FAMILY: &str = "--font-family";
/// `--font-size-base`
pub const FONT_SIZE_BASE: &str = "--font-size-base";
/// `--font-size-label`
pub const FONT_SIZE_LABEL: &str = "--font-size-label";
/// `--font-size-heading`
pub const FONT_SIZE_HEADING: &str = "--font-size-heading";
/// `--border-radius`
pub const BORDER_RADIUS: &str = "--border-radius";
/// `--contrast-filter`
pub const CONTRAST_FILTER: &str = "--contrast-filter";
/// `--layout-width`
pub const LAYOUT_WIDTH: &str = "--layout-width";
/// `--layout-height`
pub const LAYOUT_HEIGHT: &str = "--layout-height";
/// `--text-direction`
pub const TEXT_DIRECTION: &str = "--text-direction";

/// A flat map of CSS custom properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleVariables(BTreeMap<String, String>);

impl StyleVariables {
    /// Returns a variable's value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no variables are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders the variables as a CSS rule for `selector`.
    ///
    /// ```
    /// use paperwork_theme::{derive_variables, ThemeConfig, ThemeSettings};
    ///
    /// let vars = derive_variables(ThemeConfig::builtin(), &ThemeSettings::default()).unwrap();
    /// let css = vars.to_css(":root");
    /// assert!(css.starts_with(":root {"));
    /// assert!(css.contains("--primary-color: #1e40af;"));
    /// ```
    pub fn to_css(&self, selector: &str) -> String {
        let mut css = format!("{selector} {{\n");
        for (name, value) in self.iter() {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push('}');
        css
    }

    /// Renders the variables as an inline `style` attribute value.
    pub fn style_attribute(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }
}

/// Document-level effects driven by the boolean settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEffects {
    /// Dark background/text swap.
    pub dark_mode: bool,
    /// Debug gridline overlay.
    pub show_gridlines: bool,
}

impl DocumentEffects {
    /// Background color of the document root.
    pub const fn background_color(&self) -> &'static str {
        if self.dark_mode {
            "#121212"
        } else {
            "#ffffff"
        }
    }

    /// Text color of the document root.
    pub const fn text_color(&self) -> &'static str {
        if self.dark_mode {
            "#f3f4f6"
        } else {
            "#111827"
        }
    }

    /// Classes toggled on the document root.
    pub fn root_classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if self.dark_mode {
            classes.push("theme-dark");
        }
        if self.show_gridlines {
            classes.push("show-gridlines");
        }
        classes
    }

    /// Inline style for the document root.
    pub fn root_style(&self) -> String {
        format!(
            "background-color: {}; color: {}",
            self.background_color(),
            self.text_color()
        )
    }
}

fn missing(category: ThemeCategory, key: &str) -> PaperworkError {
    PaperworkError::UnknownThemeOption {
        category: category.to_string(),
        key: key.to_string(),
    }
}

/// Resolves settings through the catalog into style variables.
pub fn derive_variables(
    config: &ThemeConfig,
    settings: &ThemeSettings,
) -> PaperworkResult<StyleVariables> {
    let color = config
        .colors
        .get(&settings.color)
        .ok_or_else(|| missing(ThemeCategory::Color, &settings.color))?;
    let density = config
        .density
        .get(&settings.density)
        .ok_or_else(|| missing(ThemeCategory::Density, &settings.density))?;
    let font = config
        .fonts
        .get(&settings.font)
        .ok_or_else(|| missing(ThemeCategory::Font, &settings.font))?;
    let sizes = config
        .font_sizes
        .get(&settings.font_size)
        .ok_or_else(|| missing(ThemeCategory::FontSize, &settings.font_size))?;
    let radius = config
        .border_radius
        .get(&settings.border_radius)
        .ok_or_else(|| missing(ThemeCategory::BorderRadius, &settings.border_radius))?;
    let contrast = config
        .contrast
        .get(&settings.contrast)
        .ok_or_else(|| missing(ThemeCategory::Contrast, &settings.contrast))?;
    let layout = config
        .page_layouts
        .get(&settings.page_layout)
        .ok_or_else(|| missing(ThemeCategory::PageLayout, &settings.page_layout))?;
    let language = config
        .languages
        .get(&settings.language)
        .ok_or_else(|| missing(ThemeCategory::Language, &settings.language))?;

    let mut vars = StyleVariables::default();
    vars.insert(PRIMARY_COLOR, &color.primary);
    vars.insert(SECONDARY_COLOR, &color.secondary);
    vars.insert(ACCENT_COLOR, &color.accent);
    vars.insert(TEXT_CONTRAST_COLOR, &color.text_contrast);
    vars.insert(SPACING_UNIT, &density.spacing_unit);
    vars.insert(FONT_FAMILY, &font.family);
    vars.insert(FONT_SIZE_BASE, &sizes.base);
    vars.insert(FONT_SIZE_LABEL, &sizes.label_size);
    vars.insert(FONT_SIZE_HEADING, &sizes.heading);
    vars.insert(BORDER_RADIUS, &radius.radius);
    vars.insert(CONTRAST_FILTER, &contrast.filter);
    vars.insert(LAYOUT_WIDTH, &layout.width);
    vars.insert(LAYOUT_HEIGHT, &layout.height);
    vars.insert(TEXT_DIRECTION, language.direction.as_str());
    Ok(vars)
}
