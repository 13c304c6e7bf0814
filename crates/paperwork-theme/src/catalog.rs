//! The static theme option catalog.
//!
//! A [`ThemeConfig`] lists, per [`ThemeCategory`], every option key a
//! [`ThemeSettings`](crate::settings::ThemeSettings) value may name, together
//! with the concrete style values that option stands for. The built-in
//! catalog is available through [`ThemeConfig::builtin`]; deployments can
//! override or extend it from a TOML or JSON file, which is merged over the
//! built-in entries.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use paperwork_core::settings_loader::{merge_json, toml_str_to_json};
use paperwork_core::{PaperworkError, PaperworkResult};

/// A theme category whose value is a catalog key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeCategory {
    /// Font family.
    Font,
    /// Color palette.
    Color,
    /// Spacing density.
    Density,
    /// Printed page size and orientation.
    PageLayout,
    /// UI language (drives text direction).
    Language,
    /// Base/label/heading font sizes.
    FontSize,
    /// Corner rounding.
    BorderRadius,
    /// Contrast filter.
    Contrast,
}

impl ThemeCategory {
    /// Every category, in publishing order.
    pub const ALL: [Self; 8] = [
        Self::Font,
        Self::Color,
        Self::Density,
        Self::PageLayout,
        Self::Language,
        Self::FontSize,
        Self::BorderRadius,
        Self::Contrast,
    ];

    /// Returns the wire name of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Font => "font",
            Self::Color => "color",
            Self::Density => "density",
            Self::PageLayout => "pageLayout",
            Self::Language => "language",
            Self::FontSize => "fontSize",
            Self::BorderRadius => "borderRadius",
            Self::Contrast => "contrast",
        }
    }
}

impl fmt::Display for ThemeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeCategory {
    type Err = PaperworkError;

    /// Accepts the camelCase wire name or its `snake_case` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars().filter(|c| *c != '_').collect::<String>().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == normalized)
            .ok_or_else(|| PaperworkError::UnknownThemeCategory(s.to_string()))
    }
}

/// A font family option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontOption {
    /// Display label.
    pub label: String,
    /// CSS `font-family` stack.
    pub family: String,
}

/// A color palette option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOption {
    /// Display label.
    pub label: String,
    /// Primary brand color.
    pub primary: String,
    /// Secondary color.
    pub secondary: String,
    /// Accent color.
    pub accent: String,
    /// Text color readable on top of `primary`.
    pub text_contrast: String,
}

/// A spacing density option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityOption {
    /// Display label.
    pub label: String,
    /// Base spacing unit.
    pub spacing_unit: String,
}

/// A printed page layout option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayoutOption {
    /// Display label.
    pub label: String,
    /// Page width.
    pub width: String,
    /// Page height.
    pub height: String,
}

/// Text direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

impl TextDirection {
    /// Returns the CSS `direction` value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// A UI language option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    /// Display label (in the language itself).
    pub label: String,
    /// Text direction.
    pub direction: TextDirection,
}

/// A font size scale option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSizeOption {
    /// Display label.
    pub label: String,
    /// Body text size.
    pub base: String,
    /// Field label size.
    pub label_size: String,
    /// Section heading size.
    pub heading: String,
}

/// A corner rounding option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderRadiusOption {
    /// Display label.
    pub label: String,
    /// CSS radius.
    pub radius: String,
}

/// A contrast option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContrastOption {
    /// Display label.
    pub label: String,
    /// CSS `filter` value.
    pub filter: String,
}

/// The full option catalog, one keyed map per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    /// Font families.
    pub fonts: BTreeMap<String, FontOption>,
    /// Color palettes.
    pub colors: BTreeMap<String, ColorOption>,
    /// Spacing densities.
    pub density: BTreeMap<String, DensityOption>,
    /// Page layouts.
    pub page_layouts: BTreeMap<String, PageLayoutOption>,
    /// Languages.
    pub languages: BTreeMap<String, LanguageOption>,
    /// Font size scales.
    pub font_sizes: BTreeMap<String, FontSizeOption>,
    /// Corner rounding.
    pub border_radius: BTreeMap<String, BorderRadiusOption>,
    /// Contrast filters.
    pub contrast: BTreeMap<String, ContrastOption>,
}

static BUILTIN: Lazy<ThemeConfig> = Lazy::new(builtin_catalog);

impl ThemeConfig {
    /// Returns the built-in catalog.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Returns `true` if `key` is an option of `category`.
    pub fn contains(&self, category: ThemeCategory, key: &str) -> bool {
        self.keys(category).contains(&key)
    }

    /// Returns the option keys of a category, sorted.
    pub fn keys(&self, category: ThemeCategory) -> Vec<&str> {
        fn keys_of<V>(map: &BTreeMap<String, V>) -> Vec<&str> {
            map.keys().map(String::as_str).collect()
        }
        match category {
            ThemeCategory::Font => keys_of(&self.fonts),
            ThemeCategory::Color => keys_of(&self.colors),
            ThemeCategory::Density => keys_of(&self.density),
            ThemeCategory::PageLayout => keys_of(&self.page_layouts),
            ThemeCategory::Language => keys_of(&self.languages),
            ThemeCategory::FontSize => keys_of(&self.font_sizes),
            ThemeCategory::BorderRadius => keys_of(&self.border_radius),
            ThemeCategory::Contrast => keys_of(&self.contrast),
        }
    }

    /// Returns an error unless `key` is an option of `category`.
    pub fn require(&self, category: ThemeCategory, key: &str) -> PaperworkResult<()> {
        if self.contains(category, key) {
            Ok(())
        } else {
            Err(PaperworkError::UnknownThemeOption {
                category: category.to_string(),
                key: key.to_string(),
            })
        }
    }

    /// Loads a catalog from TOML, merged over the built-in catalog.
    pub fn from_toml_str(toml_str: &str) -> PaperworkResult<Self> {
        Self::merged_over_builtin(toml_str_to_json(toml_str)?)
    }

    /// Loads a catalog from JSON, merged over the built-in catalog.
    pub fn from_json_str(json_str: &str) -> PaperworkResult<Self> {
        let json: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
            PaperworkError::ConfigurationError(format!("Failed to parse theme catalog JSON: {e}"))
        })?;
        Self::merged_over_builtin(json)
    }

    /// Loads a catalog file, choosing the format by extension (`.toml` or `.json`).
    pub fn from_file(path: impl AsRef<Path>) -> PaperworkResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PaperworkError::ConfigurationError(format!(
                "Failed to read theme catalog '{}': {e}",
                path.display()
            ))
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(PaperworkError::ConfigurationError(format!(
                "Unsupported theme catalog format: '{}'",
                path.display()
            ))),
        }
    }

    fn merged_over_builtin(overrides: serde_json::Value) -> PaperworkResult<Self> {
        let base = serde_json::to_value(Self::builtin())?;
        serde_json::from_value(merge_json(base, overrides)).map_err(|e| {
            PaperworkError::ConfigurationError(format!("Invalid theme catalog: {e}"))
        })
    }
}

fn font(label: &str, family: &str) -> FontOption {
    FontOption {
        label: label.into(),
        family: family.into(),
    }
}

fn color(label: &str, primary: &str, secondary: &str, accent: &str, text: &str) -> ColorOption {
    ColorOption {
        label: label.into(),
        primary: primary.into(),
        secondary: secondary.into(),
        accent: accent.into(),
        text_contrast: text.into(),
    }
}

fn page(label: &str, width: &str, height: &str) -> PageLayoutOption {
    PageLayoutOption {
        label: label.into(),
        width: width.into(),
        height: height.into(),
    }
}

fn sizes(label: &str, base: &str, label_size: &str, heading: &str) -> FontSizeOption {
    FontSizeOption {
        label: label.into(),
        base: base.into(),
        label_size: label_size.into(),
        heading: heading.into(),
    }
}

fn entries<V, const N: usize>(items: [(&str, V); N]) -> BTreeMap<String, V> {
    items.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn builtin_catalog() -> ThemeConfig {
    ThemeConfig {
        fonts: entries([
            ("inter", font("Inter", "'Inter', 'Helvetica Neue', Arial, sans-serif")),
            ("roboto", font("Roboto", "'Roboto', Arial, sans-serif")),
            ("openSans", font("Open Sans", "'Open Sans', Arial, sans-serif")),
            ("lato", font("Lato", "'Lato', Arial, sans-serif")),
            ("merriweather", font("Merriweather", "'Merriweather', Georgia, serif")),
            ("timesNewRoman", font("Times New Roman", "'Times New Roman', Times, serif")),
        ]),
        colors: entries([
            ("blue", color("Blue", "#1e40af", "#3b82f6", "#93c5fd", "#ffffff")),
            ("teal", color("Teal", "#0f766e", "#14b8a6", "#99f6e4", "#ffffff")),
            ("green", color("Green", "#15803d", "#22c55e", "#bbf7d0", "#ffffff")),
            ("purple", color("Purple", "#6b21a8", "#a855f7", "#e9d5ff", "#ffffff")),
            ("red", color("Red", "#b91c1c", "#ef4444", "#fecaca", "#ffffff")),
            ("orange", color("Orange", "#c2410c", "#f97316", "#fed7aa", "#111827")),
            ("gray", color("Gray", "#374151", "#6b7280", "#d1d5db", "#ffffff")),
        ]),
        density: entries([
            ("compact", DensityOption { label: "Compact".into(), spacing_unit: "4px".into() }),
            (
                "comfortable",
                DensityOption {
                    label: "Comfortable".into(),
                    spacing_unit: "8px".into(),
                },
            ),
            ("spacious", DensityOption { label: "Spacious".into(), spacing_unit: "12px".into() }),
        ]),
        page_layouts: entries([
            ("a4", page("A4 portrait", "210mm", "297mm")),
            ("a4Landscape", page("A4 landscape", "297mm", "210mm")),
            ("letter", page("US Letter", "8.5in", "11in")),
            ("legal", page("US Legal", "8.5in", "14in")),
        ]),
        languages: entries([
            ("en", LanguageOption { label: "English".into(), direction: TextDirection::Ltr }),
            ("es", LanguageOption { label: "Español".into(), direction: TextDirection::Ltr }),
            ("fr", LanguageOption { label: "Français".into(), direction: TextDirection::Ltr }),
            ("de", LanguageOption { label: "Deutsch".into(), direction: TextDirection::Ltr }),
            (
                "ar",
                LanguageOption {
                    label: "العربية".into(),
                    direction: TextDirection::Rtl,
                },
            ),
            ("he", LanguageOption { label: "עברית".into(), direction: TextDirection::Rtl }),
        ]),
        font_sizes: entries([
            ("small", sizes("Small", "12px", "11px", "18px")),
            ("medium", sizes("Medium", "14px", "12px", "20px")),
            ("large", sizes("Large", "16px", "14px", "24px")),
        ]),
        border_radius: entries([
            ("none", BorderRadiusOption { label: "None".into(), radius: "0px".into() }),
            ("small", BorderRadiusOption { label: "Small".into(), radius: "4px".into() }),
            ("medium", BorderRadiusOption { label: "Medium".into(), radius: "8px".into() }),
            ("large", BorderRadiusOption { label: "Large".into(), radius: "12px".into() }),
        ]),
        contrast: entries([
            ("normal", ContrastOption { label: "Normal".into(), filter: "none".into() }),
            ("high", ContrastOption { label: "High".into(), filter: "contrast(1.25)".into() }),
            ("low", ContrastOption { label: "Low".into(), filter: "contrast(0.85)".into() }),
        ]),
    }
}
