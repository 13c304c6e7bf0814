//! Theme settings: the small record the user edits.

use serde::{Deserialize, Serialize};

use crate::catalog::{ThemeCategory, ThemeConfig};
use paperwork_core::PaperworkResult;

/// The user's theme choices.
///
/// Every string field is a key of the matching [`ThemeConfig`] category.
/// The two booleans drive document effects outside the style variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSettings {
    /// Font family key.
    pub font: String,
    /// Color palette key.
    pub color: String,
    /// Spacing density key.
    pub density: String,
    /// Page layout key.
    pub page_layout: String,
    /// Language key.
    pub language: String,
    /// Font size scale key.
    pub font_size: String,
    /// Border radius key.
    pub border_radius: String,
    /// Contrast key.
    pub contrast: String,
    /// Dark background with light text.
    pub dark_mode: bool,
    /// Debug gridline overlay.
    pub show_gridlines: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            font: "inter".to_string(),
            color: "blue".to_string(),
            density: "comfortable".to_string(),
            page_layout: "a4".to_string(),
            language: "en".to_string(),
            font_size: "medium".to_string(),
            border_radius: "medium".to_string(),
            contrast: "normal".to_string(),
            dark_mode: false,
            show_gridlines: false,
        }
    }
}

impl ThemeSettings {
    /// Returns the key currently selected for `category`.
    pub fn get(&self, category: ThemeCategory) -> &str {
        match category {
            ThemeCategory::Font => &self.font,
            ThemeCategory::Color => &self.color,
            ThemeCategory::Density => &self.density,
            ThemeCategory::PageLayout => &self.page_layout,
            ThemeCategory::Language => &self.language,
            ThemeCategory::FontSize => &self.font_size,
            ThemeCategory::BorderRadius => &self.border_radius,
            ThemeCategory::Contrast => &self.contrast,
        }
    }

    /// Overwrites the key for one category. No catalog check happens here.
    pub fn set(&mut self, category: ThemeCategory, key: impl Into<String>) {
        let key = key.into();
        match category {
            ThemeCategory::Font => self.font = key,
            ThemeCategory::Color => self.color = key,
            ThemeCategory::Density => self.density = key,
            ThemeCategory::PageLayout => self.page_layout = key,
            ThemeCategory::Language => self.language = key,
            ThemeCategory::FontSize => self.font_size = key,
            ThemeCategory::BorderRadius => self.border_radius = key,
            ThemeCategory::Contrast => self.contrast = key,
        }
    }

    /// Checks every category key against the catalog.
    pub fn validate(&self, config: &ThemeConfig) -> PaperworkResult<()> {
        ThemeCategory::ALL
            .into_iter()
            .try_for_each(|category| config.require(category, self.get(category)))
    }
}
