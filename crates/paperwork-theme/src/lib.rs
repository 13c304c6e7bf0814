//! # paperwork-theme
//!
//! The theming runtime for paperwork forms. A small [`ThemeSettings`] record
//! (one catalog key per [`ThemeCategory`] plus two booleans) is resolved
//! through a [`ThemeConfig`] catalog into a flat set of CSS custom properties
//! ([`StyleVariables`]).
//!
//! ## Modules
//!
//! - [`catalog`] - Option catalog, built-in and file-loaded
//! - [`settings`] - The user-edited settings record
//! - [`variables`] - Variable derivation and document effects
//! - [`runtime`] - [`ThemeRuntime`] (single mutator) and [`ThemeHandle`] (readers)

pub mod catalog;
pub mod runtime;
pub mod settings;
pub mod variables;

pub use catalog::{ThemeCategory, ThemeConfig, TextDirection};
pub use runtime::{PublishedTheme, ThemeHandle, ThemeRuntime};
pub use settings::ThemeSettings;
pub use variables::{derive_variables, DocumentEffects, StyleVariables};
