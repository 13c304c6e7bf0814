//! # paperwork-core
//!
//! Core types, settings, and error types for the paperwork form runtime.
//! This crate has no framework dependencies and provides the foundation for
//! all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`value`] - The dynamic [`Value`] stored at every form path
//! - [`path`] - Field path parsing and stable item identifiers
//! - [`settings`] - Runtime settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Text helpers

pub mod error;
pub mod logging;
pub mod path;
pub mod settings;
pub mod settings_loader;
pub mod utils;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{PaperworkError, PaperworkResult, ValidationError};
pub use path::{FieldPath, ItemId, PathSegment};
pub use settings::{Settings, SETTINGS};
pub use value::{FileRef, Value};
