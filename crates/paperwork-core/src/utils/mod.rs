//! Utility helpers shared across the paperwork crates.
//!
//! - [`text`] - Escaping and key normalization helpers

pub mod text;
