//! # paperwork
//!
//! A shared runtime for paginated business-process forms.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `paperwork` to get the entire runtime, or depend on
//! individual crates for finer-grained control.

/// Core types, settings, logging and error types.
pub use paperwork_core as core;

/// Typed publish/subscribe signals.
#[cfg(feature = "signals")]
pub use paperwork_signals as signals;

/// Theme catalog, settings and the publishing runtime.
#[cfg(feature = "theme")]
pub use paperwork_theme as theme;

/// Form models, collections, computed tables, rendering and submit.
#[cfg(feature = "forms")]
pub use paperwork_forms as forms;

// Third-party re-exports
pub use async_trait::async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The types most programs need, in one import.
///
/// ```
/// use paperwork::prelude::*;
///
/// let model = FormModel::new("leaveRequest").field(FieldDef::date("firstDay").required(true));
/// let mut form = FormOrchestrator::with_settings(model, &Settings::default());
/// assert!(!form.validate());
/// ```
pub mod prelude {
    pub use paperwork_core::logging::{form_span, setup_logging};
    pub use paperwork_core::{
        FieldPath, FileRef, ItemId, PaperworkError, PaperworkResult, Settings, Value, SETTINGS,
    };

    #[cfg(feature = "signals")]
    pub use paperwork_signals::Signal;

    #[cfg(feature = "theme")]
    pub use paperwork_theme::{ThemeCategory, ThemeConfig, ThemeHandle, ThemeRuntime, ThemeSettings};

    #[cfg(feature = "forms")]
    pub use paperwork_forms::{
        CollectionKind, CollectionSpec, DerivedField, FieldDef, FormEvent, FormModel,
        FormOrchestrator, LoggingSubmitHandler, RenderContext, RenderMode, SubmitHandler,
        TableSpec,
    };
}
