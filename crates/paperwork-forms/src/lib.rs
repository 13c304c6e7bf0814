//! # paperwork-forms
//!
//! The form runtime for paperwork. A static [`FormModel`] declares fields,
//! repeating collections and computed tables; a [`FormOrchestrator`] owns one
//! live instance of it, validates it, renders it in Edit or Print mode and
//! submits it.
//!
//! ## Modules
//!
//! - [`fields`] - Field definitions, input parsing and type checks
//! - [`validators`] - Reusable value validators
//! - [`widgets`] - Edit-mode HTML controls
//! - [`bound_field`] - A field bound to a path, a value and errors
//! - [`render`] - Render modes and the Edit/Print renderers
//! - [`collection`] - Repeating collections with stable item ids
//! - [`table`] - Computed tables with variance cells and dynamic columns
//! - [`derived`] - Derived top-level fields
//! - [`values`] - The root record and path resolution
//! - [`validation`] - The validation pipeline
//! - [`model`] - Form declarations
//! - [`orchestrator`] - The live form instance
//! - [`submit`] - The async submit boundary

pub mod bound_field;
pub mod collection;
pub mod derived;
pub mod fields;
pub mod model;
pub mod orchestrator;
pub mod render;
pub mod submit;
pub mod table;
pub mod validation;
pub mod validators;
pub mod values;
pub mod widgets;

pub use collection::{CollectionItem, CollectionKind, CollectionSpec, DynamicCollection};
pub use derived::DerivedField;
pub use fields::{FieldDef, FieldKind};
pub use model::FormModel;
pub use orchestrator::{FormEvent, FormOrchestrator};
pub use render::{renderer_for, FieldRenderer, RenderContext, RenderMode, RenderedForm};
pub use submit::{LoggingSubmitHandler, SubmitHandler, SubmitReceipt};
pub use table::{ColumnRegistry, ComputedRow, ComputedTable, TableSpec};
pub use validation::ValidationErrors;
pub use values::FormValues;
