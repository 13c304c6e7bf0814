//! Derived top-level fields.
//!
//! A [`DerivedField`] writes one scalar from other parts of the form, e.g. a
//! summary line listing every attachment's file name. The orchestrator
//! recomputes derived fields right after the changes they depend on; they
//! are never recomputed on their own.

use std::fmt;
use std::sync::Arc;

use paperwork_core::Value;

use crate::values::FormValues;

/// A user-supplied derivation.
pub type ComputeFn = Arc<dyn Fn(&FormValues) -> Value + Send + Sync>;

/// How a derived field obtains its value.
#[derive(Clone)]
pub enum Compute {
    /// Joins one field of every entry, skipping blanks.
    JoinCollection {
        /// The collection key.
        collection: String,
        /// The entry field to read.
        field: String,
        /// Placed between values.
        separator: String,
    },
    /// The field of the last entry, or `Null` when the collection is empty.
    LatestInCollection {
        /// The collection key.
        collection: String,
        /// The entry field to read.
        field: String,
    },
    /// The sum of one table column.
    TableTotal {
        /// The table key.
        table: String,
        /// The column key (source, derived or dynamic).
        column: String,
    },
    /// Any other derivation.
    Custom {
        /// Top-level keys the derivation reads.
        sources: Vec<String>,
        /// The derivation.
        compute: ComputeFn,
    },
}

impl fmt::Debug for Compute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JoinCollection {
                collection,
                field,
                separator,
            } => f
                .debug_struct("JoinCollection")
                .field("collection", collection)
                .field("field", field)
                .field("separator", separator)
                .finish(),
            Self::LatestInCollection { collection, field } => f
                .debug_struct("LatestInCollection")
                .field("collection", collection)
                .field("field", field)
                .finish(),
            Self::TableTotal { table, column } => f
                .debug_struct("TableTotal")
                .field("table", table)
                .field("column", column)
                .finish(),
            Self::Custom { sources, .. } => f
                .debug_struct("Custom")
                .field("sources", sources)
                .finish_non_exhaustive(),
        }
    }
}

/// A scalar computed from other parts of the form.
#[derive(Debug, Clone)]
pub struct DerivedField {
    /// The top-level key written.
    pub target: String,
    /// The derivation.
    pub compute: Compute,
}

impl DerivedField {
    /// Joins `field` across every entry of `collection`.
    pub fn join_collection(
        target: impl Into<String>,
        collection: impl Into<String>,
        field: impl Into<String>,
        separator: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            compute: Compute::JoinCollection {
                collection: collection.into(),
                field: field.into(),
                separator: separator.into(),
            },
        }
    }

    /// Mirrors `field` of the last entry of `collection`.
    pub fn latest_in_collection(
        target: impl Into<String>,
        collection: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            compute: Compute::LatestInCollection {
                collection: collection.into(),
                field: field.into(),
            },
        }
    }

    /// Sums `column` of `table`.
    pub fn table_total(
        target: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            compute: Compute::TableTotal {
                table: table.into(),
                column: column.into(),
            },
        }
    }

    /// A custom derivation reading the given top-level keys.
    pub fn custom<I, S, F>(target: impl Into<String>, sources: I, compute: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&FormValues) -> Value + Send + Sync + 'static,
    {
        Self {
            target: target.into(),
            compute: Compute::Custom {
                sources: sources.into_iter().map(Into::into).collect(),
                compute: Arc::new(compute),
            },
        }
    }

    /// Returns `true` if a change under the top-level key `root` affects this field.
    pub fn depends_on(&self, root: &str) -> bool {
        match &self.compute {
            Compute::JoinCollection { collection, .. }
            | Compute::LatestInCollection { collection, .. } => collection == root,
            Compute::TableTotal { table, .. } => table == root,
            Compute::Custom { sources, .. } => sources.iter().any(|s| s == root),
        }
    }

    /// Computes the value. Unknown collections and tables yield `Null`.
    pub fn compute(&self, values: &FormValues) -> Value {
        match &self.compute {
            Compute::JoinCollection {
                collection,
                field,
                separator,
            } => values.collection(collection).map_or(Value::Null, |c| {
                let joined = c
                    .iter()
                    .filter_map(|item| item.get(field))
                    .filter(|v| !v.is_blank())
                    .map(Value::to_form_text)
                    .collect::<Vec<_>>()
                    .join(separator);
                Value::String(joined)
            }),
            Compute::LatestInCollection { collection, field } => values
                .collection(collection)
                .ok()
                .and_then(|c| c.iter().last())
                .and_then(|item| item.get(field).cloned())
                .unwrap_or_default(),
            Compute::TableTotal { table, column } => values
                .table(table)
                .map_or(Value::Null, |t| Value::Float(t.total(column))),
            Compute::Custom { compute, .. } => compute(values),
        }
    }
}
