//! Static form declarations.
//!
//! A [`FormModel`] declares everything a form instance holds: top-level
//! fields, repeating collections, computed tables, derived fields and
//! form-level rules. It is built once and shared between instances.
//!
//! # Examples
//!
//! ```
//! use paperwork_forms::collection::{CollectionKind, CollectionSpec};
//! use paperwork_forms::fields::FieldDef;
//! use paperwork_forms::model::FormModel;
//! use paperwork_forms::table::TableSpec;
//!
//! let model = FormModel::new("expenseReport")
//!     .title("Expense report")
//!     .field(FieldDef::text("employeeName").required(true))
//!     .collection(CollectionSpec::new("attachments", CollectionKind::Attachments))
//!     .table(TableSpec::new("costs").with_initial_rows(1));
//!
//! let values = model.initial_values();
//! assert_eq!(values.table("costs").unwrap().len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::collection::CollectionSpec;
use crate::derived::DerivedField;
use crate::fields::FieldDef;
use crate::table::TableSpec;
use crate::validation::ValidationErrors;
use crate::values::{FormValues, Location};

/// A form-level rule. Reports problems by adding to the error set.
pub type FormRule = Arc<dyn Fn(&FormValues, &mut ValidationErrors) + Send + Sync>;

/// The declaration of one form.
pub struct FormModel {
    name: String,
    title: String,
    fields: Vec<FieldDef>,
    collections: Vec<CollectionSpec>,
    tables: Vec<TableSpec>,
    derived: Vec<DerivedField>,
    rules: Vec<FormRule>,
}

impl fmt::Debug for FormModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormModel")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("fields", &self.fields)
            .field("collections", &self.collections)
            .field("tables", &self.tables)
            .field("derived", &self.derived)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl FormModel {
    /// Starts a declaration.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: paperwork_core::utils::text::humanize_key(&name),
            name,
            fields: Vec::new(),
            collections: Vec::new(),
            tables: Vec::new(),
            derived: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Sets the title shown at the top of the form.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Adds a top-level field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a collection.
    #[must_use]
    pub fn collection(mut self, spec: CollectionSpec) -> Self {
        self.collections.push(spec);
        self
    }

    /// Adds a computed table.
    #[must_use]
    pub fn table(mut self, spec: TableSpec) -> Self {
        self.tables.push(spec);
        self
    }

    /// Adds a derived top-level field.
    #[must_use]
    pub fn derived(mut self, derived: DerivedField) -> Self {
        self.derived.push(derived);
        self
    }

    /// Adds a form-level rule.
    #[must_use]
    pub fn rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&FormValues, &mut ValidationErrors) + Send + Sync + 'static,
    {
        self.rules.push(Arc::new(rule));
        self
    }

    /// The form key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The form title.
    pub fn form_title(&self) -> &str {
        &self.title
    }

    /// All top-level field definitions.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// All collection declarations.
    pub fn collections(&self) -> &[CollectionSpec] {
        &self.collections
    }

    /// All table declarations.
    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    /// All derived fields.
    pub fn derived_fields(&self) -> &[DerivedField] {
        &self.derived
    }

    /// All form-level rules.
    pub fn rules(&self) -> &[FormRule] {
        &self.rules
    }

    /// Looks up a top-level field.
    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a collection declaration.
    pub fn collection_spec(&self, name: &str) -> Option<&CollectionSpec> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Looks up a table declaration.
    pub fn table_spec(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Returns `true` if `name` is written by a derived field.
    pub fn is_derived(&self, name: &str) -> bool {
        self.derived.iter().any(|d| d.target == name)
    }

    /// The field definition governing a location, if any.
    ///
    /// Table cells have no definition; they are parsed as numbers.
    pub fn definition_for(&self, location: &Location) -> Option<&FieldDef> {
        match location {
            Location::Scalar(name) => self.field_def(name),
            Location::Item { collection, key, .. } => self
                .collection_spec(collection)
                .and_then(|spec| spec.field_def(key)),
            Location::Cell { .. } => None,
        }
    }

    /// Builds the values of a fresh instance.
    ///
    /// Fields take their initial values, collections start with `min_items`
    /// blank entries, tables with `initial_rows` blank rows, and derived
    /// fields are computed once.
    pub fn initial_values(&self) -> FormValues {
        let mut values = FormValues::new();
        for field in &self.fields {
            values.insert_scalar(field.name.clone(), field.initial_value());
        }
        for spec in &self.collections {
            values.insert_collection(spec.name.clone(), spec.instantiate());
        }
        for spec in &self.tables {
            values.insert_table(spec.name.clone(), spec.instantiate());
        }
        for derived in &self.derived {
            let value = derived.compute(&values);
            values.insert_scalar(derived.target.clone(), value);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionKind;
    use paperwork_core::Value;

    fn model() -> FormModel {
        FormModel::new("personnelAction")
            .field(FieldDef::text("employeeName").initial("Ada"))
            .field(FieldDef::number("salary"))
            .collection(
                CollectionSpec::new("signatures", CollectionKind::Signatures).with_min_items(2),
            )
            .collection(CollectionSpec::new("attachments", CollectionKind::Attachments))
            .table(TableSpec::new("budget").with_initial_rows(3))
            .derived(DerivedField::join_collection(
                "attachmentNames",
                "attachments",
                "fileName",
                ", ",
            ))
            .rule(|values, errors| {
                if values.scalar("salary").is_none() {
                    errors.add("salary", "missing");
                }
            })
    }

    #[test]
    fn test_lookups() {
        let m = model();
        assert_eq!(m.name(), "personnelAction");
        assert_eq!(m.form_title(), "Personnel action");
        assert!(m.field_def("salary").is_some());
        assert!(m.collection_spec("signatures").is_some());
        assert!(m.table_spec("budget").is_some());
        assert!(m.table_spec("nothing").is_none());
        assert!(m.is_derived("attachmentNames"));
        assert_eq!(m.rules().len(), 1);
    }

    #[test]
    fn test_initial_values() {
        let values = model().initial_values();
        assert_eq!(values.scalar("employeeName"), Some(&Value::from("Ada")));
        assert_eq!(values.scalar("salary"), Some(&Value::Null));
        assert_eq!(values.collection("signatures").unwrap().len(), 2);
        assert!(values.collection("attachments").unwrap().is_empty());
        assert_eq!(values.table("budget").unwrap().len(), 3);
        assert_eq!(values.scalar("attachmentNames"), Some(&Value::from("")));
    }

    #[test]
    fn test_definition_for() {
        let m = model();
        let loc = Location::Item {
            collection: "signatures".into(),
            index: 0,
            key: "date".into(),
        };
        assert_eq!(m.definition_for(&loc).unwrap().name, "date");
        let cell = Location::Cell {
            table: "budget".into(),
            index: 0,
            key: "actual".into(),
        };
        assert!(m.definition_for(&cell).is_none());
    }
}
