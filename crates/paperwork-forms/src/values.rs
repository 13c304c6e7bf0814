//! The root record of a form instance.
//!
//! [`FormValues`] maps top-level keys to scalar values, named
//! [`DynamicCollection`]s and named [`ComputedTable`]s. Every read and write
//! goes through a [`FieldPath`]; [`FormValues::locate`] turns a path into a
//! [`Location`], resolving `@id` segments to the entry's current index.

use std::collections::BTreeMap;

use paperwork_core::{FieldPath, ItemId, PaperworkError, PaperworkResult, PathSegment, Value};

use crate::collection::DynamicCollection;
use crate::table::ComputedTable;

/// Where a path points, with ids resolved to current indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A top-level field.
    Scalar(String),
    /// One field of a collection entry.
    Item {
        /// The collection key.
        collection: String,
        /// The entry's current index.
        index: usize,
        /// The field key.
        key: String,
    },
    /// One cell of a table row.
    Cell {
        /// The table key.
        table: String,
        /// The row's current index.
        index: usize,
        /// The column key.
        key: String,
    },
}

impl Location {
    /// The canonical index-based path text.
    pub fn path(&self) -> String {
        match self {
            Self::Scalar(name) => name.clone(),
            Self::Item {
                collection: root,
                index,
                key,
            }
            | Self::Cell {
                table: root,
                index,
                key,
            } => FieldPath::indexed(root.as_str(), *index, key.as_str()).to_string(),
        }
    }
}

/// The values of one form instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    scalars: BTreeMap<String, Value>,
    collections: BTreeMap<String, DynamicCollection>,
    tables: BTreeMap<String, ComputedTable>,
}

impl FormValues {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a top-level value.
    pub fn insert_scalar(&mut self, name: impl Into<String>, value: Value) {
        self.scalars.insert(name.into(), value);
    }

    /// Adds or replaces a collection.
    pub fn insert_collection(&mut self, name: impl Into<String>, collection: DynamicCollection) {
        self.collections.insert(name.into(), collection);
    }

    /// Adds or replaces a table.
    pub fn insert_table(&mut self, name: impl Into<String>, table: ComputedTable) {
        self.tables.insert(name.into(), table);
    }

    /// Returns a top-level value.
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        self.scalars.get(name)
    }

    /// Returns a collection by name.
    pub fn collection(&self, name: &str) -> PaperworkResult<&DynamicCollection> {
        self.collections
            .get(name)
            .ok_or_else(|| PaperworkError::UnknownCollection(name.to_string()))
    }

    /// Returns a collection by name for mutation.
    pub fn collection_mut(&mut self, name: &str) -> PaperworkResult<&mut DynamicCollection> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| PaperworkError::UnknownCollection(name.to_string()))
    }

    /// Returns a table by name.
    pub fn table(&self, name: &str) -> PaperworkResult<&ComputedTable> {
        self.tables
            .get(name)
            .ok_or_else(|| PaperworkError::UnknownTable(name.to_string()))
    }

    /// Returns a table by name for mutation.
    pub fn table_mut(&mut self, name: &str) -> PaperworkResult<&mut ComputedTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| PaperworkError::UnknownTable(name.to_string()))
    }

    /// Iterates the top-level values.
    pub fn scalars(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.scalars.iter()
    }

    /// Resolves a path.
    ///
    /// Returns `Ok(None)` when the path is well formed but its index or id
    /// matches no entry. Malformed paths and unknown containers are errors.
    pub fn locate(&self, path: &FieldPath) -> PaperworkResult<Option<Location>> {
        let invalid = |reason: &str| PaperworkError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };
        let root = path.root();

        match path.segments() {
            [PathSegment::Key(_)] => {
                if self.collections.contains_key(root) || self.tables.contains_key(root) {
                    return Err(invalid("names a collection or table, not a field"));
                }
                Ok(Some(Location::Scalar(root.to_string())))
            }
            [PathSegment::Key(_), position, PathSegment::Key(key)] => {
                if let Some(collection) = self.collections.get(root) {
                    let index = match position {
                        PathSegment::Index(i) => (*i < collection.len()).then_some(*i),
                        PathSegment::Id(id) => collection.index_of(*id),
                        PathSegment::Key(_) => return Err(invalid("expected an index or @id")),
                    };
                    Ok(index.map(|index| Location::Item {
                        collection: root.to_string(),
                        index,
                        key: key.clone(),
                    }))
                } else if let Some(table) = self.tables.get(root) {
                    let index = match position {
                        PathSegment::Index(i) => (*i < table.len()).then_some(*i),
                        PathSegment::Id(id) => table.index_of(*id),
                        PathSegment::Key(_) => return Err(invalid("expected an index or @id")),
                    };
                    Ok(index.map(|index| Location::Cell {
                        table: root.to_string(),
                        index,
                        key: key.clone(),
                    }))
                } else {
                    Err(PaperworkError::UnknownCollection(root.to_string()))
                }
            }
            _ => Err(invalid("expected `name` or `container.index.field`")),
        }
    }

    /// Reads the value at `path`. Missing entries and cells read as `Null`.
    pub fn get(&self, path: &FieldPath) -> PaperworkResult<Value> {
        let value = match self.locate(path)? {
            None => Value::Null,
            Some(Location::Scalar(name)) => self.scalars.get(&name).cloned().unwrap_or_default(),
            Some(Location::Item {
                collection,
                index,
                key,
            }) => self
                .collection(&collection)?
                .get(index)
                .and_then(|item| item.get(&key).cloned())
                .unwrap_or_default(),
            Some(Location::Cell { table, index, key }) => self
                .table(&table)?
                .row(index)
                .and_then(|row| row.get(&key))
                .unwrap_or_default(),
        };
        Ok(value)
    }

    /// Writes the value at `path`.
    ///
    /// Returns `Ok(false)` when the entry does not exist or the table has no
    /// such column. Writing a derived table cell is an error.
    pub fn set(&mut self, path: &FieldPath, value: Value) -> PaperworkResult<bool> {
        match self.locate(path)? {
            None => Ok(false),
            Some(Location::Scalar(name)) => {
                self.scalars.insert(name, value);
                Ok(true)
            }
            Some(Location::Item {
                collection,
                index,
                key,
            }) => Ok(self.collection_mut(&collection)?.set_field(index, &key, value)),
            Some(Location::Cell { table, index, key }) => {
                let table = self.table_mut(&table)?;
                if table.spec().is_derived(&key) {
                    return Err(PaperworkError::ReadOnlyField(path.to_string()));
                }
                if table.is_source(&key) {
                    Ok(table.set_source(index, &key, value))
                } else {
                    Ok(table.set_dynamic(index, &key, value))
                }
            }
        }
    }

    /// Returns the id of the entry or row a path points at.
    pub fn item_id(&self, location: &Location) -> Option<ItemId> {
        match location {
            Location::Scalar(_) => None,
            Location::Item {
                collection, index, ..
            } => self
                .collections
                .get(collection)
                .and_then(|c| c.get(*index))
                .map(crate::collection::CollectionItem::id),
            Location::Cell { table, index, .. } => self
                .tables
                .get(table)
                .and_then(|t| t.row(*index))
                .map(|row| row.id),
        }
    }

    /// A plain JSON object of every value, for submission.
    ///
    /// Collections become arrays of entry objects with their `id`; tables
    /// become arrays of flat row objects.
    pub fn snapshot(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.scalars {
            map.insert(name.clone(), value.to_json());
        }
        for (name, collection) in &self.collections {
            map.insert(name.clone(), collection.to_json());
        }
        for (name, table) in &self.tables {
            map.insert(name.clone(), table.to_json());
        }
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionKind;
    use crate::table::TableSpec;

    fn values() -> FormValues {
        let mut v = FormValues::new();
        v.insert_scalar("employeeName", Value::from("Ada"));
        let mut attachments = DynamicCollection::new(CollectionKind::Attachments);
        attachments.add([("fileName", "a.pdf")]);
        attachments.add([("fileName", "b.pdf")]);
        v.insert_collection("attachments", attachments);
        v.insert_table("revenue", TableSpec::new("revenue").with_initial_rows(1).instantiate());
        v
    }

    fn path(text: &str) -> FieldPath {
        FieldPath::parse(text).unwrap()
    }

    #[test]
    fn test_get_scalar_and_item() {
        let v = values();
        assert_eq!(v.get(&path("employeeName")).unwrap(), Value::from("Ada"));
        assert_eq!(v.get(&path("attachments.1.fileName")).unwrap(), Value::from("b.pdf"));
        assert_eq!(v.get(&path("attachments[0].fileName")).unwrap(), Value::from("a.pdf"));
        assert_eq!(v.get(&path("unknownScalar")).unwrap(), Value::Null);
    }

    #[test]
    fn test_get_out_of_range_reads_null() {
        let v = values();
        assert_eq!(v.get(&path("attachments.9.fileName")).unwrap(), Value::Null);
        assert_eq!(v.get(&path("attachments.0.missing")).unwrap(), Value::Null);
    }

    #[test]
    fn test_get_by_id_follows_entry() {
        let mut v = values();
        let id = v.collection("attachments").unwrap().ids()[1];
        let by_id = FieldPath::by_id("attachments", id, "fileName");
        v.collection_mut("attachments").unwrap().remove(0);
        assert_eq!(v.get(&by_id).unwrap(), Value::from("b.pdf"));
        assert_eq!(
            v.locate(&by_id).unwrap().unwrap().path(),
            "attachments.0.fileName"
        );
    }

    #[test]
    fn test_unknown_container_is_error() {
        let v = values();
        assert!(matches!(
            v.get(&path("nothing.0.x")),
            Err(PaperworkError::UnknownCollection(_))
        ));
        assert!(matches!(
            v.get(&path("attachments")),
            Err(PaperworkError::InvalidPath { .. })
        ));
        assert!(v.get(&path("attachments.0")).is_err());
    }

    #[test]
    fn test_set_routes_table_cells() {
        let mut v = values();
        assert!(v.set(&path("revenue.0.actual"), Value::Int(5)).unwrap());
        assert!(!v.set(&path("revenue.0.Region"), Value::from("EU")).unwrap());
        v.table_mut("revenue").unwrap().add_column("Region");
        assert!(v.set(&path("revenue.0.Region"), Value::from("EU")).unwrap());
        assert!(matches!(
            v.set(&path("revenue.0.variance"), Value::from("1")),
            Err(PaperworkError::ReadOnlyField(_))
        ));
        assert_eq!(v.get(&path("revenue.0.actual")).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_set_out_of_range_is_noop() {
        let mut v = values();
        assert!(!v.set(&path("attachments.5.fileName"), Value::from("x")).unwrap());
        assert_eq!(v.collection("attachments").unwrap().len(), 2);
    }

    #[test]
    fn test_item_id() {
        let v = values();
        let loc = v.locate(&path("revenue.0.actual")).unwrap().unwrap();
        assert_eq!(v.item_id(&loc), Some(v.table("revenue").unwrap().row(0).unwrap().id));
        assert_eq!(v.item_id(&Location::Scalar("employeeName".into())), None);
    }

    #[test]
    fn test_snapshot_shape() {
        let v = values();
        let snap = v.snapshot();
        assert_eq!(snap["employeeName"], "Ada");
        assert_eq!(snap["attachments"][1]["fileName"], "b.pdf");
        assert!(snap["attachments"][0]["id"].is_string());
        assert_eq!(snap["revenue"][0]["variance"], "");
        assert!(snap["revenue"][0]["actual"].is_null());
    }
}
