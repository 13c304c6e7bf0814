//! Repeating collections with stable item identity.
//!
//! A [`DynamicCollection`] holds the entries of one repeating group
//! (attachments, custom fields, signatures). Entries live in an id-keyed map;
//! a separate ordered list of ids gives display order. Positional indexes are
//! therefore only a view: removing an entry shifts the index of every later
//! entry, while ids stay valid for the entry's whole life and are never
//! reused.

use std::collections::{BTreeMap, HashMap};

use paperwork_core::{FileRef, ItemId, Value};
use serde::{Deserialize, Serialize};

use crate::fields::FieldDef;

/// The fields of one collection entry.
pub type ItemFields = BTreeMap<String, Value>;

/// Key of an attachment's file name.
pub const ATTACHMENT_FILE_NAME: &str = "fileName";
/// Key of an attachment's MIME type.
pub const ATTACHMENT_FILE_TYPE: &str = "fileType";
/// Key of an attachment's file reference.
pub const ATTACHMENT_FILE: &str = "file";

/// The built-in collection shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    /// Supporting documents.
    Attachments,
    /// Ad hoc label/value pairs.
    CustomFields,
    /// Approval signatures.
    Signatures,
    /// Any other repeating group; fields come from its spec.
    Generic,
}

impl CollectionKind {
    /// Returns the field keys of a blank entry.
    pub const fn template(self) -> &'static [&'static str] {
        match self {
            Self::Attachments => &[
                ATTACHMENT_FILE_NAME,
                ATTACHMENT_FILE_TYPE,
                ATTACHMENT_FILE,
                "description",
            ],
            Self::CustomFields => &["label", "value"],
            Self::Signatures => &["name", "title", "date", "signature"],
            Self::Generic => &[],
        }
    }

    /// Returns the field definitions used to render and validate entries.
    pub fn default_fields(self) -> Vec<FieldDef> {
        match self {
            Self::Attachments => vec![
                FieldDef::text(ATTACHMENT_FILE_NAME).label("File name"),
                FieldDef::text(ATTACHMENT_FILE_TYPE).label("File type"),
                FieldDef::file(ATTACHMENT_FILE).label("File"),
                FieldDef::long_text("description"),
            ],
            Self::CustomFields => vec![FieldDef::text("label"), FieldDef::text("value")],
            Self::Signatures => vec![
                FieldDef::text("name"),
                FieldDef::text("title"),
                FieldDef::date("date"),
                FieldDef::signature("signature"),
            ],
            Self::Generic => Vec::new(),
        }
    }
}

/// Declaration of a collection on a form.
#[derive(Debug)]
pub struct CollectionSpec {
    /// The collection key (first segment of its paths).
    pub name: String,
    /// Section heading.
    pub label: String,
    /// The collection shape.
    pub kind: CollectionKind,
    /// Per-entry field definitions.
    pub fields: Vec<FieldDef>,
    /// Entries present on a fresh form; fewer fails validation.
    pub min_items: usize,
    /// More entries than this fails validation. Adding is never blocked.
    pub max_items: Option<usize>,
}

impl CollectionSpec {
    /// Declares a collection with the kind's default fields.
    pub fn new(name: impl Into<String>, kind: CollectionKind) -> Self {
        let name = name.into();
        Self {
            label: paperwork_core::utils::text::humanize_key(&name),
            name,
            kind,
            fields: kind.default_fields(),
            min_items: 0,
            max_items: None,
        }
    }

    /// Sets the section heading.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Adds a field, replacing a default field with the same key.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == field.name) {
            *existing = field;
        } else {
            self.fields.push(field);
        }
        self
    }

    /// Sets the minimum number of entries.
    #[must_use]
    pub const fn with_min_items(mut self, min_items: usize) -> Self {
        self.min_items = min_items;
        self
    }

    /// Sets the maximum number of entries.
    #[must_use]
    pub const fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Looks up a per-entry field definition.
    pub fn field_def(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == key)
    }

    /// Builds the collection for a fresh form: `min_items` blank entries.
    pub fn instantiate(&self) -> DynamicCollection {
        let template = if self.fields.is_empty() {
            self.kind.template().iter().map(|k| (*k).to_string()).collect()
        } else {
            self.fields.iter().map(|f| f.name.clone()).collect()
        };
        let mut collection = DynamicCollection::with_template(self.kind, template);
        for _ in 0..self.min_items {
            collection.add_blank();
        }
        collection
    }
}

/// One entry of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionItem {
    id: ItemId,
    fields: ItemFields,
}

impl CollectionItem {
    /// The entry's stable id.
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// All fields of the entry.
    pub const fn fields(&self) -> &ItemFields {
        &self.fields
    }

    /// One field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The entry as a JSON object with its `id`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("id".to_string(), serde_json::Value::String(self.id.to_string()));
        for (k, v) in &self.fields {
            map.insert(k.clone(), v.to_json());
        }
        serde_json::Value::Object(map)
    }
}

fn seed_fields<I, K, V>(seed: I) -> ItemFields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    seed.into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .filter(|(k, _)| k != "id")
        .collect()
}

/// The entries of one repeating group.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicCollection {
    kind: CollectionKind,
    template: Vec<String>,
    entries: HashMap<ItemId, CollectionItem>,
    order: Vec<ItemId>,
}

impl DynamicCollection {
    /// Creates an empty collection whose blank entries follow the kind's template.
    pub fn new(kind: CollectionKind) -> Self {
        let template = kind.template().iter().map(|k| (*k).to_string()).collect();
        Self::with_template(kind, template)
    }

    /// Creates an empty collection with explicit blank-entry keys.
    pub fn with_template(kind: CollectionKind, template: Vec<String>) -> Self {
        Self {
            kind,
            template,
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Returns the collection shape.
    pub const fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Appends an entry holding exactly `seed`'s fields and returns its new id.
    ///
    /// An `id` key in the seed is ignored; ids are only ever assigned here.
    pub fn add<I, K, V>(&mut self, seed: I) -> ItemId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let id = ItemId::new();
        let fields = seed_fields(seed);
        tracing::debug!(%id, fields = fields.len(), "collection entry added");
        self.entries.insert(id, CollectionItem { id, fields });
        self.order.push(id);
        id
    }

    /// Appends a blank entry following the template.
    pub fn add_blank(&mut self) -> ItemId {
        let blank: Vec<(String, Value)> = self
            .template
            .iter()
            .map(|k| (k.clone(), Value::Null))
            .collect();
        self.add(blank)
    }

    /// Removes the entry at `index`. Out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<CollectionItem> {
        if index >= self.order.len() {
            tracing::debug!(index, len = self.order.len(), "collection remove ignored");
            return None;
        }
        let id = self.order.remove(index);
        tracing::debug!(%id, index, "collection entry removed");
        self.entries.remove(&id)
    }

    /// Removes the entry with `id`, if present.
    pub fn remove_id(&mut self, id: ItemId) -> Option<CollectionItem> {
        let index = self.index_of(id)?;
        self.remove(index)
    }

    /// Replaces every field of the entry at `index` in one step, keeping its id.
    ///
    /// Returns `false` (and changes nothing) when out of range.
    pub fn replace<I, K, V>(&mut self, index: usize, fields: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        match self.order.get(index).copied() {
            Some(id) => self.replace_id(id, fields),
            None => {
                tracing::debug!(index, len = self.order.len(), "collection replace ignored");
                false
            }
        }
    }

    /// Replaces every field of the entry with `id`, keeping the id.
    pub fn replace_id<I, K, V>(&mut self, id: ItemId, fields: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        entry.fields = seed_fields(fields);
        tracing::debug!(%id, "collection entry replaced");
        true
    }

    /// Sets one field of the entry at `index`. Out of range is a no-op.
    pub fn set_field(&mut self, index: usize, key: &str, value: impl Into<Value>) -> bool {
        match self.order.get(index).copied() {
            Some(id) => self.set_field_id(id, key, value),
            None => false,
        }
    }

    /// Sets one field of the entry with `id`.
    pub fn set_field_id(&mut self, id: ItemId, key: &str, value: impl Into<Value>) -> bool {
        if key == "id" {
            return false;
        }
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.fields.insert(key.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    /// Records a picked file on the entry at `index`.
    ///
    /// File name, MIME type and file reference are written by a single
    /// replace, so no reader observes a partially updated entry. Other fields
    /// are kept.
    pub fn attach_file(&mut self, index: usize, file: FileRef) -> bool {
        let Some(current) = self.get(index) else {
            return false;
        };
        let mut fields = current.fields.clone();
        fields.insert(ATTACHMENT_FILE_NAME.to_string(), Value::from(file.name.as_str()));
        fields.insert(ATTACHMENT_FILE_TYPE.to_string(), Value::from(file.mime_type.as_str()));
        fields.insert(ATTACHMENT_FILE.to_string(), Value::File(file));
        self.replace(index, fields)
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&CollectionItem> {
        self.order.get(index).and_then(|id| self.entries.get(id))
    }

    /// Returns the entry with `id`.
    pub fn get_by_id(&self, id: ItemId) -> Option<&CollectionItem> {
        self.entries.get(&id)
    }

    /// Returns the current index of the entry with `id`.
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == id)
    }

    /// Returns the ids in display order.
    pub fn ids(&self) -> &[ItemId] {
        &self.order
    }

    /// Iterates entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &CollectionItem> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// The collection as a JSON array of entry objects.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.iter().map(CollectionItem::to_json).collect())
    }
}
