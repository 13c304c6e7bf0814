//! Field paths and stable item identifiers.
//!
//! A [`FieldPath`] addresses one value inside a form: a top-level scalar
//! (`budget`), a field of a collection item (`attachments.0.fileName`) or a
//! table cell (`revenue.2.actual`). Collection items may also be addressed
//! by their [`ItemId`] (`attachments.@<uuid>.fileName`), which stays valid
//! when earlier items are removed. Positional indexes do not.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PaperworkError;

/// An opaque, stable identifier for a collection item or table row.
///
/// Ids are random (UUID v4) and assigned exactly once, when the item is
/// created. They are never reassigned or reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = PaperworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self).map_err(|e| PaperworkError::InvalidPath {
            path: s.to_string(),
            reason: format!("invalid item id: {e}"),
        })
    }
}

/// One segment of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named key (field, collection or table name).
    Key(String),
    /// A positional index into a collection or table.
    Index(usize),
    /// A stable item id.
    Id(ItemId),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
            Self::Id(id) => write!(f, "@{id}"),
        }
    }
}

/// A parsed field path.
///
/// # Examples
///
/// ```
/// use paperwork_core::path::{FieldPath, PathSegment};
///
/// let path: FieldPath = "attachments[1].fileName".parse().unwrap();
/// assert_eq!(path.to_string(), "attachments.1.fileName");
/// assert_eq!(path.segments()[1], PathSegment::Index(1));
///
/// let scalar = FieldPath::key("employeeName");
/// assert!(scalar.is_scalar());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

fn key_pattern() -> &'static Regex {
    static KEY: OnceLock<Regex> = OnceLock::new();
    // `KEY` or `KEY[3]`
    KEY.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_\-]*)(?:\[(\d+)\])?$").expect("valid path regex")
    })
}

impl FieldPath {
    /// Creates a single-key (scalar) path.
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(name.into())],
        }
    }

    /// Creates a `container.index.field` path.
    pub fn indexed(container: impl Into<String>, index: usize, field: impl Into<String>) -> Self {
        Self {
            segments: vec![
                PathSegment::Key(container.into()),
                PathSegment::Index(index),
                PathSegment::Key(field.into()),
            ],
        }
    }

    /// Creates a `container.@id.field` path.
    pub fn by_id(container: impl Into<String>, id: ItemId, field: impl Into<String>) -> Self {
        Self {
            segments: vec![
                PathSegment::Key(container.into()),
                PathSegment::Id(id),
                PathSegment::Key(field.into()),
            ],
        }
    }

    /// Parses a path, accepting dotted indexes, bracketed indexes and `@id` segments.
    ///
    /// Names before a position must be identifiers. The field key that follows
    /// an index or `@id` may be any text without a `.`, so `costs.0.2024` and
    /// `costs.0.Cost%` address cells of runtime-added columns.
    pub fn parse(text: &str) -> Result<Self, PaperworkError> {
        let invalid = |reason: &str| PaperworkError::InvalidPath {
            path: text.to_string(),
            reason: reason.to_string(),
        };

        if text.trim().is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments: Vec<PathSegment> = Vec::new();
        for part in text.split('.') {
            if part.is_empty() {
                return Err(invalid("empty segment"));
            }
            // a field key after an index or id is taken verbatim
            if matches!(segments.last(), Some(PathSegment::Index(_) | PathSegment::Id(_))) {
                segments.push(PathSegment::Key(part.to_string()));
            } else if let Some(id) = part.strip_prefix('@') {
                segments.push(PathSegment::Id(id.parse()?));
            } else if part.bytes().all(|b| b.is_ascii_digit()) {
                let index = part.parse().map_err(|_| invalid("index out of range"))?;
                segments.push(PathSegment::Index(index));
            } else if let Some(caps) = key_pattern().captures(part) {
                segments.push(PathSegment::Key(caps[1].to_string()));
                if let Some(index) = caps.get(2) {
                    let index = index
                        .as_str()
                        .parse()
                        .map_err(|_| invalid("index out of range"))?;
                    segments.push(PathSegment::Index(index));
                }
            } else {
                return Err(invalid(&format!("unexpected segment '{part}'")));
            }
        }

        if !matches!(segments.first(), Some(PathSegment::Key(_))) {
            return Err(invalid("path must start with a name"));
        }
        Ok(Self { segments })
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the leading name (field, collection or table).
    pub fn root(&self) -> &str {
        match self.segments.first() {
            Some(PathSegment::Key(k)) => k,
            _ => "",
        }
    }

    /// Returns `true` if the path is a single top-level key.
    pub fn is_scalar(&self) -> bool {
        self.segments.len() == 1
    }

    /// Returns the trailing key, if the path ends with one.
    pub fn leaf(&self) -> Option<&str> {
        match self.segments.last() {
            Some(PathSegment::Key(k)) => Some(k),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PaperworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = PaperworkError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ids_are_unique() {
        let a = ItemId::new();
        let b = ItemId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_item_id_roundtrip() {
        let id = ItemId::new();
        let parsed: ItemId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_parse_scalar() {
        let p = FieldPath::parse("employeeName").unwrap();
        assert!(p.is_scalar());
        assert_eq!(p.root(), "employeeName");
        assert_eq!(p.leaf(), Some("employeeName"));
    }

    #[test]
    fn test_parse_dotted_index() {
        let p = FieldPath::parse("attachments.2.fileName").unwrap();
        assert_eq!(
            p.segments(),
            &[
                PathSegment::Key("attachments".into()),
                PathSegment::Index(2),
                PathSegment::Key("fileName".into()),
            ]
        );
    }

    #[test]
    fn test_parse_bracket_index_canonicalizes() {
        let p = FieldPath::parse("customFields[10].value").unwrap();
        assert_eq!(p.to_string(), "customFields.10.value");
        assert_eq!(p, FieldPath::indexed("customFields", 10, "value"));
    }

    #[test]
    fn test_parse_id_segment() {
        let id = ItemId::new();
        let p = FieldPath::parse(&format!("signatures.@{id}.name")).unwrap();
        assert_eq!(p, FieldPath::by_id("signatures", id, "name"));
        assert_eq!(p.to_string(), format!("signatures.@{id}.name"));
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse("0.name").is_err());
        assert!(FieldPath::parse("bad key").is_err());
        assert!(FieldPath::parse("x.@nope").is_err());
    }

    #[test]
    fn test_parse_free_form_field_keys() {
        let numeric = FieldPath::parse("costs.0.2024").unwrap();
        assert_eq!(numeric, FieldPath::indexed("costs", 0, "2024"));
        assert_eq!(numeric.to_string(), "costs.0.2024");

        let punctuated = FieldPath::parse("costs[1].Cost%").unwrap();
        assert_eq!(punctuated, FieldPath::indexed("costs", 1, "Cost%"));
        assert_eq!(FieldPath::parse("costs.0.Région").unwrap().leaf(), Some("Région"));
        assert_eq!(FieldPath::parse("costs.0.@home").unwrap().leaf(), Some("@home"));

        // the root name is still an identifier
        assert!(FieldPath::parse("Cost%.0.actual").is_err());
    }
}
