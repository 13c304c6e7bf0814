//! Dynamic value types stored at form field paths.
//!
//! The [`Value`] enum is the universal type used to hold scalar field values,
//! collection item fields and table cells. Every value has exactly one
//! canonical *form text* ([`Value::to_form_text`]): the string an Edit-mode
//! control is bound to and the string a Print-mode projection shows.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The date format used for form text and JSON snapshots.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A reference to a file chosen through the platform's file picker.
///
/// The runtime never reads file bytes; `handle` is an opaque token owned by
/// whichever collaborator produced the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    /// The file name as reported by the picker.
    pub name: String,
    /// The MIME type (e.g. `application/pdf`).
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Opaque platform handle.
    pub handle: String,
}

impl FileRef {
    /// Creates a file reference with an empty handle.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            handle: String::new(),
        }
    }

    /// Sets the opaque platform handle.
    #[must_use]
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = handle.into();
        self
    }

    /// Returns the lowercase file extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// A dynamically typed form value.
///
/// # Examples
///
/// ```
/// use paperwork_core::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v.to_form_text(), "42");
///
/// assert!(Value::Null.is_blank());
/// assert!(Value::from("   ").is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// No value entered.
    #[default]
    Null,
    /// A boolean value (checkboxes).
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string. Most text inputs store their raw text here.
    String(String),
    /// A calendar date.
    Date(NaiveDate),
    /// A picked file.
    File(FileRef),
    /// A list of values (multi-select).
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` if the value counts as "not filled in".
    ///
    /// `Null`, whitespace-only strings, files without a name and empty lists
    /// are blank. `Bool(false)` and `Int(0)` are not.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.trim().is_empty(),
            Self::File(f) => f.name.trim().is_empty(),
            Self::List(items) => items.iter().all(Self::is_blank),
            Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::Date(_) => false,
        }
    }

    /// Returns the canonical text of this value.
    ///
    /// Edit controls are bound to this text and Print projections show it,
    /// which is what keeps the two render modes in agreement.
    pub fn to_form_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(v) => v.to_string(),
            Self::String(s) => s.clone(),
            Self::Date(d) => d.format(DATE_FORMAT).to_string(),
            Self::File(f) => f.name.clone(),
            Self::List(items) => items
                .iter()
                .filter(|v| !v.is_blank())
                .map(Self::to_form_text)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Interprets the value as a number, if it has a numeric reading.
    ///
    /// Strings are trimmed and parsed; non-finite results are rejected.
    pub fn as_number(&self) -> Option<f64> {
        #[allow(clippy::cast_precision_loss)]
        let n = match self {
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Returns the string slice if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the file reference if this is a `File` value.
    pub const fn as_file(&self) -> Option<&FileRef> {
        match self {
            Self::File(f) => Some(f),
            _ => None,
        }
    }

    /// Converts to a plain JSON value for submit snapshots.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::json!(i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Date(d) => serde_json::Value::String(d.format(DATE_FORMAT).to_string()),
            Self::File(f) => serde_json::json!({
                "name": f.name,
                "mimeType": f.mime_type,
                "size": f.size,
                "handle": f.handle,
            }),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
        }
    }

    /// Builds a value from plain JSON, as found in initial-value files.
    ///
    /// Objects have no direct counterpart and are kept as their JSON text.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| n.as_f64().map_or(Self::Null, Self::Float), Self::Int),
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => {
                Self::List(items.iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(_) => Self::String(json.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_form_text())
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<FileRef> for Value {
    fn from(v: FileRef) -> Self {
        Self::File(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(Value::from(" \t").is_blank());
        assert!(Value::List(vec![]).is_blank());
        assert!(Value::List(vec![Value::Null, Value::from("")]).is_blank());
        assert!(Value::File(FileRef::new("", "", 0)).is_blank());
        assert!(!Value::Bool(false).is_blank());
        assert!(!Value::Int(0).is_blank());
        assert!(!Value::from("x").is_blank());
    }

    #[test]
    fn test_form_text() {
        assert_eq!(Value::Null.to_form_text(), "");
        assert_eq!(Value::Bool(true).to_form_text(), "true");
        assert_eq!(Value::Int(-7).to_form_text(), "-7");
        assert_eq!(Value::Float(12.0).to_form_text(), "12");
        assert_eq!(Value::Float(12.5).to_form_text(), "12.5");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Value::Date(date).to_form_text(), "2024-03-09");
        let file = FileRef::new("invoice.pdf", "application/pdf", 1024);
        assert_eq!(Value::File(file).to_form_text(), "invoice.pdf");
        let list = Value::List(vec!["a".into(), Value::Null, "b".into()]);
        assert_eq!(list.to_form_text(), "a, b");
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Value::Int(3).as_number(), Some(3.0));
        assert_eq!(Value::from(" 4.5 ").as_number(), Some(4.5));
        assert_eq!(Value::from("abc").as_number(), None);
        assert_eq!(Value::from("NaN").as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn test_to_json() {
        assert_eq!(Value::Null.to_json(), serde_json::Value::Null);
        assert_eq!(Value::Int(5).to_json(), serde_json::json!(5));
        assert_eq!(Value::Float(f64::NAN).to_json(), serde_json::Value::Null);
        let file = FileRef::new("a.png", "image/png", 10).with_handle("h1");
        assert_eq!(
            Value::File(file).to_json(),
            serde_json::json!({
                "name": "a.png",
                "mimeType": "image/png",
                "size": 10,
                "handle": "h1"
            })
        );
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from_json(&serde_json::json!(3)), Value::Int(3));
        assert_eq!(Value::from_json(&serde_json::json!(2.5)), Value::Float(2.5));
        assert_eq!(Value::from_json(&serde_json::json!("x")), Value::from("x"));
        assert_eq!(
            Value::from_json(&serde_json::json!([true, null])),
            Value::List(vec![Value::Bool(true), Value::Null])
        );
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(FileRef::new("Report.PDF", "", 0).extension(), Some("pdf".into()));
        assert_eq!(FileRef::new("README", "", 0).extension(), None);
        assert_eq!(FileRef::new("trailing.", "", 0).extension(), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_serde_roundtrip_tagged() {
        let v = Value::Int(9);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"type":"Int","value":9}"#);
    }
}
