//! Computed tables: ordered rows with derived variance cells and a
//! runtime-extensible column registry.
//!
//! Each [`ComputedRow`] has three groups of cells. Source cells are entered by
//! the user; derived cells (`variance`, `variancePercent`) are recomputed from
//! the actual and comparator source cells; dynamic cells belong to columns the
//! user added at runtime through the table's [`ColumnRegistry`].
//!
//! Derived cells only change on an explicit trigger: [`ComputedTable::commit`]
//! for the actual or comparator column (the Edit control losing focus),
//! [`ComputedTable::recompute`] or [`ComputedTable::recompute_all`]. Between
//! triggers they may be stale.

use std::collections::BTreeMap;

use paperwork_core::utils::text::{humanize_key, strip_whitespace};
use paperwork_core::{ItemId, Value};
use serde::{Deserialize, Serialize};

/// A static source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// The cell key.
    pub key: String,
    /// The column header.
    pub label: String,
}

/// Declaration of a computed table on a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// The table key (first segment of its paths).
    pub name: String,
    /// Section heading.
    pub label: String,
    /// Key of the actual-amount column.
    pub actual_key: String,
    /// Key of the comparator (budget) column.
    pub comparator_key: String,
    /// Key of the derived difference.
    pub variance_key: String,
    /// Key of the derived percentage.
    pub percent_key: String,
    /// Static source columns, in display order.
    pub source_columns: Vec<TableColumn>,
    /// Rows present on a fresh form.
    pub initial_rows: usize,
}

impl TableSpec {
    /// Declares a table with `budget` and `actual` source columns.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: humanize_key(&name),
            name,
            actual_key: "actual".to_string(),
            comparator_key: "budget".to_string(),
            variance_key: "variance".to_string(),
            percent_key: "variancePercent".to_string(),
            source_columns: Vec::new(),
            initial_rows: 0,
        }
    }

    /// Sets the section heading.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Appends a static source column.
    #[must_use]
    pub fn source_column(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        let key = key.into();
        if !self.source_columns.iter().any(|c| c.key == key) {
            self.source_columns.push(TableColumn {
                key,
                label: label.into(),
            });
        }
        self
    }

    /// Renames the actual and comparator columns.
    #[must_use]
    pub fn with_inputs(mut self, actual: impl Into<String>, comparator: impl Into<String>) -> Self {
        self.actual_key = actual.into();
        self.comparator_key = comparator.into();
        self
    }

    /// Renames the derived columns.
    #[must_use]
    pub fn with_outputs(mut self, variance: impl Into<String>, percent: impl Into<String>) -> Self {
        self.variance_key = variance.into();
        self.percent_key = percent.into();
        self
    }

    /// Sets the number of rows on a fresh form.
    #[must_use]
    pub const fn with_initial_rows(mut self, rows: usize) -> Self {
        self.initial_rows = rows;
        self
    }

    /// The effective source columns: the declared ones plus the comparator
    /// and actual columns when not declared.
    pub fn columns(&self) -> Vec<TableColumn> {
        let mut columns = self.source_columns.clone();
        for key in [&self.comparator_key, &self.actual_key] {
            if !columns.iter().any(|c| &c.key == key) {
                columns.push(TableColumn {
                    key: key.clone(),
                    label: humanize_key(key),
                });
            }
        }
        columns
    }

    /// The derived columns as `(key, label)`.
    pub fn derived_columns(&self) -> [TableColumn; 2] {
        [
            TableColumn {
                key: self.variance_key.clone(),
                label: "Variance".to_string(),
            },
            TableColumn {
                key: self.percent_key.clone(),
                label: "Variance %".to_string(),
            },
        ]
    }

    /// Returns `true` if `key` names a derived column.
    pub fn is_derived(&self, key: &str) -> bool {
        key == self.variance_key || key == self.percent_key
    }

    /// Builds the table for a fresh form.
    pub fn instantiate(&self) -> ComputedTable {
        let mut table = ComputedTable::new(self.clone());
        for _ in 0..self.initial_rows {
            table.add_row();
        }
        table
    }
}

/// A column added at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicColumn {
    /// The label with all whitespace and `.` removed.
    pub key: String,
    /// The label as entered.
    pub label: String,
}

/// The dynamic columns of one table. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<DynamicColumn>,
}

impl ColumnRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Derives the key for a label: the label without whitespace or `.`.
    ///
    /// `.` separates path segments, so it never appears in a key.
    pub fn key_for(label: &str) -> String {
        strip_whitespace(label).replace('.', "")
    }

    /// Registers a column. An empty key or an existing key is a no-op.
    ///
    /// Returns the new column's key when one was added.
    pub fn add(&mut self, label: &str) -> Option<String> {
        let key = Self::key_for(label);
        if key.is_empty() || self.contains(&key) {
            return None;
        }
        self.columns.push(DynamicColumn {
            key: key.clone(),
            label: label.trim().to_string(),
        });
        Some(key)
    }

    /// Returns `true` if a column with `key` exists.
    pub fn contains(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c.key == key)
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no column was added.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates columns in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &DynamicColumn> {
        self.columns.iter()
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedRow {
    /// The row's stable id.
    pub id: ItemId,
    /// User-entered cells.
    pub source: BTreeMap<String, Value>,
    /// Cells derived at the last recompute trigger, already formatted.
    pub derived: BTreeMap<String, String>,
    /// Cells of runtime-added columns.
    pub dynamic: BTreeMap<String, Value>,
}

impl ComputedRow {
    /// Reads any cell. Keys are unique across source, derived and dynamic cells.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.source
            .get(key)
            .cloned()
            .or_else(|| self.derived.get(key).map(|s| Value::from(s.as_str())))
            .or_else(|| self.dynamic.get(key).cloned())
    }

    /// The row as one flat JSON object with its `id`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("id".to_string(), serde_json::Value::String(self.id.to_string()));
        for (k, v) in self.dynamic.iter().chain(&self.source) {
            map.insert(k.clone(), v.to_json());
        }
        for (k, v) in &self.derived {
            map.insert(k.clone(), serde_json::Value::String(v.clone()));
        }
        serde_json::Value::Object(map)
    }
}

/// Reads a cell as a number. Blank or non-numeric input counts as 0.
pub fn coerce_number(value: &Value) -> f64 {
    value.as_number().unwrap_or(0.0)
}

/// Rounds to two decimals and formats with exactly two. `-0.00` becomes `0.00`.
#[allow(clippy::float_cmp)]
pub fn format_two_decimals(n: f64) -> String {
    let rounded = (n * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 || !rounded.is_finite() {
        0.0
    } else {
        rounded
    };
    format!("{rounded:.2}")
}

/// Computes `(variance, percent)` as formatted text.
///
/// The percentage is the literal `0.00` when the comparator is 0.
#[allow(clippy::float_cmp)]
pub fn variance(actual: f64, comparator: f64) -> (String, String) {
    let diff = actual - comparator;
    let percent = if comparator == 0.0 {
        "0.00".to_string()
    } else {
        format_two_decimals(diff / comparator * 100.0)
    };
    (format_two_decimals(diff), percent)
}

/// An ordered list of rows sharing one column registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedTable {
    spec: TableSpec,
    source_keys: Vec<String>,
    columns: ColumnRegistry,
    rows: Vec<ComputedRow>,
}

impl ComputedTable {
    /// Creates an empty table.
    pub fn new(spec: TableSpec) -> Self {
        let source_keys = spec.columns().into_iter().map(|c| c.key).collect();
        Self {
            spec,
            source_keys,
            columns: ColumnRegistry::new(),
            rows: Vec::new(),
        }
    }

    /// Returns the table declaration.
    pub const fn spec(&self) -> &TableSpec {
        &self.spec
    }

    /// Returns the dynamic column registry.
    pub const fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    /// Returns `true` if `key` is a source column.
    pub fn is_source(&self, key: &str) -> bool {
        self.source_keys.iter().any(|k| k == key)
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row at `index`.
    pub fn row(&self, index: usize) -> Option<&ComputedRow> {
        self.rows.get(index)
    }

    /// Returns all rows in order.
    pub fn rows(&self) -> &[ComputedRow] {
        &self.rows
    }

    /// Returns the current index of the row with `id`.
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    /// Adds a dynamic column and seeds an empty cell in every existing row.
    ///
    /// Returns `false` when the label's key is empty, already registered,
    /// `id`, or names a source or derived column of the table.
    pub fn add_column(&mut self, label: &str) -> bool {
        let key = ColumnRegistry::key_for(label);
        if key == "id" || self.is_source(&key) || self.spec.is_derived(&key) {
            tracing::debug!(
                table = %self.spec.name,
                %key,
                "column collides with a declared column"
            );
            return false;
        }
        let Some(key) = self.columns.add(label) else {
            tracing::debug!(table = %self.spec.name, label, "column add ignored");
            return false;
        };
        for row in &mut self.rows {
            row.dynamic.insert(key.clone(), Value::Null);
        }
        tracing::debug!(table = %self.spec.name, %key, "column added");
        true
    }

    /// Appends a row with blank cells in every column.
    pub fn add_row(&mut self) -> ItemId {
        let id = ItemId::new();
        let row = ComputedRow {
            id,
            source: self
                .source_keys
                .iter()
                .map(|k| (k.clone(), Value::Null))
                .collect(),
            derived: [&self.spec.variance_key, &self.spec.percent_key]
                .into_iter()
                .map(|k| (k.clone(), String::new()))
                .collect(),
            dynamic: self
                .columns
                .iter()
                .map(|c| (c.key.clone(), Value::Null))
                .collect(),
        };
        self.rows.push(row);
        tracing::debug!(table = %self.spec.name, %id, "row added");
        id
    }

    /// Removes the row at `index`. Out of range is a no-op.
    pub fn remove_row(&mut self, index: usize) -> Option<ComputedRow> {
        if index >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(index);
        tracing::debug!(table = %self.spec.name, id = %row.id, index, "row removed");
        Some(row)
    }

    /// Stores a source cell. Never recomputes.
    ///
    /// Returns `false` for an unknown row or a key that is not a source column.
    pub fn set_source(&mut self, row: usize, key: &str, value: impl Into<Value>) -> bool {
        if !self.is_source(key) {
            return false;
        }
        match self.rows.get_mut(row) {
            Some(r) => {
                r.source.insert(key.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    /// Stores a dynamic cell. Only registered columns are accepted.
    pub fn set_dynamic(&mut self, row: usize, key: &str, value: impl Into<Value>) -> bool {
        if !self.columns.contains(key) {
            return false;
        }
        match self.rows.get_mut(row) {
            Some(r) => {
                r.dynamic.insert(key.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    /// Signals that editing of `key` on `row` finished.
    ///
    /// Recomputes the row when `key` is the actual or comparator column and
    /// returns whether a recompute happened.
    pub fn commit(&mut self, row: usize, key: &str) -> bool {
        if key == self.spec.actual_key || key == self.spec.comparator_key {
            self.recompute(row)
        } else {
            false
        }
    }

    /// Recomputes the derived cells of one row. Out of range is a no-op.
    pub fn recompute(&mut self, row: usize) -> bool {
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        let actual = r.source.get(&self.spec.actual_key).map_or(0.0, coerce_number);
        let comparator = r
            .source
            .get(&self.spec.comparator_key)
            .map_or(0.0, coerce_number);
        let (diff, percent) = variance(actual, comparator);
        tracing::debug!(
            table = %self.spec.name,
            row,
            actual,
            comparator,
            variance = %diff,
            percent = %percent,
            "row recomputed"
        );
        r.derived.insert(self.spec.variance_key.clone(), diff);
        r.derived.insert(self.spec.percent_key.clone(), percent);
        true
    }

    /// Recomputes every row.
    pub fn recompute_all(&mut self) {
        for row in 0..self.rows.len() {
            self.recompute(row);
        }
    }

    /// Sums a column over all rows, coercing each cell.
    pub fn total(&self, key: &str) -> f64 {
        self.rows
            .iter()
            .map(|r| r.get(key).map_or(0.0, |v| coerce_number(&v)))
            .sum()
    }

    /// The table as a JSON array of flat row objects.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.rows.iter().map(ComputedRow::to_json).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revenue() -> ComputedTable {
        TableSpec::new("revenue")
            .source_column("category", "Category")
            .instantiate()
    }

    #[test]
    fn test_variance_positive() {
        let mut t = revenue();
        t.add_row();
        t.set_source(0, "actual", 120_i64);
        t.set_source(0, "budget", 100_i64);
        assert!(t.recompute(0));
        let row = t.row(0).unwrap();
        assert_eq!(row.derived["variance"], "20.00");
        assert_eq!(row.derived["variancePercent"], "20.00");
    }

    #[test]
    fn test_variance_zero_comparator() {
        let mut t = revenue();
        t.add_row();
        t.set_source(0, "actual", 80_i64);
        t.set_source(0, "budget", 0_i64);
        t.recompute(0);
        let row = t.row(0).unwrap();
        assert_eq!(row.derived["variance"], "80.00");
        assert_eq!(row.derived["variancePercent"], "0.00");
    }

    #[test]
    fn test_non_numeric_coerces_to_zero() {
        let mut t = revenue();
        t.add_row();
        t.set_source(0, "actual", "abc");
        t.set_source(0, "budget", "50");
        t.recompute(0);
        let row = t.row(0).unwrap();
        assert_eq!(row.derived["variance"], "-50.00");
        assert_eq!(row.derived["variancePercent"], "-100.00");
    }

    #[test]
    fn test_rounding_and_negative_zero() {
        assert_eq!(format_two_decimals(1.0 / 3.0), "0.33");
        assert_eq!(format_two_decimals(2.675_1), "2.68");
        assert_eq!(format_two_decimals(-0.001), "0.00");
        assert_eq!(format_two_decimals(-0.0), "0.00");
        assert_eq!(variance(100.0, 100.0), ("0.00".to_string(), "0.00".to_string()));
    }

    #[test]
    fn test_set_source_does_not_recompute() {
        let mut t = revenue();
        t.add_row();
        t.set_source(0, "actual", 10_i64);
        assert_eq!(t.row(0).unwrap().derived["variance"], "");
        assert!(!t.commit(0, "category"));
        assert_eq!(t.row(0).unwrap().derived["variance"], "");
        assert!(t.commit(0, "actual"));
        assert_eq!(t.row(0).unwrap().derived["variance"], "10.00");
    }

    #[test]
    fn test_set_source_rejects_unknown_keys() {
        let mut t = revenue();
        t.add_row();
        assert!(!t.set_source(0, "variance", "1"));
        assert!(!t.set_source(0, "nope", "1"));
        assert!(!t.set_source(4, "actual", "1"));
    }

    #[test]
    fn test_add_column_dedupes_by_key() {
        let mut t = revenue();
        assert!(t.add_column("Region"));
        assert!(!t.add_column("Region "));
        assert!(!t.add_column(" R egion"));
        assert!(!t.add_column("   "));
        assert_eq!(t.columns().len(), 1);
        assert!(t.add_column("Cost Center"));
        assert!(t.columns().contains("CostCenter"));
        assert!(t.add_column("Q1.5 Forecast"));
        assert!(t.columns().contains("Q15Forecast"));
    }

    #[test]
    fn test_add_column_rejects_declared_keys() {
        let mut t = revenue();
        t.add_row();
        t.set_source(0, "actual", 120_i64);
        assert!(!t.add_column("actual"));
        assert!(!t.add_column("bud get"));
        assert!(!t.add_column("category"));
        assert!(!t.add_column("variance"));
        assert!(!t.add_column("variance Percent"));
        assert!(!t.add_column("id"));
        assert!(t.columns().is_empty());
        assert!(t.row(0).unwrap().dynamic.is_empty());
        assert_eq!(t.row(0).unwrap().get("actual"), Some(Value::Int(120)));
    }

    #[test]
    fn test_add_column_seeds_existing_rows() {
        let mut t = revenue();
        t.add_row();
        t.add_column("Region");
        assert_eq!(t.row(0).unwrap().dynamic.get("Region"), Some(&Value::Null));
        t.add_row();
        assert_eq!(t.row(1).unwrap().dynamic.get("Region"), Some(&Value::Null));
        assert!(t.set_dynamic(1, "Region", "EMEA"));
        assert!(!t.set_dynamic(1, "Country", "FR"));
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut t = revenue();
        assert!(!t.recompute(0));
        assert!(t.remove_row(0).is_none());
        t.recompute_all();
        assert!(t.is_empty());
    }

    #[test]
    fn test_remove_row_keeps_other_ids() {
        let mut t = revenue();
        let a = t.add_row();
        let b = t.add_row();
        assert_eq!(t.remove_row(0).unwrap().id, a);
        assert_eq!(t.index_of(b), Some(0));
    }

    #[test]
    fn test_total_and_json() {
        let mut t = revenue();
        for (actual, budget) in [(120, 100), (80, 0)] {
            let i = t.len();
            t.add_row();
            t.set_source(i, "actual", i64::from(actual));
            t.set_source(i, "budget", i64::from(budget));
        }
        t.recompute_all();
        assert!((t.total("actual") - 200.0).abs() < f64::EPSILON);
        assert!((t.total("variance") - 100.0).abs() < f64::EPSILON);

        let json = t.to_json();
        assert_eq!(json[0]["variance"], "20.00");
        assert_eq!(json[1]["actual"], 80);
        assert!(json[1]["id"].is_string());
    }

    #[test]
    fn test_spec_columns() {
        let spec = TableSpec::new("costs")
            .source_column("item", "Item")
            .with_inputs("spent", "planned")
            .with_outputs("delta", "deltaPct")
            .with_initial_rows(2);
        let keys: Vec<String> = spec.columns().into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["item", "planned", "spent"]);
        assert!(spec.is_derived("deltaPct"));
        let t = spec.instantiate();
        assert_eq!(t.len(), 2);
        assert_eq!(t.row(0).unwrap().derived.get("delta"), Some(&String::new()));
    }
}
