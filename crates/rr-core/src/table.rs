//! Row-of-fields tables exchanged with scrapers and export sinks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Table shape errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A row does not have one cell per column.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A column the caller depends on is not present.
    #[error("missing required column: {0}")]
    MissingColumn(String),
}

/// An ordered table of string cells.
///
/// Every row holds exactly one cell per column. Absent values are empty
/// strings, never missing cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedTable")]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Wire form of [`Table`]; deserialized rows are width-checked by [`Table::new`].
#[derive(Deserialize)]
struct UncheckedTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TryFrom<UncheckedTable> for Table {
    type Error = TableError;

    fn try_from(raw: UncheckedTable) -> Result<Self, Self::Error> {
        Self::new(raw.columns, raw.rows)
    }
}

impl Table {
    /// Builds a table, rejecting rows whose width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let expected = columns.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(TableError::RaggedRow {
                row,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Builds a table from scraped cells, padding short rows with empty
    /// strings and truncating the header to the widest row.
    ///
    /// Result pages often carry trailing header cells with no data below them,
    /// and rows that stop early.
    pub fn from_scraped(mut columns: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        if let Some(widest) = rows.iter().map(Vec::len).max() {
            columns.truncate(widest);
        }
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`Table::column_index`] but fails with [`TableError::MissingColumn`].
    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Iterates over rows as column-aware views.
    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |cells| RowRef {
            columns: &self.columns,
            cells,
        })
    }

    /// Renames a column in place. Returns `false` if `from` is absent.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Removes the column at `index` from the header and every row.
    pub fn drop_column(&mut self, index: usize) {
        if index >= self.columns.len() {
            return;
        }
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
    }

    /// Rewrites every cell of a column through `f`.
    pub fn map_column(&mut self, name: &str, f: impl Fn(&str) -> String) {
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                row[idx] = f(&row[idx]);
            }
        }
    }

    /// Keeps only the rows matching `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(RowRef<'_>) -> bool) {
        let columns = &self.columns;
        self.rows.retain(|cells| keep(RowRef { columns, cells }));
    }

    /// Converts rows to JSON objects keyed by column name.
    pub fn to_json_records(&self) -> Value {
        let records = self
            .rows()
            .map(|row| {
                let object: Map<String, Value> = row
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                    .collect();
                Value::Object(object)
            })
            .collect();
        Value::Array(records)
    }
}

/// A borrowed row with access by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [String],
    cells: &'a [String],
}

impl<'a> RowRef<'a> {
    /// Returns the cell under `column`, or `None` if the table has no such column.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.cells.get(idx))
            .map(String::as_str)
    }

    pub fn cells(&self) -> &'a [String] {
        self.cells
    }

    /// Iterates over `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn deserialized_tables_are_width_checked() {
        let ragged = serde_json::json!({ "columns": ["a", "b"], "rows": [["1"]] });
        let err = serde_json::from_value::<Table>(ragged).unwrap_err();
        assert!(err.to_string().contains("row 0 has 1 cells, expected 2"), "{err}");

        let table: Table = serde_json::from_value(
            serde_json::json!({ "columns": ["a", "b"], "rows": [["1", "2"]] }),
        )
        .unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("b"), Some("2"));
        assert_eq!(row.get("c"), None);
        assert_eq!(serde_json::to_value(&table).unwrap()["rows"][0][1], "2");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Table::new(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3"])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn scraped_rows_are_padded_and_header_truncated() {
        let table = Table::from_scraped(
            strings(&["a", "b", "c", "extra"]),
            vec![strings(&["1", "2", "3"]), strings(&["4"])],
        );
        assert_eq!(table.columns(), strings(&["a", "b", "c"]).as_slice());
        let second: Vec<_> = table.rows().nth(1).unwrap().cells().to_vec();
        assert_eq!(second, strings(&["4", "", ""]));
    }

    #[test]
    fn row_lookup_by_column_name() {
        let table = Table::new(strings(&["x", "y"]), vec![strings(&["1", "2"])]).unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("y"), Some("2"));
        assert_eq!(row.get("z"), None);
    }

    #[test]
    fn rename_drop_and_map_columns() {
        let mut table = Table::new(
            strings(&["#", "מין", "name"]),
            vec![strings(&["1", "ז", "a"]), strings(&["2", "נ", "b"])],
        )
        .unwrap();
        assert!(table.rename_column("מין", "מגדר"));
        table.map_column("מגדר", |v| if v == "ז" { "male".into() } else { v.into() });
        table.drop_column(0);

        assert_eq!(table.columns(), strings(&["מגדר", "name"]).as_slice());
        let first = table.rows().next().unwrap();
        assert_eq!(first.get("מגדר"), Some("male"));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let table = Table::new(strings(&["a"]), vec![]).unwrap();
        assert_eq!(
            table.require_column("b"),
            Err(TableError::MissingColumn("b".to_string()))
        );
    }

    #[test]
    fn json_records_keep_column_names() {
        let table = Table::new(strings(&["a", "b"]), vec![strings(&["1", "2"])]).unwrap();
        assert_eq!(
            table.to_json_records(),
            serde_json::json!([{ "a": "1", "b": "2" }])
        );
    }
}
