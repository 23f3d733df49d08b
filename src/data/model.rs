use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as produced by the loaders.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "NULL"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the source sheet
// ---------------------------------------------------------------------------

/// A single record: column_name → value.
///
/// A column missing from the map reads the same as an explicit
/// [`CellValue::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// True when the column is absent or holds `Null`.
    pub fn is_null(&self, column: &str) -> bool {
        self.get(column).map_or(true, CellValue::is_null)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Row {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – ordered rows plus an explicit column list
// ---------------------------------------------------------------------------

/// An ordered sequence of rows.
///
/// Rows are shared behind `Arc` so a filtered view holds the very same
/// records as the dataset it was derived from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Arc<Row>>,
    columns: Vec<String>,
}

impl Dataset {
    /// Build a dataset with a declared column order (e.g. a header row).
    /// Keys found in rows but missing from `columns` are appended.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let rows: Vec<Arc<Row>> = rows.into_iter().map(Arc::new).collect();
        let columns = union_columns(columns, &rows);
        Dataset { rows, columns }
    }

    /// Build a dataset deriving columns from the union of all rows' keys.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(Vec::new(), rows)
    }

    /// A dataset with the same columns holding a subset of shared rows.
    pub(crate) fn with_rows(&self, rows: Vec<Arc<Row>>) -> Self {
        Dataset {
            rows,
            columns: self.columns.clone(),
        }
    }

    pub fn rows(&self) -> &[Arc<Row>] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows where `column` is null or absent.
    pub fn null_count(&self, column: &str) -> usize {
        self.rows.iter().filter(|r| r.is_null(column)).count()
    }
}

fn union_columns(mut columns: Vec<String>, rows: &[Arc<Row>]) -> Vec<String> {
    let mut seen: BTreeSet<String> = columns.iter().cloned().collect();
    for row in rows {
        for col in row.columns() {
            if seen.insert(col.to_string()) {
                columns.push(col.to_string());
            }
        }
    }
    columns
}
