use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use super::model::{Dataset, Row};

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// Which nullness the operation columns are tested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    #[default]
    Null,
    NotNull,
}

/// How the primary column's nullness gates each column test.
///
/// `And` requires the primary column to share the tested nullness, `Or`
/// ignores the primary column. Across operation columns the combinator is
/// always AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationType {
    #[default]
    And,
    Or,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Null => write!(f, "NULL"),
            Operation::NotNull => write!(f, "NOT NULL"),
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::And => write!(f, "AND"),
            OperationType::Or => write!(f, "OR"),
        }
    }
}

/// Rejected filter input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSpec {
    #[error("Please fill in both Primary Column and Operation Columns (primary column is empty).")]
    MissingPrimaryColumn,
    #[error("Please fill in both Primary Column and Operation Columns (operation columns are empty).")]
    MissingOperationColumns,
}

/// A complete filter request, rebuilt from the form on every apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Case-sensitive.
    pub primary_column: String,
    /// Upper-cased column names.
    pub operation_columns: BTreeSet<String>,
    pub operation_type: OperationType,
    pub operation: Operation,
}

impl FilterSpec {
    /// Build a spec, upper-casing every operation column.
    pub fn new<I, S>(
        primary_column: impl Into<String>,
        operation_columns: I,
        operation_type: OperationType,
        operation: Operation,
    ) -> Result<Self, InvalidSpec>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let spec = FilterSpec {
            primary_column: primary_column.into(),
            operation_columns: operation_columns
                .into_iter()
                .map(|c| c.as_ref().trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
            operation_type,
            operation,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Build a spec from raw form text. `columns` is comma-separated.
    pub fn from_input(
        primary: &str,
        columns: &str,
        operation_type: OperationType,
        operation: Operation,
    ) -> Result<Self, InvalidSpec> {
        Self::new(primary.trim(), columns.split(','), operation_type, operation)
    }

    pub fn validate(&self) -> Result<(), InvalidSpec> {
        if self.primary_column.trim().is_empty() {
            return Err(InvalidSpec::MissingPrimaryColumn);
        }
        if self.operation_columns.is_empty() {
            return Err(InvalidSpec::MissingOperationColumns);
        }
        Ok(())
    }

    /// Whether a single row survives this filter.
    pub fn matches(&self, row: &Row) -> bool {
        let want_null = self.operation == Operation::Null;
        let primary_ok = row.is_null(&self.primary_column) == want_null;

        self.operation_columns.iter().all(|col| {
            let column_ok = row.is_null(col) == want_null;
            match self.operation_type {
                OperationType::And => column_ok && primary_ok,
                OperationType::Or => column_ok,
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return the rows of `original` that pass `spec`, in original order.
///
/// The result shares row allocations with `original`; nothing is cloned
/// beyond the `Arc` handles.
pub fn filter(original: &Dataset, spec: &FilterSpec) -> Result<Dataset, InvalidSpec> {
    spec.validate()?;
    let rows = original
        .rows()
        .iter()
        .filter(|row| spec.matches(row))
        .cloned()
        .collect();
    Ok(original.with_rows(rows))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::model::CellValue;

    fn row(cells: &[(&str, Option<i64>)]) -> Row {
        cells
            .iter()
            .map(|(k, v)| (*k, v.map_or(CellValue::Null, CellValue::Integer)))
            .collect()
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec!["A".into(), "B".into()],
            vec![
                row(&[("A", Some(1)), ("B", None)]),
                row(&[("A", None), ("B", Some(2))]),
                row(&[("A", None), ("B", None)]),
            ],
        )
    }

    fn spec(cols: &[&str], ty: OperationType, op: Operation) -> FilterSpec {
        FilterSpec::new("A", cols.iter().copied(), ty, op).unwrap()
    }

    fn positions(original: &Dataset, filtered: &Dataset) -> Vec<usize> {
        filtered
            .rows()
            .iter()
            .map(|r| {
                original
                    .rows()
                    .iter()
                    .position(|o| Arc::ptr_eq(o, r))
                    .expect("filtered row must come from the original")
            })
            .collect()
    }

    #[test]
    fn null_and_requires_primary_null() {
        let ds = sample();
        let out = filter(&ds, &spec(&["B"], OperationType::And, Operation::Null)).unwrap();
        assert_eq!(positions(&ds, &out), vec![2]);
    }

    #[test]
    fn null_or_ignores_primary() {
        let ds = sample();
        let out = filter(&ds, &spec(&["B"], OperationType::Or, Operation::Null)).unwrap();
        assert_eq!(positions(&ds, &out), vec![0, 2]);
    }

    #[test]
    fn not_null_and_matches_nothing_in_sample() {
        let ds = sample();
        let out = filter(&ds, &spec(&["B"], OperationType::And, Operation::NotNull)).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns(), ds.columns());
    }

    #[test]
    fn not_null_or_with_absent_column_is_always_empty() {
        let ds = sample();
        let out = filter(
            &ds,
            &spec(&["B", "C"], OperationType::Or, Operation::NotNull),
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn absent_column_behaves_as_null() {
        let ds = sample();
        let out = filter(&ds, &spec(&["MISSING"], OperationType::Or, Operation::Null)).unwrap();
        assert_eq!(positions(&ds, &out), vec![0, 1, 2]);
    }

    #[test]
    fn result_is_ordered_subsequence() {
        let ds = Dataset::from_rows(
            (0..20)
                .map(|i| row(&[("A", (i % 3 != 0).then_some(i)), ("B", (i % 2 == 0).then_some(i))]))
                .collect(),
        );
        for ty in [OperationType::And, OperationType::Or] {
            for op in [Operation::Null, Operation::NotNull] {
                let out = filter(&ds, &spec(&["B"], ty, op)).unwrap();
                let pos = positions(&ds, &out);
                assert!(pos.windows(2).all(|w| w[0] < w[1]), "{ty} {op}: {pos:?}");
            }
        }
    }

    #[test]
    fn filtering_does_not_touch_original() {
        let ds = sample();
        let before: Vec<Row> = ds.rows().iter().map(|r| (**r).clone()).collect();
        let _ = filter(&ds, &spec(&["B"], OperationType::And, Operation::Null)).unwrap();
        assert_eq!(ds.len(), 3);
        let after: Vec<Row> = ds.rows().iter().map(|r| (**r).clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn every_listed_column_must_pass() {
        let ds = Dataset::from_rows(vec![
            row(&[("P", Some(1)), ("X", None), ("Y", Some(1))]),
            row(&[("P", Some(1)), ("X", None), ("Y", None)]),
        ]);
        let spec = FilterSpec::new("P", ["x", "y"], OperationType::Or, Operation::Null).unwrap();
        assert_eq!(positions(&ds, &filter(&ds, &spec).unwrap()), vec![1]);
    }

    #[test]
    fn primary_column_stays_case_sensitive() {
        let ds = Dataset::from_rows(vec![row(&[("a", Some(1)), ("B", None)])]);
        let lower = FilterSpec::new("a", ["b"], OperationType::And, Operation::Null).unwrap();
        let upper = FilterSpec::new("A", ["b"], OperationType::And, Operation::Null).unwrap();
        // "a" holds a value, "A" is absent and therefore null.
        assert!(filter(&ds, &lower).unwrap().is_empty());
        assert_eq!(filter(&ds, &upper).unwrap().len(), 1);
    }

    #[test]
    fn form_input_is_split_trimmed_and_upper_cased() {
        let spec = FilterSpec::from_input(
            "  Name ",
            " b, c ,,d ",
            OperationType::Or,
            Operation::NotNull,
        )
        .unwrap();
        assert_eq!(spec.primary_column, "Name");
        let cols: Vec<&str> = spec.operation_columns.iter().map(String::as_str).collect();
        assert_eq!(cols, ["B", "C", "D"]);
    }

    #[test]
    fn empty_form_fields_are_rejected() {
        assert_eq!(
            FilterSpec::from_input("  ", "B", OperationType::And, Operation::Null),
            Err(InvalidSpec::MissingPrimaryColumn)
        );
        assert_eq!(
            FilterSpec::from_input("A", " , ", OperationType::And, Operation::Null),
            Err(InvalidSpec::MissingOperationColumns)
        );
    }

    #[test]
    fn engine_rejects_hand_built_invalid_spec() {
        let spec = FilterSpec {
            primary_column: "A".into(),
            operation_columns: BTreeSet::new(),
            operation_type: OperationType::And,
            operation: Operation::Null,
        };
        assert_eq!(
            filter(&sample(), &spec).unwrap_err(),
            InvalidSpec::MissingOperationColumns
        );
    }
}
