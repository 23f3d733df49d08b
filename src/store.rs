use crate::data::filter::{FilterSpec, InvalidSpec, filter};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Dataset store
// ---------------------------------------------------------------------------

/// Holds the original dataset as loaded and the currently filtered view.
///
/// The original is only ever replaced wholesale by [`DatasetStore::load`];
/// every filter is derived from it, never from the previous view.
#[derive(Debug, Default)]
pub struct DatasetStore {
    original: Dataset,
    filtered: Dataset,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both datasets. The filtered view gets its own row vector.
    pub fn load(&mut self, dataset: Dataset) {
        self.filtered = dataset.clone();
        self.original = dataset;
    }

    pub fn original(&self) -> &Dataset {
        &self.original
    }

    pub fn filtered(&self) -> &Dataset {
        &self.filtered
    }

    pub fn set_filtered(&mut self, dataset: Dataset) {
        self.filtered = dataset;
    }

    /// Re-filter from the original. On error the current view is kept.
    pub fn apply(&mut self, spec: &FilterSpec) -> Result<usize, InvalidSpec> {
        let filtered = filter(&self.original, spec)?;
        let n = filtered.len();
        self.set_filtered(filtered);
        Ok(n)
    }

    /// Drop both datasets.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use super::*;
    use crate::data::filter::{Operation, OperationType};
    use crate::data::model::{CellValue, Row};

    fn dataset() -> Dataset {
        let rows = vec![
            [("A", CellValue::Integer(1)), ("B", CellValue::Null)],
            [("A", CellValue::Null), ("B", CellValue::Integer(2))],
            [("A", CellValue::Null), ("B", CellValue::Null)],
        ]
        .into_iter()
        .map(|cells| cells.into_iter().collect::<Row>())
        .collect();
        Dataset::from_rows(rows)
    }

    fn spec(ty: OperationType, op: Operation) -> FilterSpec {
        FilterSpec::new("A", ["B"], ty, op).unwrap()
    }

    #[test]
    fn load_copies_rows_into_both_views() {
        let mut store = DatasetStore::new();
        store.load(dataset());

        assert_eq!(store.original().len(), 3);
        assert_eq!(store.filtered().len(), 3);
        // Same rows, distinct backing vectors.
        assert!(Arc::ptr_eq(&store.original().rows()[0], &store.filtered().rows()[0]));
        assert_ne!(
            store.original().rows().as_ptr(),
            store.filtered().rows().as_ptr()
        );
    }

    #[test]
    fn each_apply_starts_from_the_original() {
        let mut store = DatasetStore::new();
        store.load(dataset());

        assert_eq!(store.apply(&spec(OperationType::And, Operation::Null)), Ok(1));
        // Chaining on the previous view would leave at most one row.
        assert_eq!(store.apply(&spec(OperationType::Or, Operation::Null)), Ok(2));
        assert_eq!(store.original().len(), 3);
    }

    #[test]
    fn invalid_spec_keeps_previous_view() {
        let mut store = DatasetStore::new();
        store.load(dataset());
        store.apply(&spec(OperationType::Or, Operation::Null)).unwrap();

        let bad = FilterSpec {
            primary_column: String::new(),
            operation_columns: BTreeSet::from(["B".to_string()]),
            operation_type: OperationType::And,
            operation: Operation::Null,
        };
        assert_eq!(store.apply(&bad), Err(InvalidSpec::MissingPrimaryColumn));
        assert_eq!(store.filtered().len(), 2);
    }

    #[test]
    fn empty_store_filters_to_empty() {
        let mut store = DatasetStore::new();
        assert_eq!(store.apply(&spec(OperationType::And, Operation::NotNull)), Ok(0));
        store.load(dataset());
        store.clear();
        assert!(store.original().is_empty());
        assert!(store.filtered().is_empty());
    }
}
