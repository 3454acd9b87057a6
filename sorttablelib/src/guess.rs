//! Column type inference with a per-table cache.

use std::collections::HashMap;

use log::trace;

use crate::compare::Comparator;
use crate::dom::{Document, NodeId};

/// Infers a comparator for unannotated columns.
///
/// Classification scans the table's rows top to bottom and settles on the
/// first row with a non-blank cell in the column. Every column currently
/// classifies as alphabetic; numeric ordering must be requested with an
/// annotation. Results are memoized by table identity and column index until
/// [`TypeGuesser::forget`] is called for the table.
#[derive(Debug, Default)]
pub struct TypeGuesser {
    cache: HashMap<NodeId, HashMap<usize, Comparator>>,
}

impl TypeGuesser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify_column(&mut self, doc: &Document, table: NodeId, column: usize) -> Comparator {
        let columns = self.cache.entry(table).or_default();
        if let Some(cached) = columns.get(&column) {
            return cached.clone();
        }

        let decided_by = doc.table_rows(table).into_iter().position(|row| {
            doc.cell(row, column)
                .is_some_and(|cell| !doc.text_content(cell).trim().is_empty())
        });
        trace!(
            "column {column} of table {} classified from row {decided_by:?}",
            table.index()
        );

        let comparator = Comparator::alpha();
        columns.insert(column, comparator.clone());
        comparator
    }

    /// Whether a classification is cached for (table, column).
    pub fn is_cached(&self, table: NodeId, column: usize) -> bool {
        self.cache
            .get(&table)
            .is_some_and(|columns| columns.contains_key(&column))
    }

    /// Drop every classification for `table`.
    pub fn forget(&mut self, table: NodeId) {
        self.cache.remove(&table);
    }
}
