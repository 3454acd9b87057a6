//! Table initialization: header normalization, footer pinning and column
//! bindings.
//!
//! [`prepare_table`] validates the table before touching it. A table that
//! cannot be sorted (several header rows, no body, no rows at all) is skipped
//! without modification, and an annotation naming an unknown comparator is
//! reported before any change is made.

use log::{debug, warn};

use crate::compare::{Comparator, ComparatorRegistry};
use crate::config::SortTableConfig;
use crate::dom::{Document, NodeId};
use crate::error::SortTableError;
use crate::guess::TypeGuesser;
use crate::Result;

/// What a sortable header cell knows about its column.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBinding {
    /// The header cell
    pub cell: NodeId,
    /// Column index within the header row
    pub column: usize,
    /// Body whose rows the cell sorts
    pub body: NodeId,
    pub comparator: Comparator,
}

/// A table that passed initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTable {
    pub table: NodeId,
    pub head_row: NodeId,
    pub body: NodeId,
    /// Bindings for sortable header cells, in column order
    pub headers: Vec<HeaderBinding>,
}

impl PreparedTable {
    /// Binding for a header cell, if the cell is sortable.
    pub fn binding(&self, cell: NodeId) -> Option<&HeaderBinding> {
        self.headers.iter().find(|h| h.cell == cell)
    }

    pub fn binding_for_column(&self, column: usize) -> Option<&HeaderBinding> {
        self.headers.iter().find(|h| h.column == column)
    }
}

/// Make `table` sortable.
///
/// Returns `Ok(None)` when the table's structure rules it out. Fails with
/// [`SortTableError::UnknownSortType`] when a header annotation names a
/// comparator missing from `registry`.
pub fn prepare_table(
    doc: &mut Document,
    table: NodeId,
    config: &SortTableConfig,
    registry: &ComparatorRegistry,
    guesser: &mut TypeGuesser,
) -> Result<Option<PreparedTable>> {
    Ok(plan_table(doc, table, config, registry, guesser)?
        .map(|plan| plan.apply(doc, config)))
}

/// Everything [`prepare_table`] decided about a table, before any mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePlan {
    table: NodeId,
    head_row: NodeId,
    /// The head row still has to be wrapped in a new thead
    needs_thead: bool,
    body: NodeId,
    headers: Vec<HeaderBinding>,
}

impl TablePlan {
    pub fn table(&self) -> NodeId {
        self.table
    }

    /// Normalize the table's structure and return its bindings.
    pub fn apply(self, doc: &mut Document, config: &SortTableConfig) -> PreparedTable {
        if self.needs_thead {
            let thead = doc.create_element("thead");
            doc.insert_child(self.table, 0, thead);
            doc.append_child(thead, self.head_row);
        }

        pin_sort_bottom_rows(doc, self.table, config);

        debug!(
            "prepared table {} with {} sortable columns",
            self.table.index(),
            self.headers.len()
        );
        PreparedTable {
            table: self.table,
            head_row: self.head_row,
            body: self.body,
            headers: self.headers,
        }
    }
}

/// Validate `table` and resolve its header bindings without touching the
/// document.
pub fn plan_table(
    doc: &Document,
    table: NodeId,
    config: &SortTableConfig,
    registry: &ComparatorRegistry,
    guesser: &mut TypeGuesser,
) -> Result<Option<TablePlan>> {
    // Header row: the single row of the thead, or the first row to wrap in one.
    let (head_row, needs_thead) = match doc.thead(table) {
        Some(thead) => {
            let rows = doc.section_rows(thead);
            if rows.len() != 1 {
                debug!(
                    "skipping table {}: {} header rows",
                    table.index(),
                    rows.len()
                );
                return Ok(None);
            }
            (rows[0], false)
        }
        None => {
            let tfoot = doc.tfoot(table);
            let first = doc
                .table_rows(table)
                .into_iter()
                .find(|&row| doc.parent(row) != tfoot);
            match first {
                Some(row) => (row, true),
                None => {
                    debug!("skipping table {}: no rows", table.index());
                    return Ok(None);
                }
            }
        }
    };

    let Some(body) = doc.tbodies(table).first().copied() else {
        debug!("skipping table {}: no tbody", table.index());
        return Ok(None);
    };

    let mut headers = Vec::new();
    for (column, cell) in doc.cells(head_row).into_iter().enumerate() {
        if doc.has_class(cell, &config.class_no_sort) {
            continue;
        }
        let comparator = match annotation(doc, cell, config) {
            Some(name) => registry
                .get(&name)
                .cloned()
                .ok_or(SortTableError::UnknownSortType { column, name })?,
            None => guesser.classify_column(doc, table, column),
        };
        headers.push(HeaderBinding {
            cell,
            column,
            body,
            comparator,
        });
    }

    Ok(Some(TablePlan {
        table,
        head_row,
        needs_thead,
        body,
        headers,
    }))
}

/// Comparator name from a `<prefix><name>` class, ignoring state classes.
fn annotation(doc: &Document, cell: NodeId, config: &SortTableConfig) -> Option<String> {
    for class in doc.classes(cell) {
        if config.is_state_class(class) {
            continue;
        }
        let Some(name) = class.strip_prefix(config.annotation_prefix.as_str()) else {
            continue;
        };
        if !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Some(name.to_string());
        }
        warn!("ignoring malformed sort annotation '{class}'");
    }
    None
}

/// Move body rows flagged sort-bottom into the footer, keeping their order.
fn pin_sort_bottom_rows(doc: &mut Document, table: NodeId, config: &SortTableConfig) {
    let thead = doc.thead(table);
    let tfoot = doc.tfoot(table);
    let pinned: Vec<NodeId> = doc
        .table_rows(table)
        .into_iter()
        .filter(|&row| {
            let parent = doc.parent(row);
            parent != thead && parent != tfoot && doc.has_class(row, &config.class_sort_bottom)
        })
        .collect();
    if pinned.is_empty() {
        return;
    }

    let tfoot = match tfoot {
        Some(tfoot) => tfoot,
        None => {
            let tfoot = doc.create_element("tfoot");
            doc.append_child(table, tfoot);
            tfoot
        }
    };
    for row in pinned {
        doc.append_child(tfoot, row);
    }
}
