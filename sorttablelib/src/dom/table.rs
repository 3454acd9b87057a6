//! Table structure accessors.
//!
//! These follow the HTML table model: a table has at most one effective
//! `thead` and `tfoot` (the first of each), any number of `tbody` sections, and
//! rows may also sit directly under the table element.

use super::{Document, NodeId};

impl Document {
    /// First `thead` child of `table`.
    pub fn thead(&self, table: NodeId) -> Option<NodeId> {
        self.child_elements(table, "thead").next()
    }

    /// First `tfoot` child of `table`.
    pub fn tfoot(&self, table: NodeId) -> Option<NodeId> {
        self.child_elements(table, "tfoot").next()
    }

    /// All `tbody` children of `table`.
    pub fn tbodies(&self, table: NodeId) -> Vec<NodeId> {
        self.child_elements(table, "tbody").collect()
    }

    /// `tr` children of a table section (or of the table itself).
    pub fn section_rows(&self, section: NodeId) -> Vec<NodeId> {
        self.child_elements(section, "tr").collect()
    }

    /// Every row of `table`: head rows first, then body rows and bare rows in
    /// tree order, then foot rows.
    pub fn table_rows(&self, table: NodeId) -> Vec<NodeId> {
        let thead = self.thead(table);
        let tfoot = self.tfoot(table);

        let mut rows = thead.map(|h| self.section_rows(h)).unwrap_or_default();
        for &child in self.children(table) {
            if self.is_tag(child, "tr") {
                rows.push(child);
            } else if self.is_tag(child, "tbody") {
                rows.extend(self.section_rows(child));
            }
        }
        if let Some(f) = tfoot {
            rows.extend(self.section_rows(f));
        }
        rows
    }

    /// `td`/`th` children of a row.
    pub fn cells(&self, row: NodeId) -> Vec<NodeId> {
        self.children(row)
            .iter()
            .copied()
            .filter(|&c| self.is_tag(c, "td") || self.is_tag(c, "th"))
            .collect()
    }

    /// Cell at `column` in `row`, if the row is that wide.
    pub fn cell(&self, row: NodeId, column: usize) -> Option<NodeId> {
        self.cells(row).get(column).copied()
    }

    /// Nearest inclusive ancestor with the given tag.
    pub fn closest(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.is_tag(n, tag) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }
}
