//! Header-click state machine.
//!
//! Each sortable header cell cycles `Unsorted → Ascending → Descending →
//! Ascending → ...`. Sort state lives in the document itself, as the sorted /
//! sorted-reverse classes on the header cell:
//!
//! - a cell that is not yet sorted gets a fresh sort of the body rows, and every
//!   other header cell in the row loses its state classes
//! - a sorted cell flips direction by reversing the current row order, which
//!   keeps ties exactly mirrored
//!
//! Every transition replaces the single document-wide indicator element.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::SortTableConfig;
use crate::dom::{Document, NodeData, NodeId};
use crate::extract::TextExtractor;
use crate::prepare::{HeaderBinding, PreparedTable};
use crate::shaker::SortStrategy;

/// Sort state of a header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortState {
    Unsorted,
    Ascending,
    Descending,
}

/// A click delivered to [`crate::SortTable::click`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    target: NodeId,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Suppress the host's default action for the click (e.g. following a
    /// link inside the header).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ClickOutcome {
    /// Target is not a sortable header cell
    Ignored,
    Sorted {
        table: NodeId,
        column: usize,
        state: SortState,
    },
}

/// Current state of a header cell, read from its classes.
pub fn header_state(doc: &Document, cell: NodeId, config: &SortTableConfig) -> SortState {
    if doc.has_class(cell, &config.class_sorted) {
        SortState::Ascending
    } else if doc.has_class(cell, &config.class_sorted_reverse) {
        SortState::Descending
    } else {
        SortState::Unsorted
    }
}

/// Apply one click on `binding`'s header cell and return the cell's new state.
pub fn activate_header(
    doc: &mut Document,
    prepared: &PreparedTable,
    binding: &HeaderBinding,
    config: &SortTableConfig,
) -> SortState {
    let next = match header_state(doc, binding.cell, config) {
        SortState::Ascending => {
            reverse_rows(doc, binding.body);
            SortState::Descending
        }
        SortState::Descending => {
            reverse_rows(doc, binding.body);
            SortState::Ascending
        }
        SortState::Unsorted => {
            sort_rows(doc, binding, config.strategy);
            SortState::Ascending
        }
    };

    for cell in doc.cells(prepared.head_row) {
        if cell != binding.cell {
            doc.remove_class(cell, &config.class_sorted);
            doc.remove_class(cell, &config.class_sorted_reverse);
        }
    }
    set_indicator(doc, binding.cell, next, config);

    debug!(
        "table {} column {} -> {:?}",
        prepared.table.index(),
        binding.column,
        next
    );
    next
}

/// Fresh ascending sort of the body rows by the binding's column.
pub fn sort_rows(doc: &mut Document, binding: &HeaderBinding, strategy: SortStrategy) {
    let rows = doc.section_rows(binding.body);
    let mut decorated: Vec<(String, NodeId)> = {
        let mut extractor = TextExtractor::new(doc);
        rows.into_iter()
            .map(|row| (extractor.sort_key(doc.cell(row, binding.column)), row))
            .collect()
    };
    trace!("sorting {} rows with {:?}", decorated.len(), strategy);

    strategy.sort(&mut decorated, |a, b| binding.comparator.compare(&a.0, &b.0));

    for (_, row) in decorated {
        doc.append_child(binding.body, row);
    }
}

/// Reverse the physical order of the rows in `body`.
pub fn reverse_rows(doc: &mut Document, body: NodeId) {
    let rows = doc.section_rows(body);
    for row in rows.into_iter().rev() {
        doc.append_child(body, row);
    }
}

/// Mark `cell` with `state` and give it the only indicator in the document.
///
/// An existing indicator element is moved and relabeled instead of being
/// replaced, so repeated clicks do not grow the arena.
fn set_indicator(doc: &mut Document, cell: NodeId, state: SortState, config: &SortTableConfig) {
    let mut spare = None;
    for id in [&config.id_forward_indicator, &config.id_reverse_indicator] {
        while let Some(existing) = doc.get_element_by_id(id) {
            doc.detach(existing);
            spare.get_or_insert(existing);
        }
    }
    doc.remove_class(cell, &config.class_sorted);
    doc.remove_class(cell, &config.class_sorted_reverse);

    let (id, icon, class) = match state {
        SortState::Ascending => (
            &config.id_forward_indicator,
            &config.icon_ascending,
            &config.class_sorted,
        ),
        SortState::Descending => (
            &config.id_reverse_indicator,
            &config.icon_descending,
            &config.class_sorted_reverse,
        ),
        SortState::Unsorted => return,
    };

    let indicator = spare.unwrap_or_else(|| doc.create_element("span"));
    doc.set_attr(indicator, "id", id.clone());
    let glyph = doc
        .children(indicator)
        .first()
        .copied()
        .filter(|&n| matches!(doc.data(n), NodeData::Text(_)));
    for child in doc.children(indicator).to_vec() {
        if Some(child) != glyph {
            doc.detach(child);
        }
    }
    match glyph {
        Some(glyph) => doc.set_text(glyph, icon.clone()),
        None => {
            let glyph = doc.create_text(icon.clone());
            doc.append_child(indicator, glyph);
        }
    }
    doc.append_child(cell, indicator);
    doc.add_class(cell, class);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{Comparator, ComparatorRegistry};
    use crate::fixtures::{body_column, header_cells, table_doc};
    use crate::guess::TypeGuesser;
    use crate::prepare::prepare_table;

    fn prepared(doc: &mut Document, table: NodeId) -> PreparedTable {
        prepare_table(
            doc,
            table,
            &SortTableConfig::default(),
            &ComparatorRegistry::new(),
            &mut TypeGuesser::new(),
        )
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_first_click_sorts_ascending() {
        let (mut doc, table) = table_doc(&["Fruit"], &[&["pear"], &["Apple"], &["fig"]]);
        let prep = prepared(&mut doc, table);
        let config = SortTableConfig::default();

        let state = activate_header(&mut doc, &prep, &prep.headers[0], &config);

        assert_eq!(state, SortState::Ascending);
        assert_eq!(body_column(&doc, table, 0), vec!["Apple", "fig", "pear"]);
        let cell = prep.headers[0].cell;
        assert!(doc.has_class(cell, "sorttable_sorted"));
        let indicator = doc.get_element_by_id("sorttable_sortfwdind").unwrap();
        assert_eq!(doc.parent(indicator), Some(cell));
        assert_eq!(doc.text_content(indicator), "\u{a0}\u{25BE}");
    }

    #[test]
    fn test_second_click_reverses_and_swaps_indicator() {
        let (mut doc, table) = table_doc(&["N"], &[&["b"], &["c"], &["a"]]);
        let prep = prepared(&mut doc, table);
        let config = SortTableConfig::default();
        let binding = &prep.headers[0];

        activate_header(&mut doc, &prep, binding, &config);
        let state = activate_header(&mut doc, &prep, binding, &config);

        assert_eq!(state, SortState::Descending);
        assert_eq!(body_column(&doc, table, 0), vec!["c", "b", "a"]);
        assert!(doc.has_class(binding.cell, "sorttable_sorted_reverse"));
        assert!(!doc.has_class(binding.cell, "sorttable_sorted"));
        assert!(doc.get_element_by_id("sorttable_sortfwdind").is_none());
        assert!(doc.get_element_by_id("sorttable_sortrevind").is_some());

        let state = activate_header(&mut doc, &prep, binding, &config);
        assert_eq!(state, SortState::Ascending);
        assert_eq!(body_column(&doc, table, 0), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_indicator_is_reused_across_clicks() {
        let (mut doc, table) = table_doc(&["A", "B"], &[&["2", "y"], &["1", "x"]]);
        let prep = prepared(&mut doc, table);
        let config = SortTableConfig::default();

        activate_header(&mut doc, &prep, &prep.headers[0], &config);
        let indicator = doc.get_element_by_id("sorttable_sortfwdind").unwrap();
        let allocated = doc.node_count();

        for binding in [&prep.headers[0], &prep.headers[1], &prep.headers[1], &prep.headers[0]] {
            activate_header(&mut doc, &prep, binding, &config);
        }

        assert_eq!(doc.node_count(), allocated);
        // Last click was a fresh sort of column 0.
        assert_eq!(doc.get_element_by_id("sorttable_sortfwdind"), Some(indicator));
        assert_eq!(doc.parent(indicator), Some(prep.headers[0].cell));
        assert_eq!(doc.text_content(indicator), "\u{a0}\u{25BE}");
        assert!(doc.get_element_by_id("sorttable_sortrevind").is_none());
    }

    #[test]
    fn test_descending_mirrors_ascending_with_ties() {
        let (mut doc, table) = table_doc(
            &["Key", "Id"],
            &[&["x", "1"], &["y", "2"], &["x", "3"], &["y", "4"], &["x", "5"]],
        );
        let prep = prepared(&mut doc, table);
        let config = SortTableConfig::default();

        activate_header(&mut doc, &prep, &prep.headers[0], &config);
        let ascending = body_column(&doc, table, 1);
        activate_header(&mut doc, &prep, &prep.headers[0], &config);
        let mut descending = body_column(&doc, table, 1);
        descending.reverse();

        assert_eq!(ascending, vec!["1", "3", "5", "2", "4"]);
        assert_eq!(descending, ascending);
    }

    #[test]
    fn test_switching_columns_resets_other_headers() {
        let (mut doc, table) = table_doc(&["A", "B"], &[&["2", "y"], &["1", "x"]]);
        let prep = prepared(&mut doc, table);
        let config = SortTableConfig::default();
        let cells = header_cells(&doc, table);

        activate_header(&mut doc, &prep, &prep.headers[0], &config);
        activate_header(&mut doc, &prep, &prep.headers[0], &config);
        let state = activate_header(&mut doc, &prep, &prep.headers[1], &config);

        assert_eq!(state, SortState::Ascending);
        assert_eq!(header_state(&doc, cells[0], &config), SortState::Unsorted);
        assert_eq!(header_state(&doc, cells[1], &config), SortState::Ascending);
        assert_eq!(body_column(&doc, table, 1), vec!["x", "y"]);

        // Back on the first column: fresh sort, not a reversal.
        let state = activate_header(&mut doc, &prep, &prep.headers[0], &config);
        assert_eq!(state, SortState::Ascending);
        assert_eq!(body_column(&doc, table, 0), vec!["1", "2"]);
    }

    #[test]
    fn test_numeric_binding_with_nan_last() {
        let (mut doc, table) = table_doc(
            &["Amount"],
            &[&["$1,204.50"], &["-3"], &["7.2kg"], &["abc"]],
        );
        let mut prep = prepared(&mut doc, table);
        prep.headers[0].comparator = Comparator::numeric();
        let config = SortTableConfig::default();

        activate_header(&mut doc, &prep, &prep.headers[0], &config);

        assert_eq!(
            body_column(&doc, table, 0),
            vec!["-3", "7.2kg", "$1,204.50", "abc"]
        );
    }

    #[test]
    fn test_rows_keep_identity_when_sorted() {
        let (mut doc, table) = table_doc(&["N"], &[&["b"], &["a"]]);
        let prep = prepared(&mut doc, table);
        let body = doc.tbodies(table)[0];
        let before = doc.section_rows(body);
        doc.set_attr(before[0], "data-note", "kept");

        sort_rows(&mut doc, &prep.headers[0], SortStrategy::Shaker);

        let after = doc.section_rows(body);
        assert_eq!(after, vec![before[1], before[0]]);
        assert_eq!(doc.attr(after[1], "data-note"), Some("kept"));
    }

    #[test]
    fn test_short_rows_sort_as_empty() {
        let (mut doc, table) = table_doc(&["A", "B"], &[&["1", "z"], &["2"], &["3", "a"]]);
        let prep = prepared(&mut doc, table);

        sort_rows(&mut doc, &prep.headers[1], SortStrategy::Native);

        assert_eq!(body_column(&doc, table, 0), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_reverse_rows() {
        let (mut doc, table) = table_doc(&["N"], &[&["1"], &["2"], &["3"]]);
        let body = doc.tbodies(table)[0];

        reverse_rows(&mut doc, body);

        assert_eq!(body_column(&doc, table, 0), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_click_event_prevent_default() {
        let mut event = ClickEvent::new(Document::new().root());
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
