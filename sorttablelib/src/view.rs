//! Presentation-ready snapshot of a table.
//!
//! `TableView` holds display strings only: header labels with their sort state,
//! body rows in their current order, and footer rows. It is what the CLI
//! prints and serializes; no sorting happens here.

use serde::{Deserialize, Serialize};

use crate::config::SortTableConfig;
use crate::controller::{header_state, SortState};
use crate::dom::{Document, NodeData, NodeId};

/// A header cell as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderView {
    /// Cell text without the sort indicator
    pub label: String,
    pub sortable: bool,
    pub state: SortState,
}

/// Display snapshot of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub headers: Vec<HeaderView>,
    /// Body rows in document order
    pub rows: Vec<Vec<String>>,
    /// Footer rows (including pinned sort-bottom rows)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub footer: Vec<Vec<String>>,
}

impl TableView {
    pub fn from_table(doc: &Document, table: NodeId, config: &SortTableConfig) -> Self {
        let skip = [
            config.id_forward_indicator.as_str(),
            config.id_reverse_indicator.as_str(),
        ];
        let thead = doc.thead(table);
        let tfoot = doc.tfoot(table);

        let headers = thead
            .and_then(|h| doc.section_rows(h).first().copied())
            .map(|row| {
                doc.cells(row)
                    .into_iter()
                    .map(|cell| HeaderView {
                        label: display_text(doc, cell, &skip),
                        sortable: !doc.has_class(cell, &config.class_no_sort),
                        state: header_state(doc, cell, config),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let row_text = |row: NodeId| -> Vec<String> {
            doc.cells(row)
                .into_iter()
                .map(|cell| display_text(doc, cell, &skip))
                .collect()
        };

        let mut rows = Vec::new();
        let mut footer = Vec::new();
        for row in doc.table_rows(table) {
            let parent = doc.parent(row);
            if parent.is_some() && parent == thead {
                continue;
            }
            if parent.is_some() && parent == tfoot {
                footer.push(row_text(row));
            } else {
                rows.push(row_text(row));
            }
        }

        TableView {
            id: doc.attr(table, "id").map(str::to_string),
            headers,
            rows,
            footer,
        }
    }

    /// Number of columns in the widest row.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .chain(self.footer.iter())
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Visible text of `node`: text nodes plus input values, trimmed, skipping
/// elements whose id is in `skip_ids`.
fn display_text(doc: &Document, node: NodeId, skip_ids: &[&str]) -> String {
    fn walk(doc: &Document, node: NodeId, skip_ids: &[&str], out: &mut String) {
        match doc.data(node) {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(el) => {
                if doc.attr(node, "id").is_some_and(|id| skip_ids.contains(&id)) {
                    return;
                }
                if el.tag == "input" {
                    out.push_str(doc.attr(node, "value").unwrap_or_default());
                }
                for &child in doc.children(node) {
                    walk(doc, child, skip_ids, out);
                }
            }
        }
    }

    let mut out = String::new();
    walk(doc, node, skip_ids, &mut out);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::markup::ElementSpec;
    use crate::fixtures::{doc_with, row_spec};
    use crate::SortTable;

    fn sample() -> (Document, NodeId) {
        doc_with(
            ElementSpec::new("table")
                .class("sortable")
                .id("prices")
                .child(
                    ElementSpec::new("thead").child(
                        ElementSpec::new("tr")
                            .child(ElementSpec::new("th").text("Item"))
                            .child(ElementSpec::new("th").class("sorttable_numeric").text("Qty"))
                            .child(ElementSpec::new("th").class("sorttable_nosort").text("Note")),
                    ),
                )
                .child(
                    ElementSpec::new("tbody")
                        .child(row_spec(&["pear", "3", ""], "td"))
                        .child(
                            ElementSpec::new("tr")
                                .child(ElementSpec::new("td").text("fig"))
                                .child(
                                    ElementSpec::new("td")
                                        .child(ElementSpec::new("input").attr("value", "12")),
                                )
                                .child(ElementSpec::new("td").text(" ripe ")),
                        )
                        .child(row_spec(&["Total", "15", ""], "td").class("sortbottom")),
                ),
        )
    }

    #[test]
    fn test_view_of_sorted_table() {
        let (mut doc, table) = sample();
        let config = SortTableConfig::default();
        let mut sorter = SortTable::new(config.clone()).unwrap();
        sorter.init(&mut doc).unwrap();
        sorter.click_column(&mut doc, table, 1);
        sorter.click_column(&mut doc, table, 1);

        let view = TableView::from_table(&doc, table, &config);

        assert_eq!(view.id.as_deref(), Some("prices"));
        assert_eq!(view.headers[1].label, "Qty");
        assert_eq!(view.headers[1].state, SortState::Descending);
        assert_eq!(view.headers[0].state, SortState::Unsorted);
        assert!(!view.headers[2].sortable);
        assert_eq!(
            view.rows,
            vec![vec!["fig", "12", "ripe"], vec!["pear", "3", ""]]
        );
        assert_eq!(view.footer, vec![vec!["Total", "15", ""]]);
        assert_eq!(view.width(), 3);
    }

    #[test]
    fn test_view_serializes_states() {
        let (doc, table) = sample();
        let view = TableView::from_table(&doc, table, &SortTableConfig::default());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["headers"][0]["state"], "unsorted");
        assert_eq!(json["rows"].as_array().unwrap().len(), 3);
        assert!(json.get("footer").is_none());
    }
}
