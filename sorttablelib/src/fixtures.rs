//! Table builders shared by unit tests.

use crate::dom::markup::ElementSpec;
use crate::dom::{Document, NodeId};

pub fn row_spec(cells: &[&str], cell_tag: &str) -> ElementSpec {
    cells.iter().fold(ElementSpec::new("tr"), |row, text| {
        row.child(ElementSpec::new(cell_tag).text(*text))
    })
}

/// `<table class="sortable">` with one header row and a body.
pub fn table_spec(headers: &[&str], rows: &[&[&str]]) -> ElementSpec {
    let body = rows
        .iter()
        .fold(ElementSpec::new("tbody"), |body, row| {
            body.child(row_spec(row, "td"))
        });
    ElementSpec::new("table")
        .class("sortable")
        .child(ElementSpec::new("thead").child(row_spec(headers, "th")))
        .child(body)
}

pub fn doc_with(spec: ElementSpec) -> (Document, NodeId) {
    let doc = Document::from_specs(&[spec.into()]).unwrap();
    let table = doc.children(doc.root())[0];
    (doc, table)
}

pub fn table_doc(headers: &[&str], rows: &[&[&str]]) -> (Document, NodeId) {
    doc_with(table_spec(headers, rows))
}

/// Trimmed text of `column` for each row of the first body, in order.
pub fn body_column(doc: &Document, table: NodeId, column: usize) -> Vec<String> {
    let body = doc.tbodies(table)[0];
    doc.section_rows(body)
        .into_iter()
        .map(|row| {
            doc.cell(row, column)
                .map(|c| doc.text_content(c).trim().to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// Header cells of the single header row.
pub fn header_cells(doc: &Document, table: NodeId) -> Vec<NodeId> {
    let thead = doc.thead(table).unwrap();
    doc.cells(doc.section_rows(thead)[0])
}
