//! # sorttablelib
//!
//! Click-to-sort behavior for tables held in an owned document tree.
//!
//! ## Overview
//!
//! A [`Document`] is an arena of element and text nodes. [`SortTable`] finds the
//! tables matching its selector, normalizes them (a header section with exactly
//! one row, a body, sort-bottom rows pinned to the footer) and binds a
//! comparator to every header cell. Clicking a header cell then reorders the
//! body rows in place:
//!
//! - the first click sorts ascending with the column's comparator
//! - further clicks flip the direction by reversing the rows
//! - clicking another column starts over with a fresh ascending sort
//!
//! Sort state is kept on the document itself as marker classes and a single
//! indicator element, so a rendered document always shows what was sorted.
//!
//! ## Comparators
//!
//! Columns sort alphabetically unless their header carries an annotation class
//! such as `sorttable_numeric`. Custom comparators are registered by name with
//! [`ComparatorRegistry::register`].
//!
//! ## Example
//!
//! ```rust
//! use sorttablelib::{ElementSpec, Document, SortState, SortTable, SortTableConfig};
//!
//! let row = |a: &str, b: &str| {
//!     ElementSpec::new("tr")
//!         .child(ElementSpec::new("td").text(a))
//!         .child(ElementSpec::new("td").text(b))
//! };
//! let table = ElementSpec::new("table")
//!     .class("sortable")
//!     .child(
//!         ElementSpec::new("tr")
//!             .child(ElementSpec::new("th").text("Name"))
//!             .child(ElementSpec::new("th").class("sorttable_numeric").text("Size")),
//!     )
//!     .child(
//!         ElementSpec::new("tbody")
//!             .child(row("beta", "10"))
//!             .child(row("alpha", "9")),
//!     );
//!
//! let mut doc = Document::from_specs(&[table.into()]).unwrap();
//! let table = doc.children(doc.root())[0];
//!
//! let mut sorter = SortTable::new(SortTableConfig::default()).unwrap();
//! assert_eq!(sorter.init(&mut doc).unwrap(), 1);
//!
//! sorter.click_column(&mut doc, table, 1);
//! assert_eq!(sorter.sort_state(&doc, table), Some((1, SortState::Ascending)));
//!
//! let body = doc.tbodies(table)[0];
//! let first = doc.section_rows(body)[0];
//! assert_eq!(doc.text_content(first), "alpha9");
//! ```

pub mod compare;
pub mod config;
pub mod controller;
pub mod dom;
pub mod engine;
pub mod error;
pub mod extract;
pub mod guess;
pub mod prepare;
pub mod shaker;
pub mod view;

#[cfg(test)]
mod fixtures;

pub use compare::{
    compare_alpha, compare_numeric, ColumnKind, CompareFn, Comparator, ComparatorRegistry,
};
pub use config::{Selector, SortTableConfig};
pub use controller::{ClickEvent, ClickOutcome, SortState};
pub use dom::markup::{ElementSpec, NodeSpec};
pub use dom::{Document, NodeData, NodeId};
pub use engine::SortTable;
pub use error::SortTableError;
pub use extract::{extract_sort_key, TextExtractor};
pub use guess::TypeGuesser;
pub use prepare::{plan_table, prepare_table, HeaderBinding, PreparedTable, TablePlan};
pub use shaker::{shaker_sort, SortStrategy};
pub use view::{HeaderView, TableView};

/// Result type for sorttablelib operations
pub type Result<T> = std::result::Result<T, SortTableError>;
