//! Configuration for table selection, marker classes and indicators.
//!
//! Every name the behavior reads from or writes to the document is configurable.
//! Defaults match the classic sorttable conventions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};
use crate::error::SortTableError;
use crate::shaker::SortStrategy;
use crate::Result;

/// Names and behavior switches used by [`crate::SortTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortTableConfig {
    /// Simple selector (`tag.class...`) picking tables to make sortable
    pub selector: String,
    /// Rows with this class are pinned to the footer
    pub class_sort_bottom: String,
    /// Header cells with this class are not sortable
    pub class_no_sort: String,
    /// Marks the header cell sorted ascending
    pub class_sorted: String,
    /// Marks the header cell sorted descending
    pub class_sorted_reverse: String,
    /// `<prefix><name>` on a header cell selects comparator `<name>`
    pub annotation_prefix: String,
    /// Element id of the ascending indicator
    pub id_forward_indicator: String,
    /// Element id of the descending indicator
    pub id_reverse_indicator: String,
    /// Glyph shown while ascending
    pub icon_ascending: String,
    /// Glyph shown while descending
    pub icon_descending: String,
    /// Routine used for fresh sorts
    pub strategy: SortStrategy,
}

impl Default for SortTableConfig {
    fn default() -> Self {
        Self {
            selector: "table.sortable".to_string(),
            class_sort_bottom: "sortbottom".to_string(),
            class_no_sort: "sorttable_nosort".to_string(),
            class_sorted: "sorttable_sorted".to_string(),
            class_sorted_reverse: "sorttable_sorted_reverse".to_string(),
            annotation_prefix: "sorttable_".to_string(),
            id_forward_indicator: "sorttable_sortfwdind".to_string(),
            id_reverse_indicator: "sorttable_sortrevind".to_string(),
            icon_ascending: "\u{a0}\u{25BE}".to_string(),
            icon_descending: "\u{a0}\u{25B4}".to_string(),
            strategy: SortStrategy::Native,
        }
    }
}

impl SortTableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the table selector
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    /// Builder: set the sort strategy
    pub fn with_strategy(mut self, strategy: SortStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builder: use the shaker sort for fresh sorts
    pub fn stable(self) -> Self {
        self.with_strategy(SortStrategy::Shaker)
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SortTableError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parsed form of [`SortTableConfig::selector`].
    pub fn parsed_selector(&self) -> Result<Selector> {
        Selector::parse(&self.selector)
    }

    /// Classes describing sort state rather than a comparator annotation.
    pub(crate) fn is_state_class(&self, class: &str) -> bool {
        class == self.class_sorted
            || class == self.class_sorted_reverse
            || class == self.class_no_sort
    }
}

/// A compound selector of an optional tag and any number of classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse `tag`, `.class`, or `tag.class1.class2`.
    pub fn parse(selector: &str) -> Result<Self> {
        let invalid = |message: &str| SortTableError::InvalidSelector {
            selector: selector.to_string(),
            message: message.to_string(),
        };

        let selector_trimmed = selector.trim();
        if selector_trimmed.is_empty() {
            return Err(invalid("selector is empty"));
        }

        let mut parts = selector_trimmed.split('.');
        let tag = parts.next().unwrap_or_default();
        let classes: Vec<String> = parts.map(str::to_string).collect();

        let valid_name = |name: &str| {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };
        if !tag.is_empty() && !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("only `tag.class` selectors are supported"));
        }
        if classes.iter().any(|c| !valid_name(c)) {
            return Err(invalid("class names must be non-empty [A-Za-z0-9_-]"));
        }
        if tag.is_empty() && classes.is_empty() {
            return Err(invalid("selector is empty"));
        }

        Ok(Self {
            tag: (!tag.is_empty()).then(|| tag.to_ascii_lowercase()),
            classes,
        })
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        self.tag.as_deref().is_none_or(|t| t == tag)
            && self.classes.iter().all(|c| doc.has_class(node, c))
    }

    /// Attached elements matching this selector, in document order.
    pub fn select_all(&self, doc: &Document) -> Vec<NodeId> {
        doc.find_all(|d, n| self.matches(d, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::markup::ElementSpec;

    #[test]
    fn test_defaults() {
        let config = SortTableConfig::default();
        assert_eq!(config.selector, "table.sortable");
        assert_eq!(config.class_sort_bottom, "sortbottom");
        assert_eq!(config.strategy, SortStrategy::Native);
        assert!(config.is_state_class("sorttable_sorted"));
        assert!(!config.is_state_class("sorttable_numeric"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            SortTableConfig::from_json_str(r#"{"selector": "table.grid", "strategy": "shaker"}"#)
                .unwrap();
        assert_eq!(config.selector, "table.grid");
        assert_eq!(config.strategy, SortStrategy::Shaker);
        assert_eq!(config.class_no_sort, "sorttable_nosort");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sorttable.json");
        std::fs::write(&path, r#"{"class_sort_bottom": "pinned"}"#).unwrap();

        let config = SortTableConfig::load(&path).unwrap();
        assert_eq!(config.class_sort_bottom, "pinned");
    }

    #[test]
    fn test_selector_parse() {
        let sel = Selector::parse("TABLE.sortable.wide").unwrap();
        assert_eq!(sel.tag.as_deref(), Some("table"));
        assert_eq!(sel.classes, vec!["sortable", "wide"]);

        let sel = Selector::parse(".sortable").unwrap();
        assert_eq!(sel.tag, None);

        for bad in ["", "  ", "table.", "table sortable", "div > table", "#id", "."] {
            assert!(
                matches!(
                    Selector::parse(bad),
                    Err(SortTableError::InvalidSelector { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_selector_matches() {
        let doc = Document::from_specs(&[
            ElementSpec::new("table").class("sortable").into(),
            ElementSpec::new("table").class("plain").into(),
            ElementSpec::new("div").class("sortable").into(),
        ])
        .unwrap();
        let roots = doc.children(doc.root()).to_vec();

        let found = Selector::parse("table.sortable").unwrap().select_all(&doc);
        assert_eq!(found, vec![roots[0]]);

        let found = Selector::parse(".sortable").unwrap().select_all(&doc);
        assert_eq!(found, vec![roots[0], roots[2]]);
    }
}
