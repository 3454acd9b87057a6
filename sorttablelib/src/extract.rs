//! Sort-key extraction from table cells.
//!
//! Priority, highest first:
//!
//! 1. a non-empty `data-value` attribute, returned verbatim
//! 2. a non-empty `sorttable_customkey` attribute, returned verbatim
//! 3. the trimmed text content, when non-empty and the node holds no `input`
//! 4. the concatenated keys of the node's children, where an `input`
//!    contributes its `value`
//!
//! A [`TextExtractor`] memoizes keys by node identity. Create one per sort pass:
//! cached keys are never invalidated, so an extractor that outlives a content
//! change would return stale keys.

use std::collections::HashMap;

use crate::dom::{Document, NodeData, NodeId};

/// Attribute that overrides the displayed text.
pub const DATA_VALUE_ATTR: &str = "data-value";
/// Legacy attribute that overrides the displayed text.
pub const CUSTOM_KEY_ATTR: &str = "sorttable_customkey";

/// Per-pass sort-key extractor.
#[derive(Debug)]
pub struct TextExtractor<'a> {
    doc: &'a Document,
    cache: HashMap<NodeId, String>,
}

impl<'a> TextExtractor<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            cache: HashMap::new(),
        }
    }

    /// Sort key for `node`; empty for an absent node.
    pub fn sort_key(&mut self, node: Option<NodeId>) -> String {
        let Some(node) = node else {
            return String::new();
        };
        let doc = self.doc;

        for attr in [DATA_VALUE_ATTR, CUSTOM_KEY_ATTR] {
            if let Some(value) = doc.attr(node, attr).filter(|v| !v.is_empty()) {
                return value.to_string();
            }
        }

        if let Some(cached) = self.cache.get(&node) {
            return cached.clone();
        }

        let text = doc.text_content(node);
        let text = text.trim();
        let key = if !text.is_empty() && !doc.has_descendant_tag(node, "input") {
            text.to_string()
        } else {
            match doc.data(node) {
                NodeData::Text(t) => t.trim().to_string(),
                NodeData::Element(el) if el.tag == "input" => {
                    doc.attr(node, "value").unwrap_or_default().trim().to_string()
                }
                NodeData::Element(_) => {
                    let mut joined = String::new();
                    for &child in doc.children(node) {
                        joined.push_str(&self.sort_key(Some(child)));
                    }
                    joined.trim().to_string()
                }
            }
        };

        self.cache.insert(node, key.clone());
        key
    }
}

/// One-shot key extraction without a shared cache.
pub fn extract_sort_key(doc: &Document, node: Option<NodeId>) -> String {
    TextExtractor::new(doc).sort_key(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::markup::ElementSpec;

    fn single(spec: ElementSpec) -> (Document, NodeId) {
        let doc = Document::from_specs(&[spec.into()]).unwrap();
        let node = doc.children(doc.root())[0];
        (doc, node)
    }

    #[test]
    fn test_absent_node_is_empty() {
        let doc = Document::new();
        assert_eq!(extract_sort_key(&doc, None), "");
    }

    #[test]
    fn test_data_value_wins() {
        let (doc, td) = single(
            ElementSpec::new("td")
                .attr("data-value", " 0042 ")
                .attr("sorttable_customkey", "7")
                .text("forty-two"),
        );
        // Verbatim: not trimmed.
        assert_eq!(extract_sort_key(&doc, Some(td)), " 0042 ");
    }

    #[test]
    fn test_custom_key_before_text() {
        let (doc, td) = single(
            ElementSpec::new("td")
                .attr("sorttable_customkey", "20240101")
                .text("Jan 1"),
        );
        assert_eq!(extract_sort_key(&doc, Some(td)), "20240101");
    }

    #[test]
    fn test_empty_override_falls_through() {
        let (doc, td) = single(ElementSpec::new("td").attr("data-value", "").text(" x "));
        assert_eq!(extract_sort_key(&doc, Some(td)), "x");
    }

    #[test]
    fn test_text_is_trimmed() {
        let (doc, td) = single(
            ElementSpec::new("td")
                .text("  Hello ")
                .child(ElementSpec::new("b").text("World  ")),
        );
        assert_eq!(extract_sort_key(&doc, Some(td)), "Hello World");
    }

    #[test]
    fn test_input_value_used() {
        let (doc, td) = single(
            ElementSpec::new("td").child(ElementSpec::new("input").attr("value", " 17 ")),
        );
        assert_eq!(extract_sort_key(&doc, Some(td)), "17");
    }

    #[test]
    fn test_inputs_force_recursive_concat() {
        let (doc, td) = single(
            ElementSpec::new("td")
                .text(" qty: ")
                .child(ElementSpec::new("input").attr("value", "3"))
                .child(ElementSpec::new("span").text(" units ")),
        );
        // Each child key is trimmed before joining.
        assert_eq!(extract_sort_key(&doc, Some(td)), "qty:3units");
    }

    #[test]
    fn test_fresh_extractor_sees_new_content() {
        let (mut doc, td) = single(ElementSpec::new("td").text("old"));
        assert_eq!(extract_sort_key(&doc, Some(td)), "old");

        let text = doc.children(td)[0];
        doc.detach(text);
        let replacement = doc.create_text("new");
        doc.append_child(td, replacement);

        assert_eq!(extract_sort_key(&doc, Some(td)), "new");
    }

    #[test]
    fn test_extractor_caches_within_pass() {
        let (doc, td) = single(ElementSpec::new("td").text("v"));
        let mut extractor = TextExtractor::new(&doc);

        assert_eq!(extractor.sort_key(Some(td)), "v");
        assert_eq!(extractor.cache.get(&td).map(String::as_str), Some("v"));
        assert_eq!(extractor.sort_key(Some(td)), "v");
    }
}
