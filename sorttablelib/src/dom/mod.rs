//! Owned document model.
//!
//! Sorting operates on a small arena-backed tree that models the parts of an
//! HTML document the behavior touches: elements with a tag, classes,
//! attributes and ordered children, plus text nodes.
//!
//! Nodes are addressed by [`NodeId`]. Moving a node (see
//! [`Document::append_child`]) detaches it from its old parent and keeps its
//! identity, so anything keyed by `NodeId` survives reordering. Detached nodes
//! stay in the arena; they are simply unreachable from the root.
//!
//! ## Example
//!
//! ```rust
//! use sorttablelib::Document;
//!
//! let mut doc = Document::new();
//! let row = doc.create_element("tr");
//! let cell = doc.create_element("td");
//! let text = doc.create_text("  hello ");
//! let root = doc.root();
//! doc.append_child(root, row);
//! doc.append_child(row, cell);
//! doc.append_child(cell, text);
//!
//! assert_eq!(doc.text_content(row), "  hello ");
//! assert_eq!(doc.parent(cell), Some(row));
//! ```

pub mod markup;
pub mod table;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use markup::NodeSpec;

/// Tag name of the synthetic root node.
const ROOT_TAG: &str = "#document";

/// Stable identity of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element payload: tag, class list and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name
    pub tag: String,
    /// Class list in declaration order, without duplicates
    pub classes: Vec<String>,
    /// All other attributes, including `id`
    pub attrs: BTreeMap<String, String>,
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of nodes with a single synthetic root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    pub fn new() -> Self {
        let root = Node {
            data: NodeData::Element(Element {
                tag: ROOT_TAG.to_string(),
                ..Default::default()
            }),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The synthetic root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(Element {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node payload.
    pub fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0].data
    }

    /// Element payload, or `None` for text nodes.
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node.0].data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    /// Tag name of an element node.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    /// Whether the node is an element with the given (lowercase) tag.
    pub fn is_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag(node) == Some(tag)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Child element nodes carrying `tag`, in order.
    pub fn child_elements<'a>(
        &'a self,
        node: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(node)
            .iter()
            .copied()
            .filter(move |&child| self.is_tag(child, tag))
    }

    /// Remove `node` from its parent's child list. No-op for detached nodes.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Ignored when `parent` is `child` itself or lies beneath it, which would
    /// cut the subtree off into a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.is_inclusive_descendant(parent, child) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Move `child` to position `index` among `parent`'s children.
    ///
    /// The index is interpreted after `child` has been detached and is clamped
    /// to the child count. Ignored under the same conditions as
    /// [`Document::append_child`].
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if self.is_inclusive_descendant(parent, child) {
            return;
        }
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.is_inclusive_descendant(node, self.root)
    }

    /// Whether `node` is `ancestor` or lies beneath it.
    pub fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Descendants of `node` in pre-order (document order), excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of all text nodes beneath `node` (untrimmed).
    pub fn text_content(&self, node: NodeId) -> String {
        if let NodeData::Text(text) = self.data(node) {
            return text.clone();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|n| match self.data(n) {
                NodeData::Text(text) => Some(text.as_str()),
                NodeData::Element(_) => None,
            })
            .collect()
    }

    /// Whether any element beneath `node` carries `tag`.
    pub fn has_descendant_tag(&self, node: NodeId, tag: &str) -> bool {
        self.descendants(node).into_iter().any(|n| self.is_tag(n, tag))
    }

    /// Replace the content of a text node. Ignored on elements.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        if let NodeData::Text(existing) = &mut self.nodes[node.0].data {
            *existing = text.into();
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|el| el.attrs.get(name))
            .map(String::as_str)
    }

    /// Set an attribute. Ignored on text nodes.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(node) {
            el.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attrs.remove(name);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node)
            .map_or(&[][..], |el| el.classes.as_slice())
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    /// First attached element whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.attr(n, "id") == Some(id))
    }

    /// All attached elements for which `pred` holds, in document order.
    pub fn find_all(&self, mut pred: impl FnMut(&Self, NodeId) -> bool) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| self.element(n).is_some() && pred(self, n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(doc: &mut Document, items: &[&str]) -> (NodeId, Vec<NodeId>) {
        let root = doc.root();
        let ul = doc.create_element("ul");
        doc.append_child(root, ul);
        let lis = items
            .iter()
            .map(|item| {
                let li = doc.create_element("li");
                let text = doc.create_text(*item);
                doc.append_child(li, text);
                doc.append_child(ul, li);
                li
            })
            .collect();
        (ul, lis)
    }

    #[test]
    fn test_append_moves_and_keeps_identity() {
        let mut doc = Document::new();
        let (ul, lis) = list(&mut doc, &["a", "b", "c"]);

        doc.append_child(ul, lis[0]);

        assert_eq!(doc.children(ul), &[lis[1], lis[2], lis[0]]);
        assert_eq!(doc.text_content(lis[0]), "a");
        assert_eq!(doc.parent(lis[0]), Some(ul));
    }

    #[test]
    fn test_insert_child_clamps_index() {
        let mut doc = Document::new();
        let (ul, lis) = list(&mut doc, &["a", "b"]);

        doc.insert_child(ul, 0, lis[1]);
        assert_eq!(doc.children(ul), &[lis[1], lis[0]]);

        doc.insert_child(ul, 99, lis[1]);
        assert_eq!(doc.children(ul), &[lis[0], lis[1]]);
    }

    #[test]
    fn test_moving_node_under_itself_is_ignored() {
        let mut doc = Document::new();
        let (ul, lis) = list(&mut doc, &["a"]);
        let root = doc.root();

        doc.append_child(lis[0], ul);
        doc.append_child(ul, ul);
        doc.insert_child(lis[0], 0, ul);

        assert_eq!(doc.parent(ul), Some(root));
        assert_eq!(doc.children(ul), &[lis[0]]);
        assert_eq!(doc.text_content(root), "a");
        assert_eq!(doc.descendants(root).len(), 3);
    }

    #[test]
    fn test_set_text_only_touches_text_nodes() {
        let mut doc = Document::new();
        let (ul, lis) = list(&mut doc, &["a"]);
        let text = doc.children(lis[0])[0];

        doc.set_text(text, "z");
        doc.set_text(ul, "ignored");

        assert_eq!(doc.text_content(ul), "z");
        assert_eq!(doc.tag(ul), Some("ul"));
    }

    #[test]
    fn test_detach_makes_node_unreachable() {
        let mut doc = Document::new();
        let (ul, lis) = list(&mut doc, &["a"]);
        doc.set_attr(lis[0], "id", "first");

        assert_eq!(doc.get_element_by_id("first"), Some(lis[0]));
        doc.detach(lis[0]);

        assert!(!doc.is_attached(lis[0]));
        assert!(doc.children(ul).is_empty());
        assert_eq!(doc.get_element_by_id("first"), None);
    }

    #[test]
    fn test_classes_are_deduplicated() {
        let mut doc = Document::new();
        let el = doc.create_element("TH");

        doc.add_class(el, "x");
        doc.add_class(el, "x");
        assert_eq!(doc.classes(el), &["x".to_string()]);
        assert_eq!(doc.tag(el), Some("th"));

        doc.remove_class(el, "x");
        assert!(!doc.has_class(el, "x"));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut doc = Document::new();
        let (ul, lis) = list(&mut doc, &["a", "b"]);
        let found = doc.find_all(|d, n| d.is_tag(n, "li"));

        assert_eq!(found, lis);
        assert_eq!(doc.text_content(ul), "ab");
        assert!(doc.has_descendant_tag(ul, "li"));
        assert!(!doc.has_descendant_tag(ul, "input"));
    }
}
