//! Loading documents from JSON node trees and writing them back out.
//!
//! A node tree is either a text string or an element object:
//!
//! ```json
//! {"tag": "td", "class": "price", "attrs": {"data-value": "12"}, "children": ["$12"]}
//! ```
//!
//! A top-level array is read as the list of root children.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Document, NodeData, NodeId};
use crate::error::SortTableError;
use crate::Result;

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "col"];

/// Serializable description of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Text(String),
    Element(ElementSpec),
}

/// Serializable description of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Space-separated class list
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn text(text: impl Into<String>) -> Self {
        NodeSpec::Text(text.into())
    }
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: set the class list
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Builder: set the id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: add an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child
    pub fn child(mut self, child: impl Into<NodeSpec>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder: append a text child
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(NodeSpec::text(text))
    }
}

impl From<ElementSpec> for NodeSpec {
    fn from(spec: ElementSpec) -> Self {
        NodeSpec::Element(spec)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Roots {
    Many(Vec<NodeSpec>),
    One(NodeSpec),
}

impl Document {
    /// Build a document whose root children are `specs`.
    pub fn from_specs(specs: &[NodeSpec]) -> Result<Self> {
        let mut doc = Document::new();
        let root = doc.root();
        for spec in specs {
            let node = doc.build(spec)?;
            doc.append_child(root, node);
        }
        Ok(doc)
    }

    /// Parse a JSON node tree (single node or array of nodes).
    pub fn from_json_str(json: &str) -> Result<Self> {
        match serde_json::from_str::<Roots>(json)? {
            Roots::Many(specs) => Self::from_specs(&specs),
            Roots::One(spec) => Self::from_specs(std::slice::from_ref(&spec)),
        }
    }

    /// Read and parse a JSON node tree from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SortTableError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Create a detached subtree from a spec.
    pub fn build(&mut self, spec: &NodeSpec) -> Result<NodeId> {
        let el = match spec {
            NodeSpec::Text(text) => return Ok(self.create_text(text.clone())),
            NodeSpec::Element(el) => el,
        };

        if el.tag.is_empty() || !el.tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SortTableError::InvalidDocument(format!(
                "invalid tag name '{}'",
                el.tag
            )));
        }

        let node = self.create_element(&el.tag);
        for class in el.class.split_whitespace() {
            self.add_class(node, class);
        }
        for (name, value) in &el.attrs {
            if name == "class" {
                for class in value.split_whitespace() {
                    self.add_class(node, class);
                }
            } else {
                self.set_attr(node, name, value.clone());
            }
        }
        if let Some(id) = &el.id {
            self.set_attr(node, "id", id.clone());
        }
        for child in &el.children {
            let child = self.build(child)?;
            self.append_child(node, child);
        }
        Ok(node)
    }

    /// Describe the subtree at `node` as a spec.
    pub fn to_spec(&self, node: NodeId) -> NodeSpec {
        match self.data(node) {
            NodeData::Text(text) => NodeSpec::Text(text.clone()),
            NodeData::Element(el) => {
                let mut attrs = el.attrs.clone();
                let id = attrs.remove("id");
                NodeSpec::Element(ElementSpec {
                    tag: el.tag.clone(),
                    id,
                    class: el.classes.join(" "),
                    attrs,
                    children: self.children(node).iter().map(|&c| self.to_spec(c)).collect(),
                })
            }
        }
    }

    /// Serialize the subtree at `node` as HTML. The root serializes as its
    /// children only.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        if node == self.root() {
            for &child in self.children(node) {
                self.write_html(child, &mut out);
            }
        } else {
            self.write_html(node, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let el = match self.data(node) {
            NodeData::Text(text) => {
                out.push_str(&escape_text(text));
                return;
            }
            NodeData::Element(el) => el,
        };

        out.push('<');
        out.push_str(&el.tag);
        if !el.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_attr(&el.classes.join(" "))));
        }
        for (name, value) in &el.attrs {
            out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
        }
        out.push('>');

        if VOID_TAGS.contains(&el.tag.as_str()) {
            return;
        }
        for &child in self.children(node) {
            self.write_html(child, out);
        }
        out.push_str(&format!("</{}>", el.tag));
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
