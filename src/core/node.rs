//! Render tree nodes
//!
//! Blocks render to plain `Node` values rather than opaque widgets, so a
//! composed page can be inspected, compared in tests, or serialized to HTML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// A node in a rendered output tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// An HTML element
    Element(Element),
    /// Escaped text content
    Text(String),
    /// An ordered group of siblings with no wrapper element
    Fragment(Vec<Node>),
    /// Stand-in for a block type that is not registered
    UnknownBlock(String),
}

/// An HTML element with attributes and children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Append a child node
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append a text child
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Append a child only when `node` is `Some`
    pub fn child_opt(self, node: Option<impl Into<Node>>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl Node {
    /// Shorthand for `Element::new`
    pub fn element(tag: impl Into<String>) -> Element {
        Element::new(tag)
    }

    /// Placeholder shown in place of an unregistered block type
    pub fn unknown_block(block_type: impl Into<String>) -> Self {
        Node::UnknownBlock(block_type.into())
    }

    /// Child nodes of an element or fragment
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(el) => &el.children,
            Node::Fragment(children) => children,
            Node::Text(_) | Node::UnknownBlock(_) => &[],
        }
    }

    pub fn is_unknown_block(&self) -> bool {
        matches!(self, Node::UnknownBlock(_))
    }

    /// Concatenated text of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::UnknownBlock(block_type) => {
                out.push_str("Unknown block: ");
                out.push_str(block_type);
            }
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
            Node::Fragment(children) => children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Serialize the tree to an HTML string
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => escape_text(text, out),
            Node::Fragment(children) => children.iter().for_each(|c| c.write_html(out)),
            Node::UnknownBlock(block_type) => {
                out.push_str("<div data-unknown-block=\"");
                escape_attr(block_type, out);
                out.push_str("\">Unknown block: ");
                escape_text(block_type, out);
                out.push_str("</div>");
            }
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return;
                }
                el.children.iter().for_each(|c| c.write_html(out));
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
