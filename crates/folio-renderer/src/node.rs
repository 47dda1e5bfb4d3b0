//! Document node tree.
//!
//! Compiled documents arrive as JSON arrays of nodes. Markdown input is
//! parsed into the same shape by [`parse_markdown`](crate::parse_markdown),
//! so the registry only ever dispatches over this one tree.
//!
//! ```json
//! [
//!   { "name": "h2", "children": ["Install"] },
//!   { "name": "Callout", "attrs": { "type": "warning" }, "children": ["Careful"] }
//! ]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A node in the document tree: text or a named element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Borrow the element if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Whether this is a text node containing only whitespace.
    #[must_use]
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text(t) if t.trim().is_empty())
    }

    /// Concatenated text of this node and all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(t),
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

/// A named element with string attributes and ordered children.
///
/// Names are either standard tags (`a`, `code`, `h2`) or component names
/// (`Callout`, `Tabs`). Attribute values are always strings; boolean props
/// are written as the bare key or `"true"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Attribute value by key.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Non-empty attribute value by key, trimmed.
    #[must_use]
    pub fn attr_nonempty(&self, key: &str) -> Option<&str> {
        self.attr(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Boolean prop: present and not `"false"`.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.attr(key)
            .is_some_and(|v| !v.trim().eq_ignore_ascii_case("false"))
    }

    /// Child elements, skipping text nodes.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Language marker of a code element.
    ///
    /// Read from a `language-*` (or `lang-*`) class token, falling back to a
    /// `lang`/`language` attribute. Empty markers count as absent.
    #[must_use]
    pub fn language_marker(&self) -> Option<&str> {
        let from_class = self.attr("class").and_then(|classes| {
            classes.split_whitespace().find_map(|token| {
                token
                    .strip_prefix("language-")
                    .or_else(|| token.strip_prefix("lang-"))
            })
        });
        from_class
            .or_else(|| self.attr("lang"))
            .or_else(|| self.attr("language"))
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
    }
}
