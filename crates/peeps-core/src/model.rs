//! Core data model for composite figures.
//!
//! A figure is a tree of `GraphicNode`s. Authored fragments contain
//! `Symbol` placeholders; resolution replaces each placeholder with an
//! `Expansion` holding the selected fragment's concrete content. Path-like
//! leaves (`<path>`) carry the `fill` / `stroke` pair that style override
//! tables act on, keyed by their `class` attribute.

use crate::id::{CategoryKey, FragmentId, SYMBOL_MARKER};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Tag of path-like leaves that carry fill/stroke.
pub const PATH_TAG: &str = "path";

/// Element attributes, kept ordered for deterministic export.
pub type Attrs = BTreeMap<String, String>;

/// Category → chosen fragment id for one figure.
pub type SelectionMap = HashMap<CategoryKey, FragmentId>;

/// Path class name → fill/stroke replacement.
pub type StyleTable = BTreeMap<String, PathStyle>;

// ─── Paint ───────────────────────────────────────────────────────────────

/// A fill or stroke value: `none` or any authored paint string
/// (`#rrggbb`, named color, `url(#id)`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Paint {
    #[default]
    None,
    Value(String),
}

impl Paint {
    /// Read a paint from an optional attribute value; absent or empty means
    /// `none`.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            None | Some("" | "none") => Paint::None,
            Some(v) => Paint::Value(v.to_string()),
        }
    }

    /// Attribute value of this paint.
    pub fn as_str(&self) -> &str {
        match self {
            Paint::None => "none",
            Paint::Value(v) => v,
        }
    }
}

impl From<String> for Paint {
    fn from(s: String) -> Self {
        if s.is_empty() || s == "none" {
            Paint::None
        } else {
            Paint::Value(s)
        }
    }
}

impl From<&str> for Paint {
    fn from(s: &str) -> Self {
        Paint::from_attr(Some(s))
    }
}

impl From<Paint> for String {
    fn from(p: Paint) -> Self {
        match p {
            Paint::None => "none".to_string(),
            Paint::Value(v) => v,
        }
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The overridable style of one path class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathStyle {
    pub fill: Paint,
    pub stroke: Paint,
}

impl PathStyle {
    pub fn new(fill: impl Into<Paint>, stroke: impl Into<Paint>) -> Self {
        Self {
            fill: fill.into(),
            stroke: stroke.into(),
        }
    }
}

// ─── Selections ──────────────────────────────────────────────────────────

/// One symbol occurrence found in a tree, with the id the active selection
/// map assigns to its category (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub category: CategoryKey,
    pub id: Option<FragmentId>,
}

// ─── Graphic nodes ───────────────────────────────────────────────────────

/// A plain element: tag, attributes, ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Attrs,
    pub children: Vec<GraphicNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attrs::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<GraphicNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Raw `class` attribute, if any.
    pub fn class(&self) -> Option<&str> {
        self.attrs.get("class").map(String::as_str)
    }

    pub fn is_path(&self) -> bool {
        self.tag == PATH_TAG
    }
}

/// An authored placeholder: "substitute the selected fragment of
/// `category` here". Never has children of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    pub category: CategoryKey,
    pub tag: String,
    pub attrs: Attrs,
}

impl SymbolRef {
    /// Placeholder for `category` with the class attribute the catalog
    /// tooling would author for it.
    pub fn new(category: CategoryKey) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert(
            "class".to_string(),
            format!("{} {SYMBOL_MARKER}", category.as_str()),
        );
        Self {
            category,
            tag: "g".to_string(),
            attrs,
        }
    }
}

/// The universal tree element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicNode {
    Element(Element),
    Symbol(SymbolRef),
    /// Resolved content of a symbol reference. Emitters splice `children`
    /// in place; the node itself only records which fragment was used.
    Expansion {
        category: CategoryKey,
        fragment: Option<FragmentId>,
        children: Vec<GraphicNode>,
    },
    Text(String),
}

impl GraphicNode {
    /// An empty `<svg>` root, rendered while the root fragment is unavailable.
    pub fn empty_svg() -> Self {
        GraphicNode::Element(Element::new("svg"))
    }

    /// Child nodes; empty for symbol references and text.
    pub fn children(&self) -> &[GraphicNode] {
        match self {
            GraphicNode::Element(e) => &e.children,
            GraphicNode::Expansion { children, .. } => children,
            GraphicNode::Symbol(_) | GraphicNode::Text(_) => &[],
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            GraphicNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Visit every node in depth-first pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a GraphicNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

impl From<Element> for GraphicNode {
    fn from(e: Element) -> Self {
        GraphicNode::Element(e)
    }
}

impl From<SymbolRef> for GraphicNode {
    fn from(s: SymbolRef) -> Self {
        GraphicNode::Symbol(s)
    }
}

/// Split a class attribute into its tokens.
pub fn class_tokens(class: &str) -> SmallVec<[&str; 4]> {
    class.split_whitespace().collect()
}
