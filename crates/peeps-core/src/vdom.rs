//! JSON virtual-DOM codec for fragment trees.
//!
//! Fragments are stored as `{ "tag", "attrs"?, "children"? }` objects, with
//! `{ "tag": "#", "children": "text" }` for character data. Symbol
//! references are recognised here, once, so that later passes never parse
//! class strings again.

use crate::error::AssetError;
use crate::model::{Attrs, Element, GraphicNode, SymbolRef};
use crate::query::{attrs_mark_symbol, category_key_of_class};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Tag used for text nodes.
pub const TEXT_TAG: &str = "#";

#[derive(Deserialize)]
struct RawNode {
    tag: String,
    #[serde(default)]
    attrs: BTreeMap<String, Value>,
    #[serde(default)]
    children: Option<RawChildren>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawChildren {
    Nodes(Vec<RawNode>),
    Text(String),
}

/// Parse fragment JSON into a classified tree.
pub fn parse_fragment(json: &str) -> Result<GraphicNode, AssetError> {
    let raw: RawNode = serde_json::from_str(json)?;
    convert(raw)
}

/// Classify an already-decoded JSON value.
pub fn fragment_from_value(value: Value) -> Result<GraphicNode, AssetError> {
    let raw: RawNode = serde_json::from_value(value)?;
    convert(raw)
}

fn convert(raw: RawNode) -> Result<GraphicNode, AssetError> {
    if raw.tag == TEXT_TAG {
        return match raw.children {
            Some(RawChildren::Text(text)) => Ok(GraphicNode::Text(text)),
            None => Ok(GraphicNode::Text(String::new())),
            Some(RawChildren::Nodes(_)) => Err(AssetError::Malformed {
                message: "text node with element children".to_string(),
            }),
        };
    }

    let attrs = convert_attrs(raw.attrs);

    if attrs_mark_symbol(&attrs) {
        let class = attrs.get("class").map(String::as_str).unwrap_or_default();
        let category = category_key_of_class(class);
        if has_children(&raw.children) {
            log::warn!(
                "symbol reference <{}> for `{category}` has authored children; dropping them",
                raw.tag
            );
        }
        return Ok(GraphicNode::Symbol(SymbolRef {
            category,
            tag: raw.tag,
            attrs,
        }));
    }

    let children = match raw.children {
        None => Vec::new(),
        Some(RawChildren::Text(text)) => vec![GraphicNode::Text(text)],
        Some(RawChildren::Nodes(nodes)) => nodes
            .into_iter()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(GraphicNode::Element(Element {
        tag: raw.tag,
        attrs,
        children,
    }))
}

fn has_children(children: &Option<RawChildren>) -> bool {
    match children {
        None => false,
        Some(RawChildren::Nodes(nodes)) => !nodes.is_empty(),
        Some(RawChildren::Text(text)) => !text.is_empty(),
    }
}

/// Attribute values are strings; tolerate class lists and scalars written
/// by other exporters.
fn convert_attrs(raw: BTreeMap<String, Value>) -> Attrs {
    raw.into_iter()
        .filter_map(|(name, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
                Value::Null => return None,
                other => other.to_string(),
            };
            Some((name, value))
        })
        .collect()
}

// ─── Export ──────────────────────────────────────────────────────────────

/// Export a tree in the same vdom shape, splicing expansions into their
/// parent's children. An expansion at the root becomes a `g` group.
#[must_use]
pub fn to_vdom(node: &GraphicNode) -> Value {
    match node {
        GraphicNode::Expansion { children, .. } => {
            let mut out = Map::new();
            out.insert("tag".into(), Value::String("g".into()));
            let kids = children_vdom(children);
            if !kids.is_empty() {
                out.insert("children".into(), Value::Array(kids));
            }
            Value::Object(out)
        }
        GraphicNode::Text(text) => json!({ "tag": TEXT_TAG, "children": text }),
        GraphicNode::Symbol(sym) => element_vdom(&sym.tag, &sym.attrs, Vec::new()),
        GraphicNode::Element(e) => element_vdom(&e.tag, &e.attrs, children_vdom(&e.children)),
    }
}

fn children_vdom(children: &[GraphicNode]) -> Vec<Value> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        match child {
            GraphicNode::Expansion { children, .. } => out.extend(children_vdom(children)),
            other => out.push(to_vdom(other)),
        }
    }
    out
}

fn element_vdom(tag: &str, attrs: &Attrs, children: Vec<Value>) -> Value {
    let mut out = Map::new();
    out.insert("tag".into(), Value::String(tag.to_string()));
    if !attrs.is_empty() {
        let attrs: Map<String, Value> = attrs
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        out.insert("attrs".into(), Value::Object(attrs));
    }
    if !children.is_empty() {
        out.insert("children".into(), Value::Array(children));
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{CategoryKey, FragmentId};
    use pretty_assertions::assert_eq;

    const HEAD: &str = r##"{
      "tag": "svg",
      "attrs": { "class": "head round", "viewBox": "0 0 10 10" },
      "children": [
        { "tag": "g", "attrs": { "class": "eye symbol" } },
        { "tag": "path", "attrs": { "class": "skin", "fill": "#ffe0bd", "d": "M0 0" } },
        { "tag": "text", "children": [ { "tag": "#", "children": "hi" } ] }
      ]
    }"##;

    #[test]
    fn parse_classifies_symbols_once() {
        let tree = parse_fragment(HEAD).unwrap();
        let root = tree.as_element().unwrap();
        assert_eq!(root.tag, "svg");
        assert_eq!(root.children.len(), 3);
        match &root.children[0] {
            GraphicNode::Symbol(sym) => assert_eq!(sym.category, CategoryKey::intern("eye")),
            other => panic!("expected symbol, got {other:?}"),
        }
        let text = root.children[2].as_element().unwrap();
        assert_eq!(text.children, vec![GraphicNode::Text("hi".into())]);
    }

    #[test]
    fn symbol_children_are_dropped() {
        let json = r#"{ "tag": "g", "attrs": { "class": "symbol hair" },
                        "children": [ { "tag": "path" } ] }"#;
        match parse_fragment(json).unwrap() {
            GraphicNode::Symbol(sym) => assert_eq!(sym.category.as_str(), "hair"),
            other => panic!("expected symbol, got {other:?}"),
        }
    }

    #[test]
    fn attrs_accept_lists_and_numbers() {
        let json = r#"{ "tag": "path", "attrs": { "class": ["a", "b"], "opacity": 0.5, "x": null } }"#;
        let tree = parse_fragment(json).unwrap();
        let e = tree.as_element().unwrap();
        assert_eq!(e.attrs["class"], "a b");
        assert_eq!(e.attrs["opacity"], "0.5");
        assert!(!e.attrs.contains_key("x"));
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(matches!(parse_fragment("{"), Err(AssetError::Json(_))));
        assert!(matches!(
            parse_fragment(r##"{ "tag": "#", "children": [ { "tag": "g" } ] }"##),
            Err(AssetError::Malformed { .. })
        ));
    }

    #[test]
    fn export_splices_expansions() {
        let tree: GraphicNode = Element::new("svg")
            .with_child(GraphicNode::Expansion {
                category: CategoryKey::intern("eye"),
                fragment: Some(FragmentId::intern("round")),
                children: vec![Element::new("circle").into(), Element::new("path").into()],
            })
            .into();
        assert_eq!(
            to_vdom(&tree),
            json!({ "tag": "svg", "children": [ { "tag": "circle" }, { "tag": "path" } ] })
        );
    }

    #[test]
    fn export_then_parse_preserves_authored_tree() {
        let tree = parse_fragment(HEAD).unwrap();
        let again = fragment_from_value(to_vdom(&tree)).unwrap();
        assert_eq!(again, tree);
    }
}
