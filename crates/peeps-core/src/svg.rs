//! Emitter: resolved tree → SVG markup.
//!
//! A mechanical traversal. Expansions are spliced into their parent, so the
//! output has no trace of the symbol structure.

use crate::model::{Attrs, GraphicNode};
use std::fmt::Write;

/// Namespace added to a root `<svg>` that does not declare one.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Emit a tree as SVG markup.
#[must_use]
pub fn emit_svg(node: &GraphicNode) -> String {
    let mut out = String::with_capacity(4096);
    match node {
        GraphicNode::Element(root) if root.tag == "svg" && !root.attrs.contains_key("xmlns") => {
            let mut attrs = root.attrs.clone();
            attrs.insert("xmlns".to_string(), SVG_NAMESPACE.to_string());
            emit_element(&mut out, &root.tag, &attrs, &root.children);
        }
        _ => emit_node(&mut out, node),
    }
    out
}

fn emit_node(out: &mut String, node: &GraphicNode) {
    match node {
        GraphicNode::Element(e) => emit_element(out, &e.tag, &e.attrs, &e.children),
        GraphicNode::Symbol(sym) => emit_element(out, &sym.tag, &sym.attrs, &[]),
        GraphicNode::Expansion { children, .. } => {
            for child in children {
                emit_node(out, child);
            }
        }
        GraphicNode::Text(text) => escape_into(out, text, false),
    }
}

fn emit_element(out: &mut String, tag: &str, attrs: &Attrs, children: &[GraphicNode]) {
    let _ = write!(out, "<{tag}");
    for (name, value) in attrs {
        let _ = write!(out, " {name}=\"");
        escape_into(out, value, true);
        out.push('"');
    }
    if children.iter().all(is_empty_expansion) {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in children {
        emit_node(out, child);
    }
    let _ = write!(out, "</{tag}>");
}

fn is_empty_expansion(node: &GraphicNode) -> bool {
    match node {
        GraphicNode::Expansion { children, .. } => children.iter().all(is_empty_expansion),
        _ => false,
    }
}

fn escape_into(out: &mut String, s: &str, attr: bool) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{CategoryKey, FragmentId};
    use crate::model::{Element, SymbolRef};
    use pretty_assertions::assert_eq;

    #[test]
    fn root_gets_namespace_and_children_nest() {
        let tree: GraphicNode = Element::new("svg")
            .with_attr("viewBox", "0 0 10 10")
            .with_child(Element::new("path").with_attr("d", "M0 0"))
            .into();
        assert_eq!(
            emit_svg(&tree),
            r#"<svg viewBox="0 0 10 10" xmlns="http://www.w3.org/2000/svg"><path d="M0 0"/></svg>"#
        );
    }

    #[test]
    fn expansions_are_spliced() {
        let tree: GraphicNode = Element::new("g")
            .with_child(GraphicNode::Expansion {
                category: CategoryKey::intern("eye"),
                fragment: Some(FragmentId::intern("round")),
                children: vec![Element::new("circle").into(), Element::new("rect").into()],
            })
            .into();
        assert_eq!(emit_svg(&tree), "<g><circle/><rect/></g>");
    }

    #[test]
    fn empty_expansions_self_close_parent() {
        let tree: GraphicNode = Element::new("g")
            .with_child(GraphicNode::Expansion {
                category: CategoryKey::intern("hat"),
                fragment: None,
                children: vec![],
            })
            .into();
        assert_eq!(emit_svg(&tree), "<g/>");
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let tree: GraphicNode = Element::new("text")
            .with_attr("data-note", "a \"b\" & c")
            .with_child(GraphicNode::Text("1 < 2 & \"ok\"".into()))
            .into();
        assert_eq!(
            emit_svg(&tree),
            r#"<text data-note="a &quot;b&quot; &amp; c">1 &lt; 2 &amp; "ok"</text>"#
        );
    }

    #[test]
    fn unresolved_symbols_emit_as_empty_elements() {
        let tree: GraphicNode = SymbolRef::new(CategoryKey::intern("hair")).into();
        assert_eq!(emit_svg(&tree), r#"<g class="hair symbol"/>"#);
    }
}
