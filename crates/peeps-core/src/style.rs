//! Style override application and extraction.
//!
//! Overrides are keyed by a path leaf's raw `class` attribute and apply to
//! every path with that class, across all fragments of a figure.

use crate::model::{GraphicNode, StyleTable};
use crate::query::collect_path_styles;

/// Rewrite `fill` / `stroke` of every path leaf whose class has an entry in
/// `overrides`. Unmatched leaves keep their authored values. Symbol
/// references are left alone; their content is styled when it is expanded.
pub fn apply_overrides(node: &mut GraphicNode, overrides: &StyleTable) {
    if overrides.is_empty() {
        return;
    }
    apply_recursive(node, overrides);
}

fn apply_recursive(node: &mut GraphicNode, overrides: &StyleTable) {
    match node {
        GraphicNode::Element(element) => {
            if element.is_path()
                && let Some(style) = element.class().and_then(|c| overrides.get(c))
            {
                let style = style.clone();
                element.attrs.insert("fill".into(), style.fill.into());
                element.attrs.insert("stroke".into(), style.stroke.into());
            }
            for child in &mut element.children {
                apply_recursive(child, overrides);
            }
        }
        GraphicNode::Expansion { children, .. } => {
            for child in children {
                apply_recursive(child, overrides);
            }
        }
        GraphicNode::Symbol(_) | GraphicNode::Text(_) => {}
    }
}

/// Current `{fill, stroke}` of every classed path leaf in a resolved tree,
/// including ones no override touched.
#[must_use]
pub fn extract_styles(resolved: &GraphicNode) -> StyleTable {
    collect_path_styles(resolved)
}
