//! Pure tree queries: symbol classification, category keys, selections and
//! path styles.

use crate::id::{CategoryKey, SYMBOL_MARKER};
use crate::model::{
    Attrs, Element, GraphicNode, Paint, PathStyle, Selection, SelectionMap, StyleTable,
    class_tokens,
};

/// Whether a raw `class` attribute marks a symbol reference.
pub fn is_symbol_class(class: &str) -> bool {
    class_tokens(class).contains(&SYMBOL_MARKER)
}

/// Whether authored attributes mark a symbol reference.
pub fn attrs_mark_symbol(attrs: &Attrs) -> bool {
    attrs.get("class").is_some_and(|c| is_symbol_class(c))
}

/// Whether `node` is an unresolved symbol placeholder.
pub fn is_symbol_reference(node: &GraphicNode) -> bool {
    matches!(node, GraphicNode::Symbol(_))
}

/// Category key of a symbol reference (or of an already-resolved
/// expansion). `None` for any other node.
pub fn category_key(node: &GraphicNode) -> Option<CategoryKey> {
    match node {
        GraphicNode::Symbol(sym) => Some(sym.category),
        GraphicNode::Expansion { category, .. } => Some(*category),
        _ => None,
    }
}

/// Category key from a raw class attribute.
pub fn category_key_of_class(class: &str) -> CategoryKey {
    CategoryKey::from_tokens(class_tokens(class))
}

/// List every symbol occurrence in document order, paired with the id
/// `selections` currently assigns to its category.
///
/// Repeated references to one category are all reported. Expansions count
/// as occurrences of their category, and their resolved content is searched
/// for nested references.
pub fn collect_selections(tree: &GraphicNode, selections: &SelectionMap) -> Vec<Selection> {
    let mut out = Vec::new();
    tree.walk(&mut |node| {
        if let Some(category) = category_key(node) {
            out.push(Selection {
                category,
                id: selections.get(&category).copied(),
            });
        }
    });
    out
}

/// Style of a path-like leaf, keyed by its raw class attribute.
pub(crate) fn path_style(element: &Element) -> Option<(&str, PathStyle)> {
    if !element.is_path() {
        return None;
    }
    let class = element.class().filter(|c| !c.is_empty())?;
    let style = PathStyle {
        fill: Paint::from_attr(element.attrs.get("fill").map(String::as_str)),
        stroke: Paint::from_attr(element.attrs.get("stroke").map(String::as_str)),
    };
    Some((class, style))
}

/// Collect `{fill, stroke}` for every classed path leaf. Later occurrences
/// of a class overwrite earlier ones.
pub fn collect_path_styles(tree: &GraphicNode) -> StyleTable {
    let mut table = StyleTable::new();
    tree.walk(&mut |node| {
        if let GraphicNode::Element(element) = node
            && let Some((class, style)) = path_style(element)
        {
            table.insert(class.to_string(), style);
        }
    });
    table
}
