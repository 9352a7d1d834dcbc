//! Symbol resolver: rewrites an authored tree into a concrete one.
//!
//! Each symbol reference becomes an [`GraphicNode::Expansion`] holding a
//! styled deep copy of the selected fragment's children, themselves resolved
//! recursively. Shared fragments in the store are never mutated. Anything
//! that cannot be satisfied (no selection, unknown or pending fragment,
//! reference cycle) expands to nothing.

use crate::id::{CategoryKey, FragmentId};
use crate::model::{Element, GraphicNode, SelectionMap, StyleTable};
use crate::store::AssetStore;
use crate::style::apply_overrides;

/// Resolve `node` against a selection map and override table.
#[must_use]
pub fn resolve(
    node: &GraphicNode,
    store: &AssetStore,
    selections: &SelectionMap,
    overrides: &StyleTable,
) -> GraphicNode {
    Resolver::new(store, selections, overrides).node(node)
}

/// Resolve a figure's root fragment. The root is styled like any expanded
/// fragment, and `root_category` counts as being expanded so that nested
/// references back to it cannot recurse.
#[must_use]
pub fn resolve_root(
    fragment: &GraphicNode,
    root_category: CategoryKey,
    store: &AssetStore,
    selections: &SelectionMap,
    overrides: &StyleTable,
) -> GraphicNode {
    let mut resolver = Resolver::new(store, selections, overrides);
    let mut copy = fragment.clone();
    apply_overrides(&mut copy, overrides);
    resolver.active.push(root_category);
    let resolved = resolver.node(&copy);
    resolver.active.pop();
    resolved
}

struct Resolver<'a> {
    store: &'a AssetStore,
    selections: &'a SelectionMap,
    overrides: &'a StyleTable,
    /// Categories being expanded on the current path.
    active: Vec<CategoryKey>,
}

impl<'a> Resolver<'a> {
    fn new(store: &'a AssetStore, selections: &'a SelectionMap, overrides: &'a StyleTable) -> Self {
        Self {
            store,
            selections,
            overrides,
            active: Vec::new(),
        }
    }

    fn node(&mut self, node: &GraphicNode) -> GraphicNode {
        match node {
            GraphicNode::Symbol(sym) => {
                let (fragment, children) = self.expand(sym.category);
                GraphicNode::Expansion {
                    category: sym.category,
                    fragment,
                    children,
                }
            }
            GraphicNode::Element(element) => GraphicNode::Element(Element {
                tag: element.tag.clone(),
                attrs: element.attrs.clone(),
                children: self.children(&element.children),
            }),
            GraphicNode::Expansion {
                category,
                fragment,
                children,
            } => GraphicNode::Expansion {
                category: *category,
                fragment: *fragment,
                children: self.children(children),
            },
            GraphicNode::Text(text) => GraphicNode::Text(text.clone()),
        }
    }

    fn children(&mut self, children: &[GraphicNode]) -> Vec<GraphicNode> {
        children.iter().map(|child| self.node(child)).collect()
    }

    fn expand(&mut self, category: CategoryKey) -> (Option<FragmentId>, Vec<GraphicNode>) {
        let Some(&id) = self.selections.get(&category) else {
            log::trace!("no selection for `{category}`; expanding to nothing");
            return (None, Vec::new());
        };
        if self.active.contains(&category) {
            log::warn!("reference cycle through `{category}`; expanding {category}/{id} to nothing");
            return (Some(id), Vec::new());
        }
        let Some(fragment) = self.store.resolve(category, id).ready() else {
            log::trace!("{category}/{id} not available yet");
            return (Some(id), Vec::new());
        };

        let mut copy = GraphicNode::clone(&fragment);
        apply_overrides(&mut copy, self.overrides);

        self.active.push(category);
        let children = self.children(copy.children());
        self.active.pop();
        (Some(id), children)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────
