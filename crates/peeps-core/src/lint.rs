//! Lint diagnostics for a fragment library.
//!
//! Reports structural issues in how loaded fragments reference each other.
//! Only fragments that have been published are inspected.

use crate::id::CategoryKey;
use crate::model::GraphicNode;
use crate::store::AssetStore;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeSet, HashMap};

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Produces visibly missing content.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic for a category.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    pub category: CategoryKey,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "reference-cycle").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the store's loaded fragments.
#[must_use]
pub fn lint_library(store: &AssetStore) -> Vec<LintDiagnostic> {
    let refs = ReferenceGraph::build(store);
    let mut diags = Vec::new();
    lint_reference_cycles(&refs, &mut diags);
    lint_unknown_categories(store, &refs, &mut diags);
    lint_single_choice(store, &mut diags);
    diags
}

// ─── Reference graph ─────────────────────────────────────────────────────

/// Category → categories its fragments reference.
struct ReferenceGraph {
    graph: DiGraph<CategoryKey, ()>,
    index: HashMap<CategoryKey, NodeIndex>,
}

impl ReferenceGraph {
    fn build(store: &AssetStore) -> Self {
        let mut refs = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        };
        for category in store.categories() {
            refs.node(*category);
        }
        for (category, _, fragment) in store.loaded() {
            let from = refs.node(category);
            for target in referenced_categories(&fragment) {
                let to = refs.node(target);
                if refs.graph.find_edge(from, to).is_none() {
                    refs.graph.add_edge(from, to, ());
                }
            }
        }
        refs
    }

    fn node(&mut self, category: CategoryKey) -> NodeIndex {
        *self
            .index
            .entry(category)
            .or_insert_with(|| self.graph.add_node(category))
    }

    fn referenced(&self) -> impl Iterator<Item = CategoryKey> + '_ {
        self.graph
            .node_indices()
            .filter(|idx| {
                self.graph
                    .neighbors_directed(*idx, petgraph::Direction::Incoming)
                    .next()
                    .is_some()
            })
            .map(|idx| self.graph[idx])
    }
}

fn referenced_categories(fragment: &GraphicNode) -> BTreeSet<CategoryKey> {
    let mut out = BTreeSet::new();
    fragment.walk(&mut |node| {
        if let GraphicNode::Symbol(sym) = node {
            out.insert(sym.category);
        }
    });
    out
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Categories that reach themselves through fragment references.
fn lint_reference_cycles(refs: &ReferenceGraph, diags: &mut Vec<LintDiagnostic>) {
    for scc in tarjan_scc(&refs.graph) {
        let cyclic = scc.len() > 1
            || scc
                .first()
                .is_some_and(|idx| refs.graph.find_edge(*idx, *idx).is_some());
        if !cyclic {
            continue;
        }
        let mut members: Vec<CategoryKey> = scc.iter().map(|idx| refs.graph[*idx]).collect();
        members.sort();
        let chain = members
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        for category in &members {
            diags.push(LintDiagnostic {
                category: *category,
                message: format!(
                    "`{category}` is part of a reference cycle ({chain}); the inner reference expands to nothing."
                ),
                severity: LintSeverity::Warning,
                rule: "reference-cycle",
            });
        }
    }
}

/// Referenced categories with no registered fragment.
fn lint_unknown_categories(
    store: &AssetStore,
    refs: &ReferenceGraph,
    diags: &mut Vec<LintDiagnostic>,
) {
    let mut unknown: Vec<CategoryKey> = refs
        .referenced()
        .filter(|c| store.ids(*c).is_empty())
        .collect();
    unknown.sort();
    for category in unknown {
        diags.push(LintDiagnostic {
            category,
            message: format!("`{category}` is referenced but has no fragments in the catalog."),
            severity: LintSeverity::Warning,
            rule: "unknown-category",
        });
    }
}

/// Categories with a single fragment cannot be re-rolled.
fn lint_single_choice(store: &AssetStore, diags: &mut Vec<LintDiagnostic>) {
    for category in store.categories() {
        if store.ids(*category).len() == 1 {
            diags.push(LintDiagnostic {
                category: *category,
                message: format!("`{category}` has a single fragment; randomizing it never changes anything."),
                severity: LintSeverity::Info,
                rule: "single-choice",
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FragmentId;
    use crate::model::{Element, SymbolRef};
    use crate::store::AssetLoader;

    struct NoLoader;

    impl AssetLoader for NoLoader {
        fn load(&self, _: &str) -> Result<String, String> {
            Err("offline".into())
        }
    }

    /// Fragment referencing each space-separated category in `refs`.
    fn holder(refs: &str) -> GraphicNode {
        let mut e = Element::new("svg");
        for r in refs.split_whitespace() {
            e = e.with_child(SymbolRef::new(CategoryKey::intern(r)));
        }
        e.into()
    }

    fn store(fragments: &[(&str, &str, &str)]) -> AssetStore {
        let mut store = AssetStore::new(NoLoader);
        for (c, id, refs) in fragments {
            store.insert_loaded(CategoryKey::intern(c), FragmentId::intern(id), holder(refs));
        }
        store
    }

    fn rules(diags: &[LintDiagnostic]) -> Vec<(&'static str, &'static str)> {
        diags.iter().map(|d| (d.rule, d.category.as_str())).collect()
    }

    #[test]
    fn clean_library_has_no_warnings() {
        let s = store(&[
            ("lint-person", "a", "lint-eye"),
            ("lint-person", "b", "lint-eye"),
            ("lint-eye", "x", ""),
            ("lint-eye", "y", ""),
        ]);
        assert!(lint_library(&s).is_empty());
    }

    #[test]
    fn detects_cycles_and_self_loops() {
        let s = store(&[
            ("cyc-a", "1", "cyc-b"),
            ("cyc-a", "2", ""),
            ("cyc-b", "1", "cyc-a"),
            ("cyc-b", "2", ""),
            ("cyc-self", "1", "cyc-self"),
            ("cyc-self", "2", ""),
        ]);
        let diags = lint_library(&s);
        let found = rules(&diags);
        assert!(found.contains(&("reference-cycle", "cyc-a")));
        assert!(found.contains(&("reference-cycle", "cyc-b")));
        assert!(found.contains(&("reference-cycle", "cyc-self")));
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn reports_unknown_and_single_choice() {
        let s = store(&[("uk-person", "only", "uk-hat")]);
        let diags = lint_library(&s);
        let found = rules(&diags);
        assert!(found.contains(&("unknown-category", "uk-hat")));
        assert!(found.contains(&("single-choice", "uk-person")));
        let info = diags.iter().find(|d| d.rule == "single-choice").unwrap();
        assert_eq!(info.severity, LintSeverity::Info);
    }
}
