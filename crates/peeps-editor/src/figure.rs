//! Figure generator.
//!
//! A `Figure` owns one selection map and one style override table and
//! produces its resolved tree on demand from the shared asset store. All
//! randomization draws from a caller-supplied RNG.

use peeps_core::id::{CategoryKey, FragmentId};
use peeps_core::model::{GraphicNode, Paint, PathStyle, Selection, SelectionMap, StyleTable};
use peeps_core::query::collect_selections;
use peeps_core::resolve::resolve_root;
use peeps_core::store::AssetStore;
use peeps_core::style::extract_styles;
use peeps_core::svg::emit_svg;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::rc::Rc;

/// Category whose fragment is the entry point of every figure.
pub const DEFAULT_ROOT_CATEGORY: &str = "a-person";

/// Root fragment chosen for fresh figures when the catalog has it.
pub const DEFAULT_ROOT_FRAGMENT: &str = "bust";

/// How fresh figures are seeded.
#[derive(Debug, Clone)]
pub struct FigureConfig {
    pub root_category: CategoryKey,
    /// Root fragment for fresh figures; `None` picks `bust` when registered,
    /// else the first registered root fragment.
    pub root_fragment: Option<FragmentId>,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            root_category: CategoryKey::intern(DEFAULT_ROOT_CATEGORY),
            root_fragment: None,
        }
    }
}

impl FigureConfig {
    /// Use `category` as the root of fresh figures.
    pub fn with_root_category(mut self, category: &str) -> Self {
        self.root_category = CategoryKey::intern(category);
        self
    }

    pub fn with_root_fragment(mut self, id: &str) -> Self {
        self.root_fragment = Some(FragmentId::intern(id));
        self
    }

    fn initial_root(&self, store: &AssetStore) -> Option<FragmentId> {
        let ids = store.ids(self.root_category);
        self.root_fragment
            .or_else(|| {
                let preferred = FragmentId::intern(DEFAULT_ROOT_FRAGMENT);
                ids.contains(&preferred).then_some(preferred)
            })
            .or_else(|| ids.first().copied())
    }
}

/// One independently randomizable, stylable illustration.
#[derive(Debug)]
pub struct Figure {
    store: Rc<AssetStore>,
    root: CategoryKey,
    selections: SelectionMap,
    overrides: StyleTable,
}

impl Figure {
    /// A fresh figure: configured root fragment, every other category
    /// randomly selected, no overrides.
    pub fn random<R: Rng + ?Sized>(store: Rc<AssetStore>, config: &FigureConfig, rng: &mut R) -> Self {
        let mut selections = SelectionMap::new();
        match config.initial_root(&store) {
            Some(id) => {
                selections.insert(config.root_category, id);
            }
            None => log::warn!(
                "catalog has no fragment for root category `{}`",
                config.root_category
            ),
        }
        let mut figure = Self {
            store,
            root: config.root_category,
            selections,
            overrides: StyleTable::new(),
        };
        figure.randomize_all(rng);
        figure
    }

    /// A figure from explicit selections and overrides.
    pub fn from_parts(
        store: Rc<AssetStore>,
        root: CategoryKey,
        selections: impl IntoIterator<Item = Selection>,
        overrides: StyleTable,
    ) -> Self {
        let selections = selections
            .into_iter()
            .filter_map(|s| Some((s.category, s.id?)))
            .collect();
        Self {
            store,
            root,
            selections,
            overrides,
        }
    }

    /// Category whose selected fragment is rendered as the root.
    pub fn root_category(&self) -> CategoryKey {
        self.root
    }

    /// Fragment currently selected for `category`.
    pub fn selection(&self, category: CategoryKey) -> Option<FragmentId> {
        self.selections.get(&category).copied()
    }

    /// Every selection, including categories the render never reaches.
    pub fn selections(&self) -> &SelectionMap {
        &self.selections
    }

    /// The figure's style override table.
    pub fn overrides(&self) -> &StyleTable {
        &self.overrides
    }

    /// Select `id` for `category`. The id need not be registered; an
    /// unknown one expands to nothing.
    pub fn set_selection(&mut self, category: CategoryKey, id: FragmentId) {
        self.selections.insert(category, id);
    }

    /// Override fill and stroke for every path with class `class`.
    pub fn set_style(&mut self, class: impl Into<String>, style: PathStyle) {
        self.overrides.insert(class.into(), style);
    }

    // ─── Randomization ───────────────────────────────────────────────────

    /// Pick a different fragment for `category`, uniformly among the ids
    /// other than the current one. Returns whether the selection changed;
    /// a category with no alternative is left as it is.
    pub fn randomize_one<R: Rng + ?Sized>(&mut self, category: CategoryKey, rng: &mut R) -> bool {
        let current = self.selection(category);
        let candidates: Vec<FragmentId> = self
            .store
            .ids(category)
            .iter()
            .copied()
            .filter(|id| Some(*id) != current)
            .collect();
        let Some(&next) = candidates.choose(rng) else {
            log::debug!("`{category}` has no alternative fragment; keeping selection");
            return false;
        };
        log::trace!("`{category}`: {current:?} -> {next}");
        self.selections.insert(category, next);
        true
    }

    /// Re-roll every known category except the root.
    pub fn randomize_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let categories: Vec<CategoryKey> = self
            .store
            .categories()
            .iter()
            .copied()
            .filter(|c| *c != self.root)
            .collect();
        for category in categories {
            self.randomize_one(category, rng);
        }
    }

    /// Give `class` a random fill. A new entry starts from the class's
    /// current style, so its stroke keeps the authored value.
    pub fn randomize_style<R: Rng + ?Sized>(&mut self, class: &str, rng: &mut R) -> PathStyle {
        if !self.overrides.contains_key(class) {
            let seed = self.current_styles().remove(class).unwrap_or_default();
            self.overrides.insert(class.to_string(), seed);
        }
        let fill = random_color(rng);
        let style = self
            .overrides
            .entry(class.to_string())
            .or_default();
        style.fill = fill;
        style.clone()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// The fully resolved tree. An empty `<svg>` while the root fragment is
    /// unknown or still loading.
    pub fn render(&self) -> GraphicNode {
        let Some(id) = self.selection(self.root) else {
            return GraphicNode::empty_svg();
        };
        match self.store.resolve(self.root, id).ready() {
            Some(fragment) => resolve_root(
                &fragment,
                self.root,
                &self.store,
                &self.selections,
                &self.overrides,
            ),
            None => GraphicNode::empty_svg(),
        }
    }

    /// Symbol occurrences in the rendered tree, in document order.
    pub fn current_selections(&self) -> Vec<Selection> {
        collect_selections(&self.render(), &self.selections)
    }

    /// Style of every overridable path class in the rendered tree.
    pub fn current_styles(&self) -> StyleTable {
        extract_styles(&self.render())
    }

    /// The rendered figure as an SVG document.
    pub fn to_svg(&self) -> String {
        emit_svg(&self.render())
    }

    /// Independent copy: the reachable selections plus the root selection,
    /// and a snapshot of the override table.
    pub fn duplicate(&self) -> Figure {
        let root = self.selection(self.root).map(|id| Selection {
            category: self.root,
            id: Some(id),
        });
        Figure::from_parts(
            Rc::clone(&self.store),
            self.root,
            root.into_iter().chain(self.current_selections()),
            self.overrides.clone(),
        )
    }
}

/// Uniform random `#rrggbb` color.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Paint {
    Paint::Value(format!("#{:06x}", rng.random_range(0..=0xFF_FFFFu32)))
}
