//! Integration tests: figures and the gallery over a lazily loaded catalog
//! (peeps-editor ↔ peeps-core).

use peeps_core::id::{CategoryKey, FragmentId};
use peeps_core::model::*;
use peeps_core::store::{AssetLoader, AssetStore};
use peeps_core::catalog::Catalog;
use peeps_editor::{Figure, FigureConfig, Gallery};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

// ─── Helpers ─────────────────────────────────────────────────────────────

struct FixtureLoader {
    files: HashMap<String, serde_json::Value>,
}

impl AssetLoader for FixtureLoader {
    fn load(&self, locator: &str) -> Result<String, String> {
        self.files
            .get(locator)
            .map(|v| v.to_string())
            .ok_or_else(|| format!("no fixture for {locator}"))
    }
}

fn lazy_store() -> AssetStore {
    let files = serde_json::from_str(include_str!("fixtures/peeps.json")).unwrap();
    let catalog = Catalog::from_json(include_str!("fixtures/directory.json")).unwrap();
    let mut store = AssetStore::new(FixtureLoader { files });
    catalog.populate(&mut store);
    store
}

fn loaded_store() -> Rc<AssetStore> {
    let store = lazy_store();
    store.prefetch_all();
    assert_eq!(store.pump(), 10);
    Rc::new(store)
}

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn cat(s: &str) -> CategoryKey {
    CategoryKey::intern(s)
}

fn has_symbols(tree: &GraphicNode) -> bool {
    let mut found = false;
    tree.walk(&mut |node| found |= matches!(node, GraphicNode::Symbol(_)));
    found
}

// ─── Fresh figures ──────────────────────────────────────────────────────

#[test]
fn fresh_figure_selects_every_category() {
    let figure = Figure::random(loaded_store(), &FigureConfig::default(), &mut rng(1));
    assert_eq!(figure.selection(cat("a-person")), Some(FragmentId::intern("bust")));
    for category in ["head", "eye", "hair", "body"] {
        assert!(figure.selection(cat(category)).is_some(), "{category} unselected");
    }
    assert!(figure.overrides().is_empty());
}

#[test]
fn rendered_figure_has_no_symbols() {
    let store = loaded_store();
    for seed in 0..20 {
        let figure = Figure::random(Rc::clone(&store), &FigureConfig::default(), &mut rng(seed));
        let tree = figure.render();
        assert!(!has_symbols(&tree));
        assert!(figure.to_svg().contains("<path"));
    }
}

#[test]
fn current_selections_report_reachable_categories_only() {
    let mut figure = Figure::random(loaded_store(), &FigureConfig::default(), &mut rng(2));
    figure.set_selection(cat("head"), FragmentId::intern("plain"));
    figure.set_selection(cat("eye"), FragmentId::intern("round"));
    figure.set_selection(cat("hair"), FragmentId::intern("long"));

    let found: Vec<(&str, Option<&str>)> = figure
        .current_selections()
        .iter()
        .map(|s| (s.category.as_str(), s.id.map(|id| id.as_str())))
        .collect();
    // `body` is selected but the bust root never references it.
    assert_eq!(
        found,
        vec![
            ("head", Some("plain")),
            ("eye", Some("round")),
            ("hair", Some("long"))
        ]
    );
}

#[test]
fn selections_rebuild_an_identical_figure() {
    let store = loaded_store();
    let figure = Figure::random(Rc::clone(&store), &FigureConfig::default(), &mut rng(3));
    let root = Selection {
        category: cat("a-person"),
        id: figure.selection(cat("a-person")),
    };
    let rebuilt = Figure::from_parts(
        store,
        cat("a-person"),
        std::iter::once(root).chain(figure.current_selections()),
        figure.overrides().clone(),
    );
    assert_eq!(rebuilt.to_svg(), figure.to_svg());
}

// ─── Randomization ──────────────────────────────────────────────────────

#[test]
fn randomize_all_rerolls_every_non_root_category() {
    let mut figure = Figure::random(loaded_store(), &FigureConfig::default(), &mut rng(4));
    let before: Vec<_> = ["head", "eye", "hair", "body"]
        .iter()
        .map(|c| figure.selection(cat(c)))
        .collect();
    figure.randomize_all(&mut rng(5));
    let after: Vec<_> = ["head", "eye", "hair", "body"]
        .iter()
        .map(|c| figure.selection(cat(c)))
        .collect();
    for (b, a) in before.iter().zip(&after) {
        assert_ne!(b, a);
    }
    assert_eq!(figure.selection(cat("a-person")), Some(FragmentId::intern("bust")));
}

#[test]
fn randomize_style_shows_up_in_render() {
    let mut figure = Figure::random(loaded_store(), &FigureConfig::default(), &mut rng(6));
    let style = figure.randomize_style("hair", &mut rng(7));
    assert_eq!(figure.current_styles()["hair"], style);
    assert!(figure.to_svg().contains(style.fill.as_str()));
}

#[test]
fn shared_class_is_styled_everywhere() {
    let mut figure = Figure::random(loaded_store(), &FigureConfig::default(), &mut rng(8));
    figure.set_style("skin", PathStyle::new("#00ff00", Paint::None));
    for head in ["plain", "tilted"] {
        figure.set_selection(cat("head"), FragmentId::intern(head));
        assert_eq!(figure.current_styles()["skin"].fill.as_str(), "#00ff00");
    }
}

// ─── Duplication ─────────────────────────────────────────────────────────

#[test]
fn duplicate_renders_identically() {
    let mut figure = Figure::random(loaded_store(), &FigureConfig::default(), &mut rng(9));
    figure.randomize_style("skin", &mut rng(10));
    let copy = figure.duplicate();
    assert_eq!(copy.to_svg(), figure.to_svg());
    assert_eq!(copy.current_styles(), figure.current_styles());
}

#[test]
fn duplicate_does_not_alias_its_source() {
    let mut a = Figure::random(loaded_store(), &FigureConfig::default(), &mut rng(11));
    let mut b = a.duplicate();
    let b_svg = b.to_svg();

    a.set_style("skin", PathStyle::new("#010203", Paint::None));
    a.randomize_one(cat("hair"), &mut rng(12));
    assert_eq!(b.to_svg(), b_svg);

    let a_svg = a.to_svg();
    b.set_style("skin", PathStyle::new("#a0b0c0", Paint::None));
    b.randomize_all(&mut rng(13));
    assert_eq!(a.to_svg(), a_svg);
}

// ─── Lazy loading ────────────────────────────────────────────────────────

#[test]
fn figure_fills_in_as_assets_arrive() {
    let store = Rc::new(lazy_store());
    let redraws = Rc::new(Cell::new(0));
    let counter = Rc::clone(&redraws);
    store.set_redraw_hook(move || counter.set(counter.get() + 1));

    let figure = Figure::random(Rc::clone(&store), &FigureConfig::default(), &mut rng(14));
    assert_eq!(figure.render(), GraphicNode::empty_svg());

    // Each pump publishes what the previous render asked for.
    let mut rounds = 0;
    while store.pump() > 0 {
        rounds += 1;
        let _ = figure.render();
    }
    assert_eq!(rounds, 3, "root, then head + hair, then eye");
    assert_eq!(redraws.get(), 4);
    assert!(!has_symbols(&figure.render()));
    assert!(figure.current_styles().contains_key("skin"));
}

// ─── Gallery ─────────────────────────────────────────────────────────────

#[test]
fn gallery_adopt_duplicate_remove() {
    let mut r = rng(15);
    let mut gallery = Gallery::new(loaded_store(), FigureConfig::default(), &mut r);
    assert!(gallery.is_empty());

    let preview = gallery.next().to_svg();
    let first = gallery.adopt_next(&mut r);
    assert_eq!(first, 0);
    assert_eq!(gallery.get(0).unwrap().to_svg(), preview);

    let copy = gallery.duplicate(0).unwrap();
    assert_eq!(copy, 1);
    assert_eq!(gallery.len(), 2);
    assert!(gallery.duplicate(7).is_none());

    gallery
        .get_mut(1)
        .unwrap()
        .set_style("skin", PathStyle::new("#123456", Paint::None));
    assert_ne!(gallery.export_svgs()[0], gallery.export_svgs()[1]);

    let removed = gallery.remove(0).unwrap();
    assert_eq!(removed.to_svg(), preview);
    assert_eq!(gallery.len(), 1);
    assert!(gallery.remove(3).is_none());
    assert_eq!(gallery.export_svgs().len(), 1);
}

#[test]
fn gallery_index_lists_every_figure() {
    let mut r = rng(16);
    let mut gallery = Gallery::new(loaded_store(), FigureConfig::default(), &mut r);
    assert_eq!(gallery.export_index(), "<html><body></body></html>");

    gallery.adopt_next(&mut r);
    gallery.adopt_next(&mut r);
    assert_eq!(
        gallery.export_index(),
        r#"<html><body><img src="0.svg"></img><img src="1.svg"></img></body></html>"#
    );
}
