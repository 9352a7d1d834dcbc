//! Symbol sheet splitter: one aggregate SVG → per-symbol fragments.
//!
//! Every top-level `<g id="category/item">` of the sheet becomes fragment
//! `item` of `category`:
//! - the group turns into an `<svg>` root classed `category item`, without
//!   its `transform` / `clip-path`;
//! - a direct `<use>` child is a frame: it is dropped, and the `<rect>` it
//!   points to under `<defs>` sets the root's `viewBox`;
//! - on the group's children and grandchildren, the authored `id` is folded
//!   (lowercased) into the class list, and childless non-path nodes gain
//!   the `symbol` marker;
//! - fragments of the root category lose every path, so the groups that
//!   only held artwork are left behind as symbol references.
//!
//! Groups whose id has no `/` are not symbols and are skipped.

use crate::catalog::CatalogEntry;
use crate::error::SheetError;
use crate::id::{CategoryKey, FragmentId, SYMBOL_MARKER};
use crate::model::{Element, GraphicNode, SymbolRef, class_tokens};
use crate::query::{attrs_mark_symbol, category_key_of_class};
use crate::svg::SVG_NAMESPACE;
use std::collections::HashMap;

/// `<rect>` id → (`width`, `height`).
type Frames = HashMap<String, (String, String)>;

/// One fragment cut out of a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetFragment {
    pub category: CategoryKey,
    pub id: FragmentId,
    pub fragment: GraphicNode,
}

impl SheetFragment {
    /// Locator of the fragment file, relative to the library directory.
    pub fn locator(&self) -> String {
        format!("{}/{}.json", self.category, self.id)
    }

    pub fn catalog_entry(&self) -> CatalogEntry {
        CatalogEntry {
            category: self.category,
            id: self.id,
            locator: self.locator(),
        }
    }
}

/// Split a sheet into fragments, in sheet order. Fragments of
/// `root_category` keep only their structure (no paths).
pub fn split_sheet(svg_xml: &str, root_category: &str) -> Result<Vec<SheetFragment>, SheetError> {
    let doc = roxmltree::Document::parse(svg_xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(SheetError::NotSvg(root.tag_name().name().to_string()));
    }
    let frames = frame_sizes(&doc);

    let mut out = Vec::new();
    for group in root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "g")
    {
        let Some((category, item)) = group.attribute("id").and_then(split_group_id) else {
            log::debug!("skipping sheet group {:?}: no `category/item` id", group.attribute("id"));
            continue;
        };
        let mut tree = element_from_xml(group);
        if category == root_category {
            strip_paths(&mut tree);
        }
        let fragment = classify(finish_fragment(tree, &frames).into());
        log::trace!("cut {category}/{item} from sheet");
        out.push(SheetFragment {
            category: CategoryKey::intern(category),
            id: FragmentId::intern(item),
            fragment,
        });
    }
    log::debug!("split {} fragments from sheet", out.len());
    Ok(out)
}

/// `"head/Afro"` → `("head", "Afro")`, splitting at the last `/`.
fn split_group_id(id: &str) -> Option<(&str, &str)> {
    let (category, item) = id.rsplit_once('/')?;
    (!category.is_empty() && !item.is_empty()).then_some((category, item))
}

// ─── XML → tree ──────────────────────────────────────────────────────────

fn element_from_xml(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());
    for attr in node.attributes() {
        let name = match attr.namespace().and_then(|ns| node.lookup_prefix(ns)) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", attr.name()),
            _ => attr.name().to_string(),
        };
        element.attrs.insert(name, attr.value().to_string());
    }
    for child in node.children() {
        if child.is_element() {
            element.children.push(element_from_xml(child).into());
        } else if child.is_text() {
            let text = child.text().unwrap_or_default().trim();
            if !text.is_empty() {
                element.children.push(GraphicNode::Text(text.to_string()));
            }
        }
    }
    element
}

fn frame_sizes(doc: &roxmltree::Document<'_>) -> Frames {
    let Some(defs) = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "defs")
    else {
        return Frames::new();
    };
    defs.children()
        .filter(|n| n.is_element() && n.tag_name().name() == "rect")
        .filter_map(|rect| {
            let size = (
                rect.attribute("width")?.to_string(),
                rect.attribute("height")?.to_string(),
            );
            Some((rect.attribute("id")?.to_string(), size))
        })
        .collect()
}

// ─── Normalization ───────────────────────────────────────────────────────

fn strip_paths(element: &mut Element) {
    element
        .children
        .retain(|c| !matches!(c, GraphicNode::Element(e) if e.is_path()));
    for child in &mut element.children {
        if let GraphicNode::Element(e) = child {
            strip_paths(e);
        }
    }
}

fn finish_fragment(mut group: Element, frames: &Frames) -> Element {
    let children = std::mem::take(&mut group.children);
    let mut kept = Vec::with_capacity(children.len());
    for mut child in children {
        if let GraphicNode::Element(element) = &mut child {
            normalize_classes(element);
            for grandchild in &mut element.children {
                if let GraphicNode::Element(e) = grandchild {
                    normalize_classes(e);
                }
            }
            if element.tag == "use" {
                if let Some((width, height)) = frame_target(element).and_then(|id| frames.get(id)) {
                    group
                        .attrs
                        .insert("viewBox".to_string(), format!("0 0 {width} {height}"));
                    group.attrs.remove("width");
                    group.attrs.remove("height");
                }
                continue;
            }
        }
        kept.push(child);
    }
    group.children = kept;

    group.tag = "svg".to_string();
    group.attrs.remove("transform");
    group.attrs.remove("clip-path");
    if let Some(id) = group.attrs.remove("id") {
        group.attrs.insert("class".to_string(), id.split('/').collect::<Vec<_>>().join(" "));
    }
    group
        .attrs
        .insert("xmlns".to_string(), SVG_NAMESPACE.to_string());
    group
}

fn frame_target(element: &Element) -> Option<&str> {
    element
        .attrs
        .get("xlink:href")
        .or_else(|| element.attrs.get("href"))
        .and_then(|href| href.strip_prefix('#'))
}

fn normalize_classes(element: &mut Element) {
    let mut tokens: Vec<String> = element
        .attrs
        .remove("class")
        .map(|class| class_tokens(&class).into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    if let Some(id) = element.attrs.remove("id") {
        tokens.extend(id.to_lowercase().split_whitespace().map(str::to_string));
    }
    if element.children.is_empty() && !element.is_path() {
        tokens.push(SYMBOL_MARKER.to_string());
    }

    let mut unique: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if !unique.contains(&token) {
            unique.push(token);
        }
    }
    if !unique.is_empty() {
        element.attrs.insert("class".to_string(), unique.join(" "));
    }
}

/// Turn marked elements into symbol references, as the fragment codec does.
fn classify(node: GraphicNode) -> GraphicNode {
    let GraphicNode::Element(Element {
        tag,
        attrs,
        children,
    }) = node
    else {
        return node;
    };
    if attrs_mark_symbol(&attrs) {
        let category = category_key_of_class(attrs.get("class").map(String::as_str).unwrap_or_default());
        if !children.is_empty() {
            log::warn!("sheet symbol <{tag}> for `{category}` has children; dropping them");
        }
        return GraphicNode::Symbol(SymbolRef {
            category,
            tag,
            attrs,
        });
    }
    GraphicNode::Element(Element {
        tag,
        attrs,
        children: children.into_iter().map(classify).collect(),
    })
}
