//! Gallery: the collection that owns figures.
//!
//! Holds the adopted figures plus a "next" preview figure. Adopting the
//! preview moves it into the collection and rolls a new one; removing a
//! figure drops it, and nothing else keeps a reference to it.

use crate::figure::{Figure, FigureConfig};
use peeps_core::store::AssetStore;
use rand::Rng;
use std::rc::Rc;

#[derive(Debug)]
pub struct Gallery {
    store: Rc<AssetStore>,
    config: FigureConfig,
    figures: Vec<Figure>,
    next: Figure,
}

impl Gallery {
    /// An empty collection with a freshly rolled preview.
    pub fn new<R: Rng + ?Sized>(store: Rc<AssetStore>, config: FigureConfig, rng: &mut R) -> Self {
        let next = Figure::random(Rc::clone(&store), &config, rng);
        Self {
            store,
            config,
            figures: Vec::new(),
            next,
        }
    }

    /// The preview figure offered for adoption.
    pub fn next(&self) -> &Figure {
        &self.next
    }

    /// Move the preview into the collection and roll a new preview.
    /// Returns the adopted figure's index.
    pub fn adopt_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let fresh = Figure::random(Rc::clone(&self.store), &self.config, rng);
        let adopted = std::mem::replace(&mut self.next, fresh);
        self.figures.push(adopted);
        self.figures.len() - 1
    }

    /// Roll a new preview without adopting the current one.
    pub fn reroll_next<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.next = Figure::random(Rc::clone(&self.store), &self.config, rng);
    }

    /// Append an independent copy of the figure at `index`.
    pub fn duplicate(&mut self, index: usize) -> Option<usize> {
        let copy = self.figures.get(index)?.duplicate();
        self.figures.push(copy);
        Some(self.figures.len() - 1)
    }

    /// Drop the figure at `index`, returning it. Later figures shift down.
    pub fn remove(&mut self, index: usize) -> Option<Figure> {
        (index < self.figures.len()).then(|| self.figures.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Figure> {
        self.figures.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Figure> {
        self.figures.get_mut(index)
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// One SVG document per adopted figure, in collection order.
    pub fn export_svgs(&self) -> Vec<String> {
        self.figures.iter().map(Figure::to_svg).collect()
    }

    /// HTML page showing every exported figure, referencing them as
    /// `<i>.svg` next to it.
    pub fn export_index(&self) -> String {
        let mut html = String::from("<html><body>");
        for i in 0..self.figures.len() {
            html.push_str(&format!("<img src=\"{i}.svg\"></img>"));
        }
        html.push_str("</body></html>");
        html
    }
}
