//! Lazy fragment store.
//!
//! Fragments are registered from the catalog without being fetched. The
//! first `resolve` of a registered fragment queues exactly one load and
//! reports `Pending`; the host's event loop drives `pump`, which performs
//! queued loads through an [`AssetLoader`], publishes each parsed fragment
//! in one step, then fires the redraw hook so empty branches get resolved
//! again. Everything runs on one thread; interior mutability is `RefCell`.

use crate::error::AssetError;
use crate::id::{CategoryKey, FragmentId};
use crate::model::GraphicNode;
use crate::vdom::parse_fragment;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

// ─── Asset Loader Trait ──────────────────────────────────────────────────

/// Trait for fetching fragment documents by locator.
///
/// Implemented differently by each host:
/// - CLI: reads from the filesystem
/// - tests: reads from a HashMap
pub trait AssetLoader {
    /// Load the raw fragment JSON behind `locator`.
    fn load(&self, locator: &str) -> Result<String, String>;
}

// ─── Availability ────────────────────────────────────────────────────────

/// Result of asking the store for a fragment.
#[derive(Debug, Clone)]
pub enum Availability {
    /// Loaded and published; shared read-only by every figure.
    Ready(Rc<GraphicNode>),
    /// Registered but not loaded yet (or its load failed).
    Pending,
    /// Never registered; will never become available.
    Unavailable,
}

impl Availability {
    /// The fragment, if it is ready.
    pub fn ready(self) -> Option<Rc<GraphicNode>> {
        match self {
            Availability::Ready(fragment) => Some(fragment),
            _ => None,
        }
    }
}

/// Load state of a single registered fragment.
#[derive(Debug, Clone)]
pub enum AssetStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
enum AssetState {
    Idle,
    Loading,
    Ready(Rc<GraphicNode>),
    Failed(String),
}

#[derive(Debug)]
struct AssetEntry {
    locator: String,
    state: AssetState,
}

type AssetKey = (CategoryKey, FragmentId);

// ─── Store ───────────────────────────────────────────────────────────────

/// Registry and cache of every catalog fragment, shared read-only by all
/// figures.
pub struct AssetStore {
    loader: Box<dyn AssetLoader>,
    entries: RefCell<HashMap<AssetKey, AssetEntry>>,
    /// Categories in registration order.
    categories: Vec<CategoryKey>,
    /// Fragment ids per category, in registration order.
    ids: HashMap<CategoryKey, Vec<FragmentId>>,
    queue: RefCell<VecDeque<AssetKey>>,
    redraw: RefCell<Option<Rc<dyn Fn()>>>,
}

impl fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetStore")
            .field("categories", &self.categories)
            .field("entries", &self.entries.borrow().len())
            .field("queued", &self.queue.borrow().len())
            .finish_non_exhaustive()
    }
}

impl AssetStore {
    /// An empty store that fetches through `loader`.
    pub fn new(loader: impl AssetLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            entries: RefCell::new(HashMap::new()),
            categories: Vec::new(),
            ids: HashMap::new(),
            queue: RefCell::new(VecDeque::new()),
            redraw: RefCell::new(None),
        }
    }

    /// Add a lazy entry. Nothing is fetched until the fragment is resolved.
    /// Re-registering a known pair replaces its locator and resets it.
    pub fn register(&mut self, category: CategoryKey, id: FragmentId, locator: impl Into<String>) {
        let entry = AssetEntry {
            locator: locator.into(),
            state: AssetState::Idle,
        };
        if self.entries.get_mut().insert((category, id), entry).is_some() {
            log::warn!("asset {category}/{id} registered twice; keeping the later locator");
            return;
        }
        let ids = self.ids.entry(category).or_insert_with(|| {
            self.categories.push(category);
            Vec::new()
        });
        ids.push(id);
    }

    /// Register a fragment that is already in memory (tests, embedded assets).
    pub fn insert_loaded(&mut self, category: CategoryKey, id: FragmentId, fragment: GraphicNode) {
        self.register(category, id, format!("memory:{category}/{id}"));
        if let Some(entry) = self.entries.get_mut().get_mut(&(category, id)) {
            entry.state = AssetState::Ready(Rc::new(fragment));
        }
    }

    /// Install the callback fired after each fragment becomes available.
    pub fn set_redraw_hook(&self, hook: impl Fn() + 'static) {
        *self.redraw.borrow_mut() = Some(Rc::new(hook));
    }

    /// Look up a fragment, queueing its load on first access.
    pub fn resolve(&self, category: CategoryKey, id: FragmentId) -> Availability {
        let mut entries = self.entries.borrow_mut();
        let Some(entry) = entries.get_mut(&(category, id)) else {
            log::trace!("asset {category}/{id} is not in the catalog");
            return Availability::Unavailable;
        };
        match &entry.state {
            AssetState::Ready(fragment) => Availability::Ready(Rc::clone(fragment)),
            AssetState::Loading | AssetState::Failed(_) => Availability::Pending,
            AssetState::Idle => {
                log::debug!("queueing load of {category}/{id} from {}", entry.locator);
                entry.state = AssetState::Loading;
                self.queue.borrow_mut().push_back((category, id));
                Availability::Pending
            }
        }
    }

    /// Perform every queued load. Returns how many fragments were published.
    ///
    /// The redraw hook runs after each publication with no internal borrow
    /// held, so it may call `resolve` (or even `pump`) again.
    pub fn pump(&self) -> usize {
        let mut published = 0;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(key) = next else { break };
            if self.load_one(key) {
                published += 1;
                let hook = self.redraw.borrow().clone();
                if let Some(hook) = hook {
                    hook();
                }
            }
        }
        published
    }

    fn load_one(&self, (category, id): AssetKey) -> bool {
        let locator = match self.entries.borrow().get(&(category, id)) {
            Some(entry) if matches!(entry.state, AssetState::Loading) => entry.locator.clone(),
            _ => return false,
        };

        let result = self
            .loader
            .load(&locator)
            .map_err(|message| AssetError::Load {
                locator: locator.clone(),
                message,
            })
            .and_then(|json| parse_fragment(&json));

        let mut entries = self.entries.borrow_mut();
        let Some(entry) = entries.get_mut(&(category, id)) else {
            return false;
        };
        match result {
            Ok(fragment) => {
                log::debug!("asset {category}/{id} ready");
                entry.state = AssetState::Ready(Rc::new(fragment));
                true
            }
            Err(err) => {
                log::warn!("asset {category}/{id} unavailable: {err}");
                entry.state = AssetState::Failed(err.to_string());
                false
            }
        }
    }

    /// Queue every registered fragment that has not been requested yet.
    pub fn prefetch_all(&self) {
        for category in &self.categories {
            for id in self.ids(*category) {
                let _ = self.resolve(*category, *id);
            }
        }
    }

    /// True when no load is queued.
    pub fn is_idle(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Known categories in registration order.
    pub fn categories(&self) -> &[CategoryKey] {
        &self.categories
    }

    /// Known fragment ids of `category`, in registration order.
    pub fn ids(&self, category: CategoryKey) -> &[FragmentId] {
        self.ids.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `category`/`id` is registered, loaded or not.
    pub fn contains(&self, category: CategoryKey, id: FragmentId) -> bool {
        self.entries.borrow().contains_key(&(category, id))
    }

    /// Load state of a registered fragment; `None` when it is not in the
    /// catalog. Unlike `resolve`, this never queues a load.
    pub fn status(&self, category: CategoryKey, id: FragmentId) -> Option<AssetStatus> {
        self.entries
            .borrow()
            .get(&(category, id))
            .map(|entry| match &entry.state {
                AssetState::Idle => AssetStatus::Idle,
                AssetState::Loading => AssetStatus::Loading,
                AssetState::Ready(_) => AssetStatus::Ready,
                AssetState::Failed(err) => AssetStatus::Failed(err.clone()),
            })
    }

    /// Every fragment published so far.
    pub fn loaded(&self) -> Vec<(CategoryKey, FragmentId, Rc<GraphicNode>)> {
        let entries = self.entries.borrow();
        let mut out = Vec::new();
        for category in &self.categories {
            for id in self.ids(*category) {
                if let Some(AssetEntry {
                    state: AssetState::Ready(fragment),
                    ..
                }) = entries.get(&(*category, *id))
                {
                    out.push((*category, *id, Rc::clone(fragment)));
                }
            }
        }
        out
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────
