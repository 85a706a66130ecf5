//! Element store: the placed stickers, their identity, geometry and z-order.
//!
//! Stickers live in a `Vec` so that insertion order doubles as stacking order
//! within the sticker layer: the newest element is last and renders on top.
//! The store is the only owner of [`PlacedElement`] values; the manipulation
//! state machine reaches them through [`ElementStore::update`] by id.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::StickerDefaults;
use crate::consts::MIN_ELEMENT_SIZE;
use crate::geometry::Rect;

/// Unique identifier for a placed sticker.
pub type ElementId = Uuid;

/// Opaque reference to a visual asset (path or URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A sticker instance on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedElement {
    /// Unique identifier for this sticker.
    pub id: ElementId,
    /// Visual asset; never changes after creation.
    pub asset: AssetRef,
    /// Box in canvas-local px. Width and height never drop below
    /// [`MIN_ELEMENT_SIZE`].
    pub position: Rect,
    /// Signed rotation in degrees about the box center. Unbounded: it keeps
    /// accumulating across gestures.
    pub rotation: f64,
}

/// Ordered collection of placed stickers.
pub struct ElementStore {
    elements: Vec<PlacedElement>,
    defaults: StickerDefaults,
    rng: StdRng,
}

impl ElementStore {
    /// Create an empty store whose placement jitter comes from the thread RNG.
    #[must_use]
    pub fn new(defaults: StickerDefaults) -> Self {
        Self { elements: Vec::new(), defaults, rng: StdRng::from_rng(&mut rand::rng()) }
    }

    /// Create an empty store with a fixed jitter seed.
    #[must_use]
    pub fn with_seed(defaults: StickerDefaults, seed: u64) -> Self {
        Self { elements: Vec::new(), defaults, rng: StdRng::seed_from_u64(seed) }
    }

    /// Place a new sticker and return its id.
    ///
    /// The sticker gets the default size and lands near the default anchor,
    /// offset by a random whole number in `[-jitter, jitter)` on each axis so
    /// repeated clicks don't stack perfectly.
    pub fn add(&mut self, asset: AssetRef) -> ElementId {
        let offset_x = self.jitter();
        let offset_y = self.jitter();
        let d = &self.defaults;
        let element = PlacedElement {
            id: Uuid::new_v4(),
            asset,
            position: Rect {
                top: d.anchor_top + offset_y,
                left: d.anchor_left + offset_x,
                width: d.size.max(MIN_ELEMENT_SIZE),
                height: d.size.max(MIN_ELEMENT_SIZE),
            },
            rotation: 0.0,
        };
        let id = element.id;
        debug!(%id, asset = %element.asset, top = element.position.top, left = element.position.left, "sticker placed");
        self.elements.push(element);
        id
    }

    /// Remove a sticker by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<PlacedElement> {
        let idx = self.elements.iter().position(|e| &e.id == id)?;
        debug!(%id, "sticker removed");
        Some(self.elements.remove(idx))
    }

    /// Apply `mutator` to the sticker with this id. Returns false if there is
    /// no such sticker. The minimum size is re-applied afterwards.
    pub fn update<F>(&mut self, id: &ElementId, mutator: F) -> bool
    where
        F: FnOnce(&mut PlacedElement),
    {
        let Some(element) = self.elements.iter_mut().find(|e| &e.id == id) else {
            return false;
        };
        mutator(element);
        element.position.clamp_min_size(MIN_ELEMENT_SIZE);
        true
    }

    /// Return a reference to a sticker by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&PlacedElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    /// All stickers in insertion (= draw) order.
    #[must_use]
    pub fn all(&self) -> &[PlacedElement] {
        &self.elements
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedElement> {
        self.elements.iter()
    }

    /// Remove every sticker.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Number of stickers currently placed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if no sticker is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn jitter(&mut self) -> f64 {
        let range = self.defaults.jitter;
        if range <= 0 {
            return 0.0;
        }
        f64::from(self.rng.random_range(-range..range))
    }
}
