//! Sticker inventory: the read-only source of assets offered in the palette.
//!
//! The editor reads it once, when the collage step is entered, and never
//! writes back. [`UnlockInventory`] offers only the catalog entries a user
//! has unlocked, driven by a progress object of the form
//! `{ "<name>": true | false }`.

#[cfg(test)]
#[path = "inventory_test.rs"]
mod inventory_test;

use std::collections::HashMap;

use tracing::warn;

use crate::store::AssetRef;

/// Supplies the sticker assets the palette may offer.
pub trait Inventory {
    fn sticker_assets(&self) -> Vec<AssetRef>;
}

/// A fixed list of assets.
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    assets: Vec<AssetRef>,
}

impl StaticInventory {
    #[must_use]
    pub fn new(assets: Vec<AssetRef>) -> Self {
        Self { assets }
    }
}

impl Inventory for StaticInventory {
    fn sticker_assets(&self) -> Vec<AssetRef> {
        self.assets.clone()
    }
}

/// One named entry of the sticker catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub asset: AssetRef,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, asset: impl Into<String>) -> Self {
        Self { name: name.into(), asset: AssetRef::new(asset) }
    }
}

/// Every sticker the editor knows about, in palette order.
#[must_use]
pub fn default_catalog() -> Vec<CatalogEntry> {
    [
        "sunflower",
        "carnation",
        "lisianthus",
        "dendrobium",
        "chrysanthemum",
        "rose",
        "periwinkle",
        "purple-wood-sorrel",
        "moth-orchid",
    ]
    .into_iter()
    .map(|name| CatalogEntry::new(name, format!("/images/{name}.png")))
    .collect()
}

/// Catalog entries filtered by per-user unlock progress.
#[derive(Debug, Clone, Default)]
pub struct UnlockInventory {
    unlocked: Vec<AssetRef>,
}

impl UnlockInventory {
    /// Build from a catalog and the raw progress JSON.
    ///
    /// Missing or unreadable progress yields an empty palette. Entries whose
    /// value is not `true` stay locked and names absent from the catalog are
    /// skipped.
    #[must_use]
    pub fn from_progress_json(catalog: &[CatalogEntry], progress: Option<&str>) -> Self {
        let Some(raw) = progress else {
            return Self::default();
        };
        let flags: HashMap<String, bool> = match serde_json::from_str(raw) {
            Ok(flags) => flags,
            Err(e) => {
                warn!(error = %e, "unreadable unlock progress; palette left empty");
                return Self::default();
            }
        };
        let unlocked = catalog
            .iter()
            .filter(|entry| flags.get(&entry.name).copied().unwrap_or(false))
            .map(|entry| entry.asset.clone())
            .collect();
        Self { unlocked }
    }
}

impl Inventory for UnlockInventory {
    fn sticker_assets(&self) -> Vec<AssetRef> {
        self.unlocked.clone()
    }
}
