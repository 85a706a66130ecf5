//! Selection: which sticker (if any) is active and shows its handles.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use tracing::debug;

use crate::store::ElementId;

/// The single active sticker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    active: Option<ElementId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Option<ElementId> {
        self.active
    }

    #[must_use]
    pub fn is_active(&self, id: &ElementId) -> bool {
        self.active.as_ref() == Some(id)
    }

    /// Make `id` the active sticker. Returns `true` if the selection changed.
    pub fn select(&mut self, id: ElementId) -> bool {
        if self.active == Some(id) {
            return false;
        }
        debug!(%id, "selected");
        self.active = Some(id);
        true
    }

    /// Clear the selection. Returns `true` if something was selected.
    pub fn clear(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Drop the selection if it pointed at a sticker that was just deleted.
    pub fn on_deleted(&mut self, id: &ElementId) -> bool {
        if self.is_active(id) {
            self.active = None;
            return true;
        }
        false
    }
}
