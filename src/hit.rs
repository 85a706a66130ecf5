//! Hit-testing: which sticker, handle, or control lies under a canvas point.
//!
//! Stickers can be rotated, so the point is first turned back into the
//! sticker's own unrotated frame (origin at its top-left corner) and every
//! test below happens there. Handles only exist on the active sticker and are
//! checked before any body, so a handle that overhangs a neighbour still wins.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::Serialize;

use crate::consts::{
    CORNER_HANDLE_SIZE, DELETE_CONTROL_OUTSET, DELETE_CONTROL_SIZE, ROTATE_HANDLE_OUTSET, ROTATE_HANDLE_SIZE,
};
use crate::geometry::{Point, Rect, center, rotate_about};
use crate::input::Corner;
use crate::store::{ElementId, ElementStore, PlacedElement};

/// Which part of a sticker was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(Corner),
    RotateHandle,
    DeleteControl,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element: ElementId,
    pub part: HitPart,
}

/// Handle geometry for a sticker, in its local unrotated frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleLayout {
    /// Corner squares in [`Corner::ALL`] order.
    pub corners: [(Corner, Rect); 4],
    /// Bounding box of the circular rotate handle.
    pub rotate: Rect,
    pub delete: Rect,
}

impl HandleLayout {
    /// Lay out handles for a `width` x `height` box.
    #[must_use]
    pub fn for_size(width: f64, height: f64) -> Self {
        let half = CORNER_HANDLE_SIZE / 2.0;
        let corner = |c: Corner| {
            let x = if c.has_right() { width } else { 0.0 };
            let y = if c.has_bottom() { height } else { 0.0 };
            (c, Rect::new(y - half, x - half, CORNER_HANDLE_SIZE, CORNER_HANDLE_SIZE))
        };
        Self {
            corners: Corner::ALL.map(corner),
            rotate: Rect::new(
                -ROTATE_HANDLE_OUTSET,
                width + ROTATE_HANDLE_OUTSET - ROTATE_HANDLE_SIZE,
                ROTATE_HANDLE_SIZE,
                ROTATE_HANDLE_SIZE,
            ),
            delete: Rect::new(
                -DELETE_CONTROL_OUTSET - DELETE_CONTROL_SIZE / 2.0,
                width / 2.0 - DELETE_CONTROL_SIZE / 2.0,
                DELETE_CONTROL_SIZE,
                DELETE_CONTROL_SIZE,
            ),
        }
    }

    /// Which handle (if any) contains the local point.
    #[must_use]
    pub fn part_at(&self, local: Point) -> Option<HitPart> {
        if self.delete.contains(local) {
            return Some(HitPart::DeleteControl);
        }
        let r = &self.rotate;
        let radius = r.width / 2.0;
        let dx = local.x - (r.left + radius);
        let dy = local.y - (r.top + radius);
        if dx * dx + dy * dy <= radius * radius {
            return Some(HitPart::RotateHandle);
        }
        self.corners
            .iter()
            .find(|(_, rect)| rect.contains(local))
            .map(|(corner, _)| HitPart::ResizeHandle(*corner))
    }
}

/// Map a canvas point into `element`'s local unrotated frame.
#[must_use]
pub fn to_local(element: &PlacedElement, point: Point) -> Point {
    let pos = &element.position;
    let unrotated = rotate_about(point, center(pos), -element.rotation);
    unrotated.relative_to(Point::new(pos.left, pos.top))
}

/// Test which sticker (if any) is under `point`.
///
/// Handles of `active` are tried first, then bodies from the topmost sticker
/// down.
#[must_use]
pub fn hit_test(point: Point, store: &ElementStore, active: Option<ElementId>) -> Option<Hit> {
    if let Some(el) = active.and_then(|id| store.get(&id)) {
        let layout = HandleLayout::for_size(el.position.width, el.position.height);
        if let Some(part) = layout.part_at(to_local(el, point)) {
            return Some(Hit { element: el.id, part });
        }
    }
    store.all().iter().rev().find_map(|el| {
        let local = to_local(el, point);
        let body = Rect::new(0.0, 0.0, el.position.width, el.position.height);
        body.contains(local).then_some(Hit { element: el.id, part: HitPart::Body })
    })
}
