//! Manipulation state machine: the one in-flight sticker gesture, and the
//! listener slot that gestures hold while they run.
//!
//! `ManipulationState` is a single tagged union, so "dragging and resizing at
//! the same time" cannot be represented. Every start transition is only taken
//! from [`ManipulationState::None`]; a start request while another gesture is
//! running is ignored and reported back as `false`.
//!
//! Drag and resize re-base `last_pointer` on every sample, so each move applies
//! only the delta since the previous sample. Rotation instead keeps the pivot
//! and the initial angle fixed for the whole gesture and recomputes the angle
//! against them on every move.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::MIN_ELEMENT_SIZE;
use crate::geometry::{Point, angle_between, center, wrap_delta};
use crate::store::{ElementId, ElementStore, PlacedElement};

/// Corner handle of a sticker's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Every corner, in handle render order.
    pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomLeft, Corner::BottomRight];

    #[must_use]
    pub fn has_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    #[must_use]
    pub fn has_right(self) -> bool {
        matches!(self, Self::TopRight | Self::BottomRight)
    }

    #[must_use]
    pub fn has_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }

    #[must_use]
    pub fn has_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::BottomRight)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a corner name is not one of the four handle names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown corner '{0}'")]
pub struct CornerParseError(String);

impl FromStr for Corner {
    type Err = CornerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(CornerParseError(other.to_string())),
        }
    }
}

/// The sticker gesture currently in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ManipulationState {
    /// No gesture; waiting for the next press.
    #[default]
    None,
    /// Moving a sticker.
    Dragging {
        target: ElementId,
        /// Pointer sample from the previous event; deltas are taken from here.
        last_pointer: Point,
    },
    /// Resizing a sticker from one corner.
    Resizing {
        target: ElementId,
        corner: Corner,
        /// Pointer sample from the previous event; deltas are taken from here.
        last_pointer: Point,
    },
    /// Rotating a sticker about its center.
    Rotating {
        target: ElementId,
        /// Pivot, fixed at gesture start.
        center: Point,
        /// Angle from pivot to the initiating pointer, in radians.
        initial_angle: f64,
        /// Sticker rotation in degrees when the gesture started.
        start_rotation: f64,
    },
}

impl ManipulationState {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Target of the in-flight gesture, if any.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::None => None,
            Self::Dragging { target, .. } | Self::Resizing { target, .. } | Self::Rotating { target, .. } => {
                Some(*target)
            }
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Dragging { .. } => "drag",
            Self::Resizing { .. } => "resize",
            Self::Rotating { .. } => "rotate",
        }
    }
}

/// Drives [`ManipulationState`] from pointer samples.
#[derive(Debug, Default)]
pub struct Manipulator {
    state: ManipulationState,
}

impl Manipulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &ManipulationState {
        &self.state
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state.is_none()
    }

    /// Begin dragging `target`. Ignored unless idle.
    pub fn begin_drag(&mut self, target: ElementId, pointer: Point) -> bool {
        if !self.is_idle() {
            debug!(id = %target, active = self.state.kind(), "drag start ignored");
            return false;
        }
        debug!(id = %target, x = pointer.x, y = pointer.y, "drag start");
        self.state = ManipulationState::Dragging { target, last_pointer: pointer };
        true
    }

    /// Begin resizing `target` from `corner`. Ignored unless idle.
    pub fn begin_resize(&mut self, target: ElementId, corner: Corner, pointer: Point) -> bool {
        if !self.is_idle() {
            debug!(id = %target, %corner, active = self.state.kind(), "resize start ignored");
            return false;
        }
        debug!(id = %target, %corner, x = pointer.x, y = pointer.y, "resize start");
        self.state = ManipulationState::Resizing { target, corner, last_pointer: pointer };
        true
    }

    /// Begin rotating `element` about its current center. Ignored unless idle.
    pub fn begin_rotate(&mut self, element: &PlacedElement, pointer: Point) -> bool {
        if !self.is_idle() {
            debug!(id = %element.id, active = self.state.kind(), "rotate start ignored");
            return false;
        }
        let pivot = center(&element.position);
        let initial_angle = angle_between(pivot, pointer);
        debug!(id = %element.id, cx = pivot.x, cy = pivot.y, initial_angle, "rotate start");
        self.state = ManipulationState::Rotating {
            target: element.id,
            center: pivot,
            initial_angle,
            start_rotation: element.rotation,
        };
        true
    }

    /// Feed one pointer sample into the running gesture.
    ///
    /// Returns the id of the sticker whose geometry changed, or `None` when
    /// idle or when the target no longer exists.
    pub fn apply_move(&mut self, store: &mut ElementStore, pointer: Point) -> Option<ElementId> {
        match &mut self.state {
            ManipulationState::None => None,
            ManipulationState::Dragging { target, last_pointer } => {
                let delta = pointer.delta_from(*last_pointer);
                *last_pointer = pointer;
                let changed = store.update(target, |el| {
                    el.position.top += delta.y;
                    el.position.left += delta.x;
                });
                changed.then_some(*target)
            }
            ManipulationState::Resizing { target, corner, last_pointer } => {
                let delta = pointer.delta_from(*last_pointer);
                *last_pointer = pointer;
                let corner = *corner;
                let changed = store.update(target, |el| apply_resize(el, corner, delta));
                changed.then_some(*target)
            }
            ManipulationState::Rotating { target, center, initial_angle, start_rotation } => {
                let current = angle_between(*center, pointer);
                let delta = wrap_delta(current - *initial_angle);
                let rotation = *start_rotation + delta.to_degrees();
                let changed = store.update(target, |el| el.rotation = rotation);
                changed.then_some(*target)
            }
        }
    }

    /// End the running gesture. Returns `false` if nothing was running.
    pub fn end(&mut self) -> bool {
        let prev = std::mem::take(&mut self.state);
        if prev.is_none() {
            return false;
        }
        debug!(kind = prev.kind(), "gesture end");
        true
    }
}

/// Move the dragged edges of `el` by `delta`, never shrinking below the
/// minimum size. The left and top edges move even when their dimension is
/// clamped.
fn apply_resize(el: &mut PlacedElement, corner: Corner, delta: Point) {
    let pos = &mut el.position;
    if corner.has_right() {
        pos.width = (pos.width + delta.x).max(MIN_ELEMENT_SIZE);
    }
    if corner.has_left() {
        pos.width = (pos.width - delta.x).max(MIN_ELEMENT_SIZE);
        pos.left += delta.x;
    }
    if corner.has_bottom() {
        pos.height = (pos.height + delta.y).max(MIN_ELEMENT_SIZE);
    }
    if corner.has_top() {
        pos.height = (pos.height - delta.y).max(MIN_ELEMENT_SIZE);
        pos.top += delta.y;
    }
}

/// Which controller owns the document-level move/up listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureOwner {
    /// A sticker drag, resize or rotate.
    Sticker,
    /// A caption drag.
    Caption,
}

/// Single-holder lease on the document-level move/up listeners.
///
/// Acquired when a gesture starts, released when it ends. Hosts register
/// their global handlers on acquire and remove them on release, so nothing is
/// listening while the editor is idle.
#[derive(Debug, Default)]
pub struct ListenerSlot {
    holder: Option<GestureOwner>,
}

impl ListenerSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the slot for `owner`. Fails if anyone already holds it.
    pub fn acquire(&mut self, owner: GestureOwner) -> bool {
        if self.holder.is_some() {
            return false;
        }
        self.holder = Some(owner);
        true
    }

    /// Give the slot back. Only the current holder can release it.
    pub fn release(&mut self, owner: GestureOwner) -> bool {
        if self.holder != Some(owner) {
            return false;
        }
        self.holder = None;
        true
    }

    #[must_use]
    pub fn holder(&self) -> Option<GestureOwner> {
        self.holder
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.holder.is_some()
    }
}
