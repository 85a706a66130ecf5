//! Pointer unifier: one typed union over mouse and touch input.
//!
//! Gesture code never looks at the shape of the native event. Hosts build a
//! [`PointerInput`] from whatever the platform delivered and every consumer
//! calls [`PointerInput::sample`] the same way.

#[cfg(test)]
#[path = "pointer_test.rs"]
mod pointer_test;

use crate::geometry::Point;

/// A pointer event reduced to the coordinates the editor cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    /// Mouse event carrying its client coordinates.
    Mouse { client: Point },
    /// Touch event carrying the client coordinates of every active touch, in
    /// platform order. Empty on `touchend`.
    Touch { touches: Vec<Point> },
}

impl PointerInput {
    #[must_use]
    pub fn mouse(x: f64, y: f64) -> Self {
        Self::Mouse { client: Point::new(x, y) }
    }

    #[must_use]
    pub fn touch(touches: Vec<Point>) -> Self {
        Self::Touch { touches }
    }

    /// The single coordinate pair this event stands for: the first active
    /// touch, or the mouse position. `None` for a touch event with no touches.
    #[must_use]
    pub fn sample(&self) -> Option<Point> {
        match self {
            Self::Mouse { client } => Some(*client),
            Self::Touch { touches } => touches.first().copied(),
        }
    }

    /// [`Self::sample`] translated into a frame whose origin is `origin`.
    #[must_use]
    pub fn sample_in(&self, origin: Point) -> Option<Point> {
        self.sample().map(|p| p.relative_to(origin))
    }
}
