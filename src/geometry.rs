//! Pure geometry helpers: points, boxes, and the angle math behind rotation.
//!
//! Everything here works in canvas-local pixels with the screen convention of
//! Y growing downward, so a positive angle from [`angle_between`] turns
//! clockwise on screen.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

/// A point in canvas-local (or client) pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }

    /// Translate into a frame whose origin sits at `origin`.
    #[must_use]
    pub fn relative_to(self, origin: Point) -> Point {
        self.delta_from(origin)
    }
}

/// An axis-aligned box expressed the way CSS absolute positioning does.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self { top, left, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether `pt` lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x <= self.right() && pt.y >= self.top && pt.y <= self.bottom()
    }

    /// Raise width and height to `min` independently; position is untouched.
    pub fn clamp_min_size(&mut self, min: f64) {
        self.width = self.width.max(min);
        self.height = self.height.max(min);
    }
}

/// Center of a box: `{ left + width / 2, top + height / 2 }`.
#[must_use]
pub fn center(rect: &Rect) -> Point {
    Point { x: rect.left + rect.width / 2.0, y: rect.top + rect.height / 2.0 }
}

/// Angle in radians of the ray from `center` to `point`.
#[must_use]
pub fn angle_between(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x)
}

/// Fold a raw angle difference back into `(-π, π]`.
///
/// Consecutive samples on either side of the ±180° seam differ by almost 2π
/// in raw terms; folding turns that into the short way round.
#[must_use]
pub fn wrap_delta(raw: f64) -> f64 {
    if raw > PI {
        raw - TAU
    } else if raw < -PI {
        raw + TAU
    } else {
        raw
    }
}

/// Rotate `point` about `pivot` by `degrees` (clockwise on screen).
#[must_use]
pub fn rotate_about(point: Point, pivot: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point { x: pivot.x + dx * cos - dy * sin, y: pivot.y + dx * sin + dy * cos }
}
