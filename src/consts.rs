//! Shared numeric constants for the collage crate.

// ── Element geometry ────────────────────────────────────────────

/// Smallest width or height a placed sticker may ever have, in canvas px.
pub const MIN_ELEMENT_SIZE: f64 = 50.0;

/// Width and height of a freshly placed sticker.
pub const DEFAULT_ELEMENT_SIZE: f64 = 100.0;

/// Top/left anchor around which new stickers are dropped.
pub const DEFAULT_ANCHOR: f64 = 150.0;

/// Half-range of the random offset applied to new stickers.
pub const DEFAULT_JITTER: i32 = 20;

// ── Canvas ──────────────────────────────────────────────────────

/// Width of the composition box in canvas px.
pub const CANVAS_WIDTH: f64 = 400.0;

/// Height of the composition box in canvas px.
pub const CANVAS_HEIGHT: f64 = 400.0;

// ── Handles (element-local, before rotation) ────────────────────

/// Side length of a square resize-corner handle.
pub const CORNER_HANDLE_SIZE: f64 = 12.0;

/// Diameter of the circular rotate handle.
pub const ROTATE_HANDLE_SIZE: f64 = 24.0;

/// How far the rotate handle sticks out past the top-right corner.
pub const ROTATE_HANDLE_OUTSET: f64 = 15.0;

/// Side length of the square delete control.
pub const DELETE_CONTROL_SIZE: f64 = 24.0;

/// Distance from the top edge up to the delete control's center.
pub const DELETE_CONTROL_OUTSET: f64 = 15.0;

// ── Caption ─────────────────────────────────────────────────────

/// Initial caption top offset.
pub const CAPTION_DEFAULT_TOP: f64 = 240.0;

/// Initial caption left offset.
pub const CAPTION_DEFAULT_LEFT: f64 = 100.0;

// ── Export ──────────────────────────────────────────────────────

/// Filename used when the composed card falls back to a plain download.
pub const DEFAULT_EXPORT_FILENAME: &str = "postcard.png";

/// MIME type of the rasterized card.
pub const EXPORT_MIME_TYPE: &str = "image/png";
