//! Free-text caption overlay: content, font, and an absolute drag gesture.
//!
//! Unlike sticker drags, which apply incremental deltas, the caption keeps the
//! offset between the pointer and its own top-left corner captured at press
//! time and re-projects from it on every move. The caption therefore stays
//! locked to the exact spot under the pointer.

#[cfg(test)]
#[path = "caption_test.rs"]
mod caption_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CaptionDefaults;
use crate::geometry::{Point, Rect};

/// The fixed set of caption fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaptionFont {
    #[default]
    #[serde(rename = "cursive")]
    Cursive,
    #[serde(rename = "sans-serif")]
    SansSerif,
    #[serde(rename = "serif")]
    Serif,
    #[serde(rename = "monospace")]
    Monospace,
    #[serde(rename = "dfkai-sb")]
    DfKaiSb,
    #[serde(rename = "noto-serif-tc")]
    NotoSerifTc,
    #[serde(rename = "zhi-mang-xing")]
    ZhiMangXing,
}

impl CaptionFont {
    /// Every font, in picker order.
    pub const ALL: [CaptionFont; 7] = [
        CaptionFont::Cursive,
        CaptionFont::SansSerif,
        CaptionFont::Serif,
        CaptionFont::Monospace,
        CaptionFont::DfKaiSb,
        CaptionFont::NotoSerifTc,
        CaptionFont::ZhiMangXing,
    ];

    /// Value for the CSS `font-family` property.
    #[must_use]
    pub fn css_family(self) -> &'static str {
        match self {
            Self::Cursive => "cursive",
            Self::SansSerif => "sans-serif",
            Self::Serif => "serif",
            Self::Monospace => "monospace",
            Self::DfKaiSb => "'DFKai-SB', serif",
            Self::NotoSerifTc => "'Noto Serif TC', serif",
            Self::ZhiMangXing => "'Zhi Mang Xing', cursive",
        }
    }

    /// Short identifier used in config and by the host's font picker.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cursive => "cursive",
            Self::SansSerif => "sans-serif",
            Self::Serif => "serif",
            Self::Monospace => "monospace",
            Self::DfKaiSb => "dfkai-sb",
            Self::NotoSerifTc => "noto-serif-tc",
            Self::ZhiMangXing => "zhi-mang-xing",
        }
    }
}

impl fmt::Display for CaptionFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown caption font '{0}'")]
pub struct FontParseError(String);

impl FromStr for CaptionFont {
    type Err = FontParseError;

    /// Accepts either the short identifier or the CSS family string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s || f.css_family() == s)
            .ok_or_else(|| FontParseError(s.to_string()))
    }
}

/// Top-left corner of the caption in canvas px.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CaptionPosition {
    pub top: f64,
    pub left: f64,
}

/// The caption and its drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionOverlay {
    content: String,
    font: CaptionFont,
    position: CaptionPosition,
    drag_offset: Option<Point>,
    /// Rendered width and height, as measured by the host. Needed for
    /// hit-testing only.
    extent: Option<(f64, f64)>,
}

impl CaptionOverlay {
    #[must_use]
    pub fn new(defaults: CaptionDefaults) -> Self {
        Self {
            content: String::new(),
            font: defaults.font,
            position: CaptionPosition { top: defaults.top, left: defaults.left },
            drag_offset: None,
            extent: None,
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the text. The measured extent is dropped until the host
    /// reports the new size.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.extent = None;
    }

    #[must_use]
    pub fn font(&self) -> CaptionFont {
        self.font
    }

    /// Change the font. Like [`CaptionOverlay::set_content`], this drops the
    /// measured extent.
    pub fn set_font(&mut self, font: CaptionFont) {
        self.font = font;
        self.extent = None;
    }

    #[must_use]
    pub fn position(&self) -> CaptionPosition {
        self.position
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Record the rendered size so presses can be hit-tested against it.
    pub fn set_extent(&mut self, width: f64, height: f64) {
        self.extent = Some((width.max(0.0), height.max(0.0)));
    }

    #[must_use]
    pub fn needs_measure(&self) -> bool {
        self.extent.is_none()
    }

    /// Box the caption occupies, once its extent is known.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let (width, height) = self.extent?;
        Some(Rect::new(self.position.top, self.position.left, width, height))
    }

    /// Start dragging from `pointer`. Ignored if already dragging.
    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        if self.is_dragging() {
            return false;
        }
        let offset = pointer.delta_from(Point::new(self.position.left, self.position.top));
        debug!(dx = offset.x, dy = offset.y, "caption drag start");
        self.drag_offset = Some(offset);
        true
    }

    /// Re-project the caption under `pointer`. Returns `false` when not dragging.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let Some(offset) = self.drag_offset else {
            return false;
        };
        self.position = CaptionPosition { top: pointer.y - offset.y, left: pointer.x - offset.x };
        true
    }

    /// Finish the drag. Returns `false` when not dragging.
    pub fn end_drag(&mut self) -> bool {
        if self.drag_offset.take().is_none() {
            return false;
        }
        debug!(top = self.position.top, left = self.position.left, "caption drag end");
        true
    }
}
