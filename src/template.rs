//! Template slot table: where the inserted photo sits on each background.
//!
//! Slots are written the way a stylesheet would write them (`"60px"`,
//! `"35%"`) and resolved to canvas px against the composition box, with
//! vertical percentages taken from the box height and horizontal ones from
//! its width.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::CanvasSize;
use crate::geometry::Rect;
use crate::store::AssetRef;

/// A CSS-style length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    /// Resolve against the length of the containing axis.
    #[must_use]
    pub fn resolve(self, container: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => container * p / 100.0,
        }
    }
}

/// Error returned when a length string is neither `<n>px` nor `<n>%`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid length '{0}' (expected e.g. \"60px\" or \"35%\")")]
pub struct LengthParseError(String);

impl FromStr for Length {
    type Err = LengthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (number, ctor): (&str, fn(f64) -> Length) = if let Some(n) = trimmed.strip_suffix("px") {
            (n, Length::Px)
        } else if let Some(n) = trimmed.strip_suffix('%') {
            (n, Length::Percent)
        } else {
            return Err(LengthParseError(s.to_string()));
        };
        number
            .trim()
            .parse::<f64>()
            .map(ctor)
            .map_err(|_| LengthParseError(s.to_string()))
    }
}

impl TryFrom<String> for Length {
    type Error = LengthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Length> for String {
    fn from(value: Length) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Photo slot for one background template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSlot {
    /// Background asset; also the template's identifier.
    pub template: AssetRef,
    pub top: Length,
    pub left: Length,
    pub width: Length,
    pub height: Length,
}

impl TemplateSlot {
    /// The slot rectangle in canvas px.
    #[must_use]
    pub fn resolve(&self, canvas: CanvasSize) -> Rect {
        Rect {
            top: self.top.resolve(canvas.height),
            left: self.left.resolve(canvas.width),
            width: self.width.resolve(canvas.width),
            height: self.height.resolve(canvas.height),
        }
    }
}

/// The three postcard backgrounds shipped with the editor.
#[must_use]
pub fn default_templates() -> Vec<TemplateSlot> {
    vec![
        slot("/style/style1.png", 60.0, 130.0, 35.0, 60.0),
        slot("/style/style2.png", 81.0, 92.0, 52.0, 49.0),
        slot("/style/style3.png", 84.0, 68.0, 51.0, 50.0),
    ]
}

fn slot(template: &str, top_px: f64, left_px: f64, width_pct: f64, height_pct: f64) -> TemplateSlot {
    TemplateSlot {
        template: AssetRef::new(template),
        top: Length::Px(top_px),
        left: Length::Px(left_px),
        width: Length::Percent(width_pct),
        height: Length::Percent(height_pct),
    }
}
