//! Editor configuration: canvas box, sticker defaults, caption defaults, the
//! template slot table, and export settings.
//!
//! Every field has a default, so a host can pass `{}` or a partial JSON object
//! and override only what it needs. [`EditorConfig::from_json`] parses and then
//! validates; a config that fails validation never reaches the editor.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::caption::CaptionFont;
use crate::consts::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CAPTION_DEFAULT_LEFT, CAPTION_DEFAULT_TOP, DEFAULT_ANCHOR, DEFAULT_ELEMENT_SIZE,
    DEFAULT_EXPORT_FILENAME, DEFAULT_JITTER, MIN_ELEMENT_SIZE,
};
use crate::error::ErrorCode;
use crate::template::{Length, TemplateSlot, default_templates};

/// Error returned by [`EditorConfig::from_json`] and [`EditorConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("canvas size must be positive, got {width}x{height}")]
    CanvasSize { width: f64, height: f64 },
    #[error("sticker size {0} is below the minimum of {min}", min = MIN_ELEMENT_SIZE)]
    StickerSize(f64),
    #[error("sticker jitter must not be negative, got {0}")]
    Jitter(i32),
    #[error("at least one template is required")]
    NoTemplates,
    #[error("duplicate template id: {0}")]
    DuplicateTemplate(String),
    #[error("template {id} has an invalid slot length: {reason}")]
    SlotLength { id: String, reason: String },
    #[error("export filename must not be empty")]
    EmptyFilename,
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_CONFIG_PARSE",
            _ => "E_CONFIG_INVALID",
        }
    }
}

/// Size of the fixed composition box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self { width: CANVAS_WIDTH, height: CANVAS_HEIGHT }
    }
}

/// Where and how big new stickers are placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerDefaults {
    /// Width and height of a new sticker.
    pub size: f64,
    pub anchor_top: f64,
    pub anchor_left: f64,
    /// Half-range of the random placement offset, in whole px.
    pub jitter: i32,
}

impl Default for StickerDefaults {
    fn default() -> Self {
        Self {
            size: DEFAULT_ELEMENT_SIZE,
            anchor_top: DEFAULT_ANCHOR,
            anchor_left: DEFAULT_ANCHOR,
            jitter: DEFAULT_JITTER,
        }
    }
}

/// Initial caption state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionDefaults {
    pub top: f64,
    pub left: f64,
    pub font: CaptionFont,
}

impl Default for CaptionDefaults {
    fn default() -> Self {
        Self { top: CAPTION_DEFAULT_TOP, left: CAPTION_DEFAULT_LEFT, font: CaptionFont::default() }
    }
}

/// Filename and share-sheet text for the exported card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub filename: String,
    pub share_title: String,
    pub share_text: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
            share_title: "My postcard".to_string(),
            share_text: "Take a look at the postcard I made!".to_string(),
        }
    }
}

/// Complete editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas: CanvasSize,
    pub sticker: StickerDefaults,
    pub caption: CaptionDefaults,
    pub templates: Vec<TemplateSlot>,
    pub export: ExportSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            sticker: StickerDefaults::default(),
            caption: CaptionDefaults::default(),
            templates: default_templates(),
            export: ExportSettings::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and one of the other
    /// variants when a value is out of range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value the editor relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let CanvasSize { width, height } = self.canvas;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::CanvasSize { width, height });
        }
        if self.sticker.size.is_nan() || self.sticker.size < MIN_ELEMENT_SIZE {
            return Err(ConfigError::StickerSize(self.sticker.size));
        }
        if self.sticker.jitter < 0 {
            return Err(ConfigError::Jitter(self.sticker.jitter));
        }
        if self.templates.is_empty() {
            return Err(ConfigError::NoTemplates);
        }
        let mut seen = HashSet::new();
        for slot in &self.templates {
            if !seen.insert(slot.template.as_str()) {
                return Err(ConfigError::DuplicateTemplate(slot.template.to_string()));
            }
            for (name, length) in [
                ("top", slot.top),
                ("left", slot.left),
                ("width", slot.width),
                ("height", slot.height),
            ] {
                if let Some(reason) = length_problem(length) {
                    return Err(ConfigError::SlotLength {
                        id: slot.template.to_string(),
                        reason: format!("{name} {reason}"),
                    });
                }
            }
        }
        if self.export.filename.trim().is_empty() {
            return Err(ConfigError::EmptyFilename);
        }
        Ok(())
    }

    /// Slot entry for a template id, if configured.
    #[must_use]
    pub fn template(&self, id: &str) -> Option<&TemplateSlot> {
        self.templates.iter().find(|t| t.template.as_str() == id)
    }
}

fn length_problem(length: Length) -> Option<&'static str> {
    match length {
        Length::Px(v) if !v.is_finite() || v < 0.0 => Some("must be a non-negative px value"),
        Length::Percent(v) if !v.is_finite() || !(0.0..=100.0).contains(&v) => Some("must be within 0..=100%"),
        _ => None,
    }
}
