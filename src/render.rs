//! Composition renderer: turns editor state into a deterministic, serialisable
//! layer stack that a host draws as-is.
//!
//! Layer order, bottom to top:
//!
//! | Layer      | Shown from step | Notes                                   |
//! |------------|-----------------|-----------------------------------------|
//! | Background | 1               | template image, `contain` in the canvas |
//! | Photo      | 2               | `cover`, clipped to the template slot   |
//! | Sticker    | 3               | insertion order; handles on the active  |
//! | Caption    | 4               | interactive only in the caption step    |
//!
//! The same input always produces the same [`Scene`]; nothing here reads
//! clocks, randomness, or the DOM.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::caption::{CaptionFont, CaptionOverlay, CaptionPosition};
use crate::config::CanvasSize;
use crate::geometry::Rect;
use crate::hit::HandleLayout;
use crate::store::{AssetRef, ElementId, ElementStore, PlacedElement};
use crate::template::TemplateSlot;
use crate::wizard::Step;

/// How an image is fitted into its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    Contain,
    Cover,
}

/// One drawable layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Layer {
    Background {
        asset: AssetRef,
        fit: Fit,
    },
    Photo {
        /// `None` while the slot is still empty.
        asset: Option<AssetRef>,
        slot: Rect,
        fit: Fit,
        /// The host makes the slot clickable to pick a photo.
        interactive: bool,
    },
    Sticker {
        id: ElementId,
        asset: AssetRef,
        rect: Rect,
        rotation: f64,
        /// CSS transform applied about the sticker's own center.
        transform: String,
        active: bool,
        interactive: bool,
        /// Present only on the active sticker while stickers are editable.
        handles: Option<HandleLayout>,
    },
    Caption {
        text: String,
        font: CaptionFont,
        font_family: &'static str,
        position: CaptionPosition,
        interactive: bool,
    },
}

/// The full layer stack for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub step: Step,
    pub width: f64,
    pub height: f64,
    pub layers: Vec<Layer>,
}

impl Scene {
    /// Serialize for a JavaScript host.
    ///
    /// # Errors
    ///
    /// Only fails if a float is non-finite.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Sticker layers, bottom first.
    pub fn stickers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| matches!(l, Layer::Sticker { .. }))
    }
}

/// Everything the renderer reads.
pub struct Composition<'a> {
    pub canvas: CanvasSize,
    pub template: Option<&'a TemplateSlot>,
    pub photo: Option<&'a AssetRef>,
    pub store: &'a ElementStore,
    pub active: Option<ElementId>,
    pub caption: &'a CaptionOverlay,
}

/// Build the scene for `step`.
#[must_use]
pub fn compose(input: &Composition<'_>, step: Step) -> Scene {
    let views = step.views();
    let mut layers = Vec::new();

    if let Some(slot) = input.template {
        layers.push(Layer::Background { asset: slot.template.clone(), fit: Fit::Contain });
        if views.photo {
            layers.push(Layer::Photo {
                asset: input.photo.cloned(),
                slot: slot.resolve(input.canvas),
                fit: Fit::Cover,
                interactive: step == Step::Photo,
            });
        }
    }

    if views.stickers {
        for el in input.store.iter() {
            let active = input.active == Some(el.id);
            layers.push(sticker_layer(el, active, views.stickers_interactive));
        }
    }

    if views.caption {
        let caption = input.caption;
        layers.push(Layer::Caption {
            text: caption.content().to_string(),
            font: caption.font(),
            font_family: caption.font().css_family(),
            position: caption.position(),
            interactive: views.caption_interactive,
        });
    }

    Scene { step, width: input.canvas.width, height: input.canvas.height, layers }
}

fn sticker_layer(el: &PlacedElement, active: bool, interactive: bool) -> Layer {
    let show_handles = active && interactive;
    Layer::Sticker {
        id: el.id,
        asset: el.asset.clone(),
        rect: el.position,
        rotation: el.rotation,
        transform: format!("rotate({}deg)", el.rotation),
        active: show_handles,
        interactive,
        handles: show_handles.then(|| HandleLayout::for_size(el.position.width, el.position.height)),
    }
}
