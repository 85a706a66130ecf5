#![allow(clippy::float_cmp)]

use super::*;
use crate::config::{CaptionDefaults, StickerDefaults};
use crate::template::default_templates;

// =============================================================
// Helpers
// =============================================================

struct Fixture {
    templates: Vec<TemplateSlot>,
    photo: AssetRef,
    store: ElementStore,
    caption: CaptionOverlay,
}

impl Fixture {
    fn new() -> Self {
        let defaults = StickerDefaults { jitter: 0, ..StickerDefaults::default() };
        Self {
            templates: default_templates(),
            photo: AssetRef::new("blob:photo"),
            store: ElementStore::with_seed(defaults, 0),
            caption: CaptionOverlay::new(CaptionDefaults::default()),
        }
    }

    fn scene(&self, step: Step, active: Option<ElementId>) -> Scene {
        let input = Composition {
            canvas: CanvasSize::default(),
            template: self.templates.first(),
            photo: Some(&self.photo),
            store: &self.store,
            active,
            caption: &self.caption,
        };
        compose(&input, step)
    }
}

fn kinds(scene: &Scene) -> Vec<&'static str> {
    scene
        .layers
        .iter()
        .map(|l| match l {
            Layer::Background { .. } => "background",
            Layer::Photo { .. } => "photo",
            Layer::Sticker { .. } => "sticker",
            Layer::Caption { .. } => "caption",
        })
        .collect()
}

// =============================================================
// Step gating
// =============================================================

#[test]
fn step_one_shows_template_only() {
    let mut f = Fixture::new();
    f.store.add(AssetRef::new("/images/rose.png"));
    assert_eq!(kinds(&f.scene(Step::Template, None)), vec!["background"]);
}

#[test]
fn step_two_adds_photo_slot() {
    let f = Fixture::new();
    let scene = f.scene(Step::Photo, None);
    assert_eq!(kinds(&scene), vec!["background", "photo"]);
    let Layer::Photo { slot, fit, interactive, .. } = &scene.layers[1] else {
        panic!("expected photo layer");
    };
    assert_eq!(*slot, Rect::new(60.0, 130.0, 140.0, 240.0));
    assert_eq!(*fit, Fit::Cover);
    assert!(*interactive);
}

#[test]
fn stickers_appear_from_step_three_in_insertion_order() {
    let mut f = Fixture::new();
    let a = f.store.add(AssetRef::new("/images/a.png"));
    let b = f.store.add(AssetRef::new("/images/b.png"));
    let scene = f.scene(Step::Collage, None);
    assert_eq!(kinds(&scene), vec!["background", "photo", "sticker", "sticker"]);
    let ids: Vec<ElementId> = scene
        .stickers()
        .filter_map(|l| match l {
            Layer::Sticker { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn caption_step_freezes_stickers() {
    let mut f = Fixture::new();
    let a = f.store.add(AssetRef::new("/images/a.png"));
    let scene = f.scene(Step::Caption, Some(a));
    assert_eq!(kinds(&scene), vec!["background", "photo", "sticker", "caption"]);
    let Layer::Sticker { interactive, handles, active, .. } = &scene.layers[2] else {
        panic!("expected sticker layer");
    };
    assert!(!interactive);
    assert!(!active);
    assert!(handles.is_none());
    assert!(matches!(scene.layers[3], Layer::Caption { interactive: true, .. }));
}

#[test]
fn export_step_has_nothing_interactive() {
    let mut f = Fixture::new();
    let a = f.store.add(AssetRef::new("/images/a.png"));
    let scene = f.scene(Step::Export, Some(a));
    for layer in &scene.layers {
        match layer {
            Layer::Photo { interactive, .. } | Layer::Sticker { interactive, .. } | Layer::Caption { interactive, .. } => {
                assert!(!interactive);
            }
            Layer::Background { .. } => {}
        }
    }
}

#[test]
fn no_template_means_no_background_or_photo() {
    let f = Fixture::new();
    let input = Composition {
        canvas: CanvasSize::default(),
        template: None,
        photo: None,
        store: &f.store,
        active: None,
        caption: &f.caption,
    };
    assert!(compose(&input, Step::Photo).layers.is_empty());
}

// =============================================================
// Sticker layer
// =============================================================

#[test]
fn only_active_sticker_has_handles() {
    let mut f = Fixture::new();
    let a = f.store.add(AssetRef::new("/images/a.png"));
    let _b = f.store.add(AssetRef::new("/images/b.png"));
    let scene = f.scene(Step::Collage, Some(a));
    let with_handles: Vec<bool> = scene
        .stickers()
        .map(|l| matches!(l, Layer::Sticker { handles: Some(_), .. }))
        .collect();
    assert_eq!(with_handles, vec![true, false]);
}

#[test]
fn rotation_becomes_css_transform() {
    let mut f = Fixture::new();
    let a = f.store.add(AssetRef::new("/images/a.png"));
    f.store.update(&a, |e| e.rotation = -90.0);
    let scene = f.scene(Step::Collage, None);
    let Some(Layer::Sticker { transform, rotation, .. }) = scene.stickers().next() else {
        panic!("expected sticker layer");
    };
    assert_eq!(transform, "rotate(-90deg)");
    assert_eq!(*rotation, -90.0);
}

#[test]
fn deleted_sticker_is_omitted() {
    let mut f = Fixture::new();
    let a = f.store.add(AssetRef::new("/images/a.png"));
    f.store.remove(&a);
    assert_eq!(f.scene(Step::Collage, None).stickers().count(), 0);
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn scene_is_deterministic() {
    let mut f = Fixture::new();
    f.store.add(AssetRef::new("/images/a.png"));
    assert_eq!(f.scene(Step::Export, None), f.scene(Step::Export, None));
}

#[test]
fn json_tags_layers_by_kind() {
    let mut f = Fixture::new();
    f.caption.set_content("hello");
    f.caption.set_font(CaptionFont::Serif);
    let json: serde_json::Value = serde_json::from_str(&f.scene(Step::Caption, None).to_json().unwrap()).unwrap();
    assert_eq!(json["step"], "caption");
    assert_eq!(json["layers"][0]["kind"], "background");
    assert_eq!(json["layers"][0]["fit"], "contain");
    let caption = &json["layers"][2];
    assert_eq!(caption["kind"], "caption");
    assert_eq!(caption["text"], "hello");
    assert_eq!(caption["font_family"], "serif");
    assert_eq!(caption["position"]["top"], 240.0);
}
