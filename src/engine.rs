use serde::Serialize;
use tracing::{debug, info, warn};

use crate::caption::{CaptionFont, CaptionOverlay, CaptionPosition};
use crate::config::{ConfigError, EditorConfig};
use crate::error::{EditorError, Notice};
use crate::export::{ExportError, ExportOutcome, ExportPipeline, Rasterizer, ShareTarget};
use crate::geometry::Point;
use crate::hit::{HitPart, hit_test};
use crate::input::{Corner, GestureOwner, ListenerSlot, ManipulationState, Manipulator};
use crate::inventory::Inventory;
use crate::pointer::PointerInput;
use crate::render::{Composition, Scene, compose};
use crate::selection::Selection;
use crate::store::{AssetRef, ElementId, ElementStore, PlacedElement};
use crate::template::TemplateSlot;
use crate::wizard::{Step, Wizard};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from editor operations for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
    ElementAdded(PlacedElement),
    ElementUpdated(PlacedElement),
    ElementDeleted(ElementId),
    SelectionChanged(Option<ElementId>),
    CaptionMoved(CaptionPosition),
    /// The caption's rendered size is unknown; the host should report it
    /// through [`EditorCore::set_caption_extent`] once the scene is drawn.
    CaptionMeasureNeeded,
    /// Register document-level move/up handlers for this gesture.
    ListenersAcquired(GestureOwner),
    /// Remove the document-level handlers.
    ListenersReleased(GestureOwner),
    TemplateChanged(AssetRef),
    PhotoChanged(Option<AssetRef>),
    StepChanged(Step),
    PaletteLoaded(Vec<AssetRef>),
    Exported(ExportOutcome),
    Notice(Notice),
    RenderNeeded,
}

/// What a press landed on, for hosts that bind handlers per DOM node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Sticker(ElementId),
    ResizeHandle(ElementId, Corner),
    RotateHandle(ElementId),
    Caption,
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Sticker(ElementId),
    DeleteControl(ElementId),
    Background,
}

/// Core editor state: all logic that doesn't depend on the browser.
///
/// Separated from `WebEditor` so it can be tested without WASM/browser
/// dependencies. Pointer coordinates arrive in client space and are mapped to
/// canvas-local px through [`EditorCore::set_origin`].
pub struct EditorCore {
    config: EditorConfig,
    store: ElementStore,
    manipulator: Manipulator,
    selection: Selection,
    caption: CaptionOverlay,
    wizard: Wizard,
    listeners: ListenerSlot,
    template: Option<TemplateSlot>,
    photo: Option<AssetRef>,
    palette: Vec<AssetRef>,
    inventory: Box<dyn Inventory>,
    origin: Point,
}

impl EditorCore {
    /// Create an editor from a config and a sticker inventory.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] the config fails.
    pub fn new(config: EditorConfig, inventory: Box<dyn Inventory>) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = ElementStore::new(config.sticker);
        Ok(Self::build(config, inventory, store))
    }

    /// Like [`EditorCore::new`], with a fixed placement seed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] the config fails.
    pub fn with_seed(config: EditorConfig, inventory: Box<dyn Inventory>, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = ElementStore::with_seed(config.sticker, seed);
        Ok(Self::build(config, inventory, store))
    }

    fn build(config: EditorConfig, inventory: Box<dyn Inventory>, store: ElementStore) -> Self {
        Self {
            caption: CaptionOverlay::new(config.caption),
            config,
            store,
            manipulator: Manipulator::new(),
            selection: Selection::new(),
            wizard: Wizard::new(),
            listeners: ListenerSlot::new(),
            template: None,
            photo: None,
            palette: Vec::new(),
            inventory,
            origin: Point::default(),
        }
    }

    // --- Setup ---

    /// Client-space position of the canvas root's top-left corner.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Pick a background template. Any inserted photo is cleared.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownTemplate`] if `id` is not configured.
    pub fn choose_template(&mut self, id: &str) -> Result<Vec<Action>, EditorError> {
        let slot = self
            .config
            .template(id)
            .cloned()
            .ok_or_else(|| EditorError::UnknownTemplate(id.to_string()))?;
        info!(template = %slot.template, "template chosen");
        let mut actions = vec![Action::TemplateChanged(slot.template.clone())];
        self.template = Some(slot);
        if self.photo.take().is_some() {
            actions.push(Action::PhotoChanged(None));
        }
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Put a photo into the current template's slot.
    ///
    /// # Errors
    ///
    /// [`EditorError::PhotoWithoutTemplate`] if no template is chosen yet.
    pub fn insert_photo(&mut self, photo: AssetRef) -> Result<Vec<Action>, EditorError> {
        if self.template.is_none() {
            return Err(EditorError::PhotoWithoutTemplate);
        }
        info!(photo = %photo, "photo inserted");
        self.photo = Some(photo.clone());
        Ok(vec![Action::PhotoChanged(Some(photo)), Action::RenderNeeded])
    }

    // --- Wizard ---

    /// Go to the next step. A refusal comes back as an [`Action::Notice`].
    pub fn next_step(&mut self) -> Vec<Action> {
        let mut actions = self.finish_gesture();
        let before = self.wizard.step();
        match self.wizard.advance(self.template.is_some()) {
            Ok(step) if step != before => {
                actions.push(Action::StepChanged(step));
                if step == Step::Collage {
                    self.palette = self.inventory.sticker_assets();
                    debug!(count = self.palette.len(), "palette loaded");
                    actions.push(Action::PaletteLoaded(self.palette.clone()));
                }
                if step == Step::Caption && self.caption.needs_measure() {
                    actions.push(Action::CaptionMeasureNeeded);
                }
                actions.push(Action::RenderNeeded);
            }
            Ok(_) => {}
            Err(e) => actions.push(Action::Notice(Notice::from_error(&EditorError::from(e)))),
        }
        actions
    }

    /// Go back one step.
    pub fn prev_step(&mut self) -> Vec<Action> {
        let mut actions = self.finish_gesture();
        let before = self.wizard.step();
        let step = self.wizard.retreat();
        if step != before {
            actions.push(Action::StepChanged(step));
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Stickers ---

    /// Drop a new sticker onto the canvas. Only available in the collage step.
    pub fn add_sticker(&mut self, asset: AssetRef) -> Vec<Action> {
        if self.wizard.step() != Step::Collage {
            debug!(step = self.wizard.step().number(), "add sticker ignored outside collage step");
            return Vec::new();
        }
        let id = self.store.add(asset);
        self.store
            .get(&id)
            .map(|el| vec![Action::ElementAdded(el.clone()), Action::RenderNeeded])
            .unwrap_or_default()
    }

    /// Remove a sticker. Unknown ids are ignored.
    pub fn delete_element(&mut self, id: &ElementId) -> Vec<Action> {
        if self.store.remove(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::ElementDeleted(*id)];
        if self.selection.on_deleted(id) {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Pointer input ---

    /// Press anywhere on the canvas: resolve what is under the pointer and
    /// start the matching gesture.
    pub fn pointer_down(&mut self, input: &PointerInput) -> Vec<Action> {
        let Some(p) = input.sample_in(self.origin) else {
            return Vec::new();
        };
        match self.press_target_at(p) {
            Some(target) => self.press(target, input),
            None => Vec::new(),
        }
    }

    fn press_target_at(&self, p: Point) -> Option<PressTarget> {
        match self.wizard.step() {
            Step::Collage => {
                let hit = hit_test(p, &self.store, self.selection.active())?;
                match hit.part {
                    HitPart::Body => Some(PressTarget::Sticker(hit.element)),
                    HitPart::ResizeHandle(corner) => Some(PressTarget::ResizeHandle(hit.element, corner)),
                    HitPart::RotateHandle => Some(PressTarget::RotateHandle(hit.element)),
                    HitPart::DeleteControl => None,
                }
            }
            Step::Caption => self
                .caption
                .bounds()
                .filter(|b| b.contains(p))
                .map(|_| PressTarget::Caption),
            _ => None,
        }
    }

    /// Start a gesture on a known target. Ignored while another gesture holds
    /// the listeners, outside the step that owns the target, when the sticker
    /// no longer exists, or for a handle of a sticker that is not active.
    pub fn press(&mut self, target: PressTarget, input: &PointerInput) -> Vec<Action> {
        let Some(p) = input.sample_in(self.origin) else {
            return Vec::new();
        };
        if let Some(holder) = self.listeners.holder() {
            debug!(?holder, "press ignored: gesture in flight");
            return Vec::new();
        }
        let step = self.wizard.step();
        let (owner, started) = match target {
            PressTarget::Caption => (GestureOwner::Caption, step == Step::Caption && self.caption.begin_drag(p)),
            _ if step != Step::Collage => return Vec::new(),
            PressTarget::Sticker(id) => {
                (GestureOwner::Sticker, self.store.contains(&id) && self.manipulator.begin_drag(id, p))
            }
            PressTarget::ResizeHandle(id, _) | PressTarget::RotateHandle(id) if !self.selection.is_active(&id) => {
                debug!(%id, "handle press ignored: sticker not active");
                return Vec::new();
            }
            PressTarget::ResizeHandle(id, corner) => {
                (GestureOwner::Sticker, self.store.contains(&id) && self.manipulator.begin_resize(id, corner, p))
            }
            PressTarget::RotateHandle(id) => {
                let started = match self.store.get(&id) {
                    Some(el) => self.manipulator.begin_rotate(el, p),
                    None => false,
                };
                (GestureOwner::Sticker, started)
            }
        };
        if !started || !self.listeners.acquire(owner) {
            return Vec::new();
        }
        vec![Action::ListenersAcquired(owner)]
    }

    /// Pointer moved while a gesture holds the listeners.
    pub fn pointer_move(&mut self, input: &PointerInput) -> Vec<Action> {
        let Some(p) = input.sample_in(self.origin) else {
            return Vec::new();
        };
        match self.listeners.holder() {
            Some(GestureOwner::Sticker) => self
                .manipulator
                .apply_move(&mut self.store, p)
                .and_then(|id| self.store.get(&id))
                .map(|el| vec![Action::ElementUpdated(el.clone()), Action::RenderNeeded])
                .unwrap_or_default(),
            Some(GestureOwner::Caption) => {
                if self.caption.drag_to(p) {
                    vec![Action::CaptionMoved(self.caption.position()), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        }
    }

    /// Pointer released anywhere: end the gesture and release the listeners.
    pub fn pointer_up(&mut self) -> Vec<Action> {
        self.finish_gesture()
    }

    fn finish_gesture(&mut self) -> Vec<Action> {
        let Some(owner) = self.listeners.holder() else {
            return Vec::new();
        };
        match owner {
            GestureOwner::Sticker => {
                self.manipulator.end();
            }
            GestureOwner::Caption => {
                self.caption.end_drag();
            }
        }
        self.listeners.release(owner);
        vec![Action::ListenersReleased(owner), Action::RenderNeeded]
    }

    /// Click anywhere on the canvas.
    pub fn click(&mut self, input: &PointerInput) -> Vec<Action> {
        let Some(p) = input.sample_in(self.origin) else {
            return Vec::new();
        };
        if self.wizard.step() != Step::Collage {
            return Vec::new();
        }
        let target = match hit_test(p, &self.store, self.selection.active()) {
            Some(hit) if hit.part == HitPart::DeleteControl => ClickTarget::DeleteControl(hit.element),
            Some(hit) => ClickTarget::Sticker(hit.element),
            None => ClickTarget::Background,
        };
        self.click_target(target)
    }

    /// Click on a known target. Ignored while a gesture is in flight.
    pub fn click_target(&mut self, target: ClickTarget) -> Vec<Action> {
        if self.listeners.is_held() {
            return Vec::new();
        }
        match target {
            ClickTarget::Sticker(id) => {
                if self.store.contains(&id) && self.selection.select(id) {
                    vec![Action::SelectionChanged(Some(id)), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            ClickTarget::DeleteControl(id) => self.delete_element(&id),
            ClickTarget::Background => {
                if self.selection.clear() {
                    vec![Action::SelectionChanged(None), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    // --- Caption ---

    /// Replace the caption text. The host must re-measure it before the
    /// caption can be pressed again.
    pub fn set_caption_text(&mut self, text: impl Into<String>) -> Vec<Action> {
        self.caption.set_content(text);
        vec![Action::CaptionMeasureNeeded, Action::RenderNeeded]
    }

    pub fn set_caption_font(&mut self, font: CaptionFont) -> Vec<Action> {
        self.caption.set_font(font);
        vec![Action::CaptionMeasureNeeded, Action::RenderNeeded]
    }

    /// Rendered caption size, reported by the host after layout.
    pub fn set_caption_extent(&mut self, width: f64, height: f64) {
        self.caption.set_extent(width, height);
    }

    // --- Render / export ---

    /// Layer stack for the current step.
    #[must_use]
    pub fn scene(&self) -> Scene {
        self.scene_for(self.wizard.step())
    }

    /// The final card: everything visible, nothing interactive.
    #[must_use]
    pub fn export_scene(&self) -> Scene {
        self.scene_for(Step::Export)
    }

    fn scene_for(&self, step: Step) -> Scene {
        let input = Composition {
            canvas: self.config.canvas,
            template: self.template.as_ref(),
            photo: self.photo.as_ref(),
            store: &self.store,
            active: self.selection.active(),
            caption: &self.caption,
        };
        compose(&input, step)
    }

    /// Snapshot what an export needs, so the editor need not stay borrowed
    /// while the export runs.
    #[must_use]
    pub fn prepare_export(&self) -> ExportJob {
        ExportJob { scene: self.export_scene(), pipeline: ExportPipeline::new(&self.config.export) }
    }

    // --- Queries ---

    #[must_use]
    pub fn step(&self) -> Step {
        self.wizard.step()
    }

    #[must_use]
    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&PlacedElement> {
        self.store.get(id)
    }

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.selection.active()
    }

    #[must_use]
    pub fn manipulation(&self) -> &ManipulationState {
        self.manipulator.state()
    }

    #[must_use]
    pub fn listener_holder(&self) -> Option<GestureOwner> {
        self.listeners.holder()
    }

    #[must_use]
    pub fn caption(&self) -> &CaptionOverlay {
        &self.caption
    }

    #[must_use]
    pub fn template(&self) -> Option<&TemplateSlot> {
        self.template.as_ref()
    }

    #[must_use]
    pub fn photo(&self) -> Option<&AssetRef> {
        self.photo.as_ref()
    }

    /// Sticker assets offered in the collage step.
    #[must_use]
    pub fn palette(&self) -> &[AssetRef] {
        &self.palette
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}

/// A detached export: the final scene plus the pipeline that ships it.
pub struct ExportJob {
    pub scene: Scene,
    pipeline: ExportPipeline,
}

impl ExportJob {
    /// Run the export. Failures come back as a retryable [`Action::Notice`].
    /// A failed share that fell back to download yields the notice followed by
    /// the outcome.
    pub async fn run(self, rasterizer: &dyn Rasterizer, target: &dyn ShareTarget) -> Vec<Action> {
        match self.pipeline.run(&self.scene, rasterizer, target).await {
            Ok(outcome) => {
                let mut actions = Vec::with_capacity(2);
                if let ExportOutcome::Downloaded { share_error: Some(reason), .. } = &outcome {
                    let err = EditorError::from(ExportError::Share(reason.clone()));
                    actions.push(Action::Notice(Notice::from_error(&err)));
                }
                actions.push(Action::Exported(outcome));
                actions
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                vec![Action::Notice(Notice::from_error(&EditorError::from(e)))]
            }
        }
    }
}
