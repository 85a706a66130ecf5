//! Browser host: binds [`EditorCore`] to a DOM root element.
//!
//! The host owns the canvas root explicitly; nothing is looked up globally
//! after construction. Presses and clicks are listened for on the root for the
//! editor's whole life. The document-level move/up handlers are attached only
//! while a gesture holds the listener slot, following the
//! [`Action::ListenersAcquired`] and [`Action::ListenersReleased`] pair the
//! core emits.
//!
//! JavaScript supplies three callbacks:
//!
//! - `on_render(sceneJson)` draws the layer stack.
//! - `on_action(actionJson)` receives every other action (selection, notices,
//!   export outcome).
//! - `rasterize(root, sceneJson)` flattens the final card and resolves to a
//!   `Uint8Array` of PNG bytes.
//!
//! The caption is hit-tested against the size the host reports through
//! `setCaptionExtent(width, height)`. Until then it cannot be pressed. The
//! size is dropped whenever the text or font changes, and the host is asked
//! for a new one with a `caption_measure_needed` action, delivered after the
//! scene has been redrawn.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;
use uuid::Uuid;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{
    AddEventListenerOptions, Blob, BlobPropertyBag, Document, File, FilePropertyBag, HtmlAnchorElement, HtmlElement,
    MouseEvent, TouchEvent, Url,
};

use crate::caption::CaptionFont;
use crate::config::EditorConfig;
use crate::consts::EXPORT_MIME_TYPE;
use crate::engine::{Action, EditorCore};
use crate::error::{EditorError, Notice};
use crate::export::{ExportError, RasterImage, Rasterizer, ShareError, ShareMeta, ShareTarget};
use crate::geometry::Point;
use crate::inventory::{UnlockInventory, default_catalog};
use crate::pointer::PointerInput;
use crate::render::Scene;
use crate::store::AssetRef;
use crate::wizard::Step;

// =============================================================================
// LOGGING
// =============================================================================

/// Route `tracing` output to the browser console. `filter` is an `EnvFilter`
/// directive; defaults to `info`. Safe to call more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(filter: Option<String>) {
    let filter = EnvFilter::new(filter.as_deref().unwrap_or("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);
    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        debug!("tracing already initialised");
    }
}

// =============================================================================
// JS HELPERS
// =============================================================================

/// Best-effort human-readable text for a thrown JS value.
fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Ok(message) = Reflect::get(value, &JsValue::from_str("message")) {
        if let Some(s) = message.as_string() {
            return s;
        }
    }
    format!("{value:?}")
}

fn error_name(value: &JsValue) -> Option<String> {
    match Reflect::get(value, &JsValue::from_str("name")) {
        Ok(name) => name.as_string(),
        Err(_) => None,
    }
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

fn log_js(result: Result<(), JsValue>, what: &str) {
    if let Err(e) = result {
        warn!(error = %describe(&e), "{what} failed");
    }
}

fn mouse_input(e: &MouseEvent) -> PointerInput {
    PointerInput::mouse(f64::from(e.client_x()), f64::from(e.client_y()))
}

fn touch_input(e: &TouchEvent) -> PointerInput {
    let list = e.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect();
    PointerInput::touch(touches)
}

fn byte_sequence(image: &RasterImage) -> Array {
    let bytes = Uint8Array::from(image.data.as_slice());
    Array::of1(&bytes)
}

// =============================================================================
// HANDLERS
// =============================================================================

type MouseClosure = Closure<dyn FnMut(MouseEvent)>;
type TouchClosure = Closure<dyn FnMut(TouchEvent)>;

fn on_mouse(weak: &Weak<Shared>, f: fn(&Shared, &PointerInput)) -> MouseClosure {
    let weak = weak.clone();
    Closure::new(move |e: MouseEvent| {
        if let Some(shared) = weak.upgrade() {
            f(&shared, &mouse_input(&e));
        }
    })
}

fn on_touch(weak: &Weak<Shared>, prevent_default: bool, f: fn(&Shared, &PointerInput)) -> TouchClosure {
    let weak = weak.clone();
    Closure::new(move |e: TouchEvent| {
        if prevent_default {
            e.prevent_default();
        }
        if let Some(shared) = weak.upgrade() {
            f(&shared, &touch_input(&e));
        }
    })
}

/// Handlers on the canvas root, attached for the editor's lifetime.
struct RootHandlers {
    mouse_down: MouseClosure,
    touch_start: TouchClosure,
    click: MouseClosure,
}

/// Document-level handlers, attached only while a gesture runs.
struct DocumentHandlers {
    mouse_move: MouseClosure,
    mouse_up: MouseClosure,
    touch_move: TouchClosure,
    touch_end: TouchClosure,
}

// =============================================================================
// SHARED STATE
// =============================================================================

struct Shared {
    core: RefCell<EditorCore>,
    root: HtmlElement,
    document: Document,
    on_render: Function,
    on_action: Function,
    rasterize: Function,
    root_handlers: RootHandlers,
    document_handlers: DocumentHandlers,
    attached: Cell<bool>,
}

impl Shared {
    fn origin(&self) -> Point {
        let rect = self.root.get_bounding_client_rect();
        Point::new(rect.left(), rect.top())
    }

    /// Run one editor operation and dispatch its actions. The core borrow is
    /// released before any JS callback runs.
    fn run(&self, op: impl FnOnce(&mut EditorCore) -> Vec<Action>) {
        let actions = match self.core.try_borrow_mut() {
            Ok(mut core) => op(&mut core),
            Err(_) => {
                warn!("re-entrant editor call ignored");
                return;
            }
        };
        self.dispatch(actions);
    }

    fn pointer(&self, input: &PointerInput, op: fn(&mut EditorCore, &PointerInput) -> Vec<Action>) {
        let origin = self.origin();
        self.run(|core| {
            core.set_origin(origin);
            op(core, input)
        });
    }

    fn pointer_down(&self, input: &PointerInput) {
        self.pointer(input, EditorCore::pointer_down);
    }

    fn pointer_move(&self, input: &PointerInput) {
        self.pointer(input, EditorCore::pointer_move);
    }

    fn pointer_up(&self, _input: &PointerInput) {
        self.run(EditorCore::pointer_up);
    }

    fn click(&self, input: &PointerInput) {
        self.pointer(input, EditorCore::click);
    }

    fn dispatch(&self, actions: Vec<Action>) {
        let mut render = false;
        let mut measure = false;
        for action in actions {
            match action {
                Action::ListenersAcquired(owner) => {
                    debug!(?owner, "attach document listeners");
                    self.attach_document();
                }
                Action::ListenersReleased(owner) => {
                    debug!(?owner, "detach document listeners");
                    self.detach_document();
                }
                Action::RenderNeeded => render = true,
                Action::CaptionMeasureNeeded => measure = true,
                other => self.emit(&other),
            }
        }
        if render {
            self.render();
        }
        if measure {
            self.emit(&Action::CaptionMeasureNeeded);
        }
    }

    fn emit(&self, action: &Action) {
        match serde_json::to_string(action) {
            Ok(json) => log_js(
                self.on_action.call1(&JsValue::NULL, &JsValue::from_str(&json)).map(drop),
                "on_action",
            ),
            Err(e) => warn!(error = %e, "action not serializable"),
        }
    }

    fn render(&self) {
        let json = match self.core.try_borrow() {
            Ok(core) => core.scene().to_json(),
            Err(_) => return,
        };
        match json {
            Ok(json) => log_js(
                self.on_render.call1(&JsValue::NULL, &JsValue::from_str(&json)).map(drop),
                "on_render",
            ),
            Err(e) => warn!(error = %e, "scene not serializable"),
        }
    }

    fn attach_document(&self) {
        if self.attached.replace(true) {
            return;
        }
        let h = &self.document_handlers;
        let doc = &self.document;
        log_js(
            doc.add_event_listener_with_callback("mousemove", h.mouse_move.as_ref().unchecked_ref()),
            "add mousemove",
        );
        log_js(
            doc.add_event_listener_with_callback("mouseup", h.mouse_up.as_ref().unchecked_ref()),
            "add mouseup",
        );
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        log_js(
            doc.add_event_listener_with_callback_and_add_event_listener_options(
                "touchmove",
                h.touch_move.as_ref().unchecked_ref(),
                &options,
            ),
            "add touchmove",
        );
        log_js(
            doc.add_event_listener_with_callback("touchend", h.touch_end.as_ref().unchecked_ref()),
            "add touchend",
        );
    }

    fn detach_document(&self) {
        if !self.attached.replace(false) {
            return;
        }
        let h = &self.document_handlers;
        let doc = &self.document;
        log_js(
            doc.remove_event_listener_with_callback("mousemove", h.mouse_move.as_ref().unchecked_ref()),
            "remove mousemove",
        );
        log_js(
            doc.remove_event_listener_with_callback("mouseup", h.mouse_up.as_ref().unchecked_ref()),
            "remove mouseup",
        );
        log_js(
            doc.remove_event_listener_with_callback("touchmove", h.touch_move.as_ref().unchecked_ref()),
            "remove touchmove",
        );
        log_js(
            doc.remove_event_listener_with_callback("touchend", h.touch_end.as_ref().unchecked_ref()),
            "remove touchend",
        );
    }

    fn attach_root(&self) {
        let h = &self.root_handlers;
        let root = &self.root;
        log_js(
            root.add_event_listener_with_callback("mousedown", h.mouse_down.as_ref().unchecked_ref()),
            "add mousedown",
        );
        log_js(
            root.add_event_listener_with_callback("touchstart", h.touch_start.as_ref().unchecked_ref()),
            "add touchstart",
        );
        log_js(root.add_event_listener_with_callback("click", h.click.as_ref().unchecked_ref()), "add click");
    }

    fn detach_root(&self) {
        let h = &self.root_handlers;
        let root = &self.root;
        log_js(
            root.remove_event_listener_with_callback("mousedown", h.mouse_down.as_ref().unchecked_ref()),
            "remove mousedown",
        );
        log_js(
            root.remove_event_listener_with_callback("touchstart", h.touch_start.as_ref().unchecked_ref()),
            "remove touchstart",
        );
        log_js(root.remove_event_listener_with_callback("click", h.click.as_ref().unchecked_ref()), "remove click");
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.detach_document();
        self.detach_root();
    }
}

// =============================================================================
// EXPORT COLLABORATORS
// =============================================================================

/// Calls the host's `rasterize(root, sceneJson)` and awaits its bytes.
struct JsRasterizer {
    function: Function,
    root: HtmlElement,
}

#[async_trait::async_trait(?Send)]
impl Rasterizer for JsRasterizer {
    async fn rasterize(&self, scene: &Scene) -> Result<RasterImage, ExportError> {
        let json = scene.to_json().map_err(|e| ExportError::Rasterize(e.to_string()))?;
        let returned = self
            .function
            .call2(&JsValue::NULL, &self.root, &JsValue::from_str(&json))
            .map_err(|e| ExportError::Rasterize(describe(&e)))?;
        let value = JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(|e| ExportError::Rasterize(describe(&e)))?;
        let bytes = value
            .dyn_into::<Uint8Array>()
            .map_err(|_| ExportError::Rasterize("rasterize did not resolve to a Uint8Array".into()))?;
        Ok(RasterImage::new(EXPORT_MIME_TYPE, bytes.to_vec()))
    }
}

/// `navigator.share` with a download fallback.
struct NavigatorShare {
    document: Document,
}

impl NavigatorShare {
    fn navigator() -> Option<JsValue> {
        let window = web_sys::window()?;
        Some(window.navigator().into())
    }

    fn method(target: &JsValue, name: &str) -> Option<Function> {
        match Reflect::get(target, &JsValue::from_str(name)) {
            Ok(value) => value.dyn_ref::<Function>().cloned(),
            Err(_) => None,
        }
    }

    fn share_data(image: &RasterImage, meta: &ShareMeta) -> Result<Object, JsValue> {
        let options = FilePropertyBag::new();
        options.set_type(&image.mime_type);
        let file = File::new_with_u8_array_sequence_and_options(&byte_sequence(image), &meta.filename, &options)?;
        let data = Object::new();
        Reflect::set(&data, &JsValue::from_str("files"), &Array::of1(&file))?;
        Reflect::set(&data, &JsValue::from_str("title"), &JsValue::from_str(&meta.title))?;
        Reflect::set(&data, &JsValue::from_str("text"), &JsValue::from_str(&meta.text))?;
        Ok(data)
    }

    fn save(&self, image: &RasterImage, filename: &str) -> Result<(), JsValue> {
        let options = BlobPropertyBag::new();
        options.set_type(&image.mime_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&byte_sequence(image), &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;
        let anchor = self.document.create_element("a")?.dyn_into::<HtmlAnchorElement>()?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();
        Url::revoke_object_url(&url)
    }
}

#[async_trait::async_trait(?Send)]
impl ShareTarget for NavigatorShare {
    fn can_share(&self, image: &RasterImage, meta: &ShareMeta) -> bool {
        let Some(navigator) = Self::navigator() else {
            return false;
        };
        let (Some(can_share), Some(_)) = (Self::method(&navigator, "canShare"), Self::method(&navigator, "share"))
        else {
            return false;
        };
        let Ok(data) = Self::share_data(image, meta) else {
            return false;
        };
        match can_share.call1(&navigator, &data) {
            Ok(answer) => answer.as_bool().unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn share(&self, image: &RasterImage, meta: &ShareMeta) -> Result<(), ShareError> {
        let navigator = Self::navigator().ok_or_else(|| ShareError::Failed("no navigator".into()))?;
        let share = Self::method(&navigator, "share").ok_or_else(|| ShareError::Failed("share unsupported".into()))?;
        let data = Self::share_data(image, meta).map_err(|e| ShareError::Failed(describe(&e)))?;
        let promise = share.call1(&navigator, &data).map_err(|e| ShareError::Failed(describe(&e)))?;
        match JsFuture::from(Promise::resolve(&promise)).await {
            Ok(_) => Ok(()),
            Err(e) if error_name(&e).as_deref() == Some("AbortError") => Err(ShareError::Cancelled),
            Err(e) => Err(ShareError::Failed(describe(&e))),
        }
    }

    fn download(&self, image: &RasterImage, filename: &str) -> Result<(), ExportError> {
        self.save(image, filename).map_err(|e| ExportError::Download(describe(&e)))
    }
}

// =============================================================================
// WEB EDITOR
// =============================================================================

/// The postcard editor bound to a DOM root.
#[wasm_bindgen]
pub struct WebEditor {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Build an editor on `root`.
    ///
    /// `config_json` may be omitted for defaults. `progress_json` is the
    /// unlock-progress object that decides which stickers the palette offers.
    ///
    /// # Errors
    ///
    /// Throws if the config is invalid or the root has no owning document.
    #[wasm_bindgen(constructor)]
    pub fn new(
        root: HtmlElement,
        config_json: Option<String>,
        progress_json: Option<String>,
        on_render: Function,
        on_action: Function,
        rasterize: Function,
    ) -> Result<WebEditor, JsValue> {
        let config = match config_json.as_deref() {
            Some(raw) => EditorConfig::from_json(raw),
            None => Ok(EditorConfig::default()),
        }
        .map_err(|e| js_error(&e.to_string()))?;
        let inventory = UnlockInventory::from_progress_json(&default_catalog(), progress_json.as_deref());
        let core = EditorCore::new(config, Box::new(inventory)).map_err(|e| js_error(&e.to_string()))?;
        let document = root.owner_document().ok_or_else(|| js_error("root element has no document"))?;

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| Shared {
            core: RefCell::new(core),
            root,
            document,
            on_render,
            on_action,
            rasterize,
            root_handlers: RootHandlers {
                mouse_down: on_mouse(weak, Shared::pointer_down),
                touch_start: on_touch(weak, false, Shared::pointer_down),
                click: on_mouse(weak, Shared::click),
            },
            document_handlers: DocumentHandlers {
                mouse_move: on_mouse(weak, Shared::pointer_move),
                mouse_up: on_mouse(weak, Shared::pointer_up),
                touch_move: on_touch(weak, true, Shared::pointer_move),
                touch_end: on_touch(weak, false, Shared::pointer_up),
            },
            attached: Cell::new(false),
        });
        shared.attach_root();
        info!("postcard editor ready");
        shared.render();
        Ok(WebEditor { shared })
    }

    #[wasm_bindgen(js_name = chooseTemplate)]
    pub fn choose_template(&self, id: &str) {
        self.shared.run(|core| core.choose_template(id).unwrap_or_else(|e| notice(&e)));
    }

    #[wasm_bindgen(js_name = insertPhoto)]
    pub fn insert_photo(&self, url: &str) {
        self.shared.run(|core| core.insert_photo(AssetRef::new(url)).unwrap_or_else(|e| notice(&e)));
    }

    #[wasm_bindgen(js_name = nextStep)]
    pub fn next_step(&self) {
        self.shared.run(EditorCore::next_step);
    }

    #[wasm_bindgen(js_name = prevStep)]
    pub fn prev_step(&self) {
        self.shared.run(EditorCore::prev_step);
    }

    /// Current step number, 1 through 5.
    #[must_use]
    pub fn step(&self) -> u8 {
        self.current_step().number()
    }

    /// Display name of the current step.
    #[wasm_bindgen(js_name = stepLabel)]
    #[must_use]
    pub fn step_label(&self) -> String {
        self.current_step().label().to_string()
    }

    /// `true` on the first step, where the back control is disabled.
    #[wasm_bindgen(js_name = isFirstStep)]
    #[must_use]
    pub fn is_first_step(&self) -> bool {
        self.current_step().is_first()
    }

    /// `true` on the final step, where the next control is disabled.
    #[wasm_bindgen(js_name = isLastStep)]
    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current_step().is_last()
    }

    /// Sticker assets the palette offers, as a JSON array of paths.
    ///
    /// # Errors
    ///
    /// Throws if the editor is busy.
    pub fn palette(&self) -> Result<String, JsValue> {
        let core = self.shared.core.try_borrow().map_err(|_| js_error("editor busy"))?;
        serde_json::to_string(core.palette()).map_err(|e| js_error(&e.to_string()))
    }

    #[wasm_bindgen(js_name = addSticker)]
    pub fn add_sticker(&self, asset: &str) {
        self.shared.run(|core| core.add_sticker(AssetRef::new(asset)));
    }

    /// # Errors
    ///
    /// Throws if `id` is not a UUID.
    #[wasm_bindgen(js_name = deleteSticker)]
    pub fn delete_sticker(&self, id: &str) -> Result<(), JsValue> {
        let id = Uuid::parse_str(id).map_err(|e| js_error(&e.to_string()))?;
        self.shared.run(|core| core.delete_element(&id));
        Ok(())
    }

    #[wasm_bindgen(js_name = setCaptionText)]
    pub fn set_caption_text(&self, text: &str) {
        self.shared.run(|core| core.set_caption_text(text));
    }

    /// # Errors
    ///
    /// Throws if `font` is not one of the caption fonts.
    #[wasm_bindgen(js_name = setCaptionFont)]
    pub fn set_caption_font(&self, font: &str) -> Result<(), JsValue> {
        let font = font.parse::<CaptionFont>().map_err(|e| js_error(&e.to_string()))?;
        self.shared.run(|core| core.set_caption_font(font));
        Ok(())
    }

    #[wasm_bindgen(js_name = setCaptionExtent)]
    pub fn set_caption_extent(&self, width: f64, height: f64) {
        self.shared.run(|core| {
            core.set_caption_extent(width, height);
            Vec::new()
        });
    }

    /// Current scene as JSON.
    ///
    /// # Errors
    ///
    /// Throws if the editor is busy.
    #[wasm_bindgen(js_name = sceneJson)]
    pub fn scene_json(&self) -> Result<String, JsValue> {
        let core = self.shared.core.try_borrow().map_err(|_| js_error("editor busy"))?;
        core.scene().to_json().map_err(|e| js_error(&e.to_string()))
    }

    /// Rasterize the final card and share or download it. The outcome (or a
    /// notice) arrives through `on_action`; the promise itself always resolves
    /// unless the editor is busy.
    #[must_use]
    pub fn export(&self) -> Promise {
        let shared = Rc::clone(&self.shared);
        future_to_promise(async move {
            let job = match shared.core.try_borrow() {
                Ok(core) => core.prepare_export(),
                Err(_) => return Err(js_error("editor busy")),
            };
            let rasterizer = JsRasterizer { function: shared.rasterize.clone(), root: shared.root.clone() };
            let target = NavigatorShare { document: shared.document.clone() };
            let actions = job.run(&rasterizer, &target).await;
            shared.dispatch(actions);
            Ok(JsValue::UNDEFINED)
        })
    }
}

impl WebEditor {
    fn current_step(&self) -> Step {
        match self.shared.core.try_borrow() {
            Ok(core) => core.step(),
            Err(_) => Step::default(),
        }
    }
}

fn notice(err: &EditorError) -> Vec<Action> {
    vec![Action::Notice(Notice::from_error(err))]
}
