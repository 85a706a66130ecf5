//! Postcard collage editor.
//!
//! The user picks a background template, drops a photo into its slot, then
//! places, drags, resizes and rotates decorative stickers on top, adds a
//! free-text caption, and finally exports the flattened card as a PNG. The
//! crate compiles to WebAssembly for the browser; everything except the
//! [`web`] host module is DOM-free and tested natively through
//! [`engine::EditorCore`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editor facade [`engine::EditorCore`] and the [`engine::Action`]s it returns |
//! | [`web`] | Browser host: DOM listeners, JS rasterizer, share/download |
//! | [`store`] | Placed stickers, ids, z-order |
//! | [`input`] | Drag/resize/rotate state machine and the listener slot |
//! | [`pointer`] | Mouse and touch events reduced to one sample |
//! | [`hit`] | Hit-testing stickers, handles and the delete control |
//! | [`selection`] | The single active sticker |
//! | [`caption`] | Caption text, font and absolute drag |
//! | [`wizard`] | The five editor steps |
//! | [`render`] | Deterministic layer stack ([`render::Scene`]) |
//! | [`export`] | Rasterize, then share or download |
//! | [`inventory`] | Sticker assets offered in the palette |
//! | [`template`] | Background templates and their photo slots |
//! | [`config`] | JSON editor configuration |
//! | [`error`] | Error codes and user-visible notices |
//! | [`geometry`] | Points, boxes and angle math |
//! | [`consts`] | Shared numeric constants |

pub mod caption;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod export;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod inventory;
pub mod pointer;
pub mod render;
pub mod selection;
pub mod store;
pub mod template;
pub mod web;
pub mod wizard;
