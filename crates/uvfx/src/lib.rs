//! Core of the UVFX overlay filter.
//!
//! A filter instance lays a static image or animated GIF over the frame of the
//! source it is attached to. The host drives it from two contexts:
//!
//! ```text
//!   control context                          render context
//!   update_settings / show / hide            tick(seconds)            render()
//!          │                                      │                      │
//!          ▼                                      ▼                      ▼
//!   ImageDecoder::decode ──Handoff──▶ drain ─▶ TextureCache::upload ─▶ select_technique
//!          │                                      │                      │
//!          └─ decoded = true          texture_ready = true         Graphics::draw
//! ```
//!
//! The decode step never touches the GPU and the render context never waits on
//! a decode: the `decoded` and `texture_ready` gates are atomics, and decoded
//! images cross over a channel. Every tick also polls the file's modification
//! time once per second while shown and feeds the host clock into the GIF
//! [`Animation`].
//!
//! The host side is abstract: [`Host`] answers visibility, clock and target
//! queries, [`Graphics`] creates textures and draws with the loaded effect.

pub mod animation;
pub mod color;
pub mod decode;
mod error;
pub mod filter;
pub mod graphics;
mod host;
pub mod image_state;
mod missing;
pub mod properties;
pub mod registry;
mod settings;
pub mod texture;
pub mod watcher;

pub use animation::{Animation, LoopLimit};
pub use color::{select_technique, ColorFormat, ColorSpace, Technique, TechniqueChoice};
pub use decode::{AlphaMode, DecodeError, FileDecoder, ImageDecoder};
pub use error::FilterError;
pub use filter::{FilterSource, OverlayFilter};
pub use graphics::{
    BlendFactor, BlendFunction, DrawPass, Graphics, GraphicsError, TextureDesc, MULTIPLIER_PARAM,
    TEXTURE_PARAM,
};
pub use host::Host;
pub use image_state::ImageState;
pub use missing::{MissingFile, MissingFileKind};
pub use properties::{Properties, Property};
pub use registry::{ModuleRegistry, SourceInfo, EFFECT_FILE, OVERLAY_SOURCE};
pub use settings::{default_settings, Settings};
