//! wgpu backend for the UVFX overlay filter.
//!
//! The filter core only speaks the [`uvfx::Graphics`] trait. This crate
//! implements it on a headless wgpu device so the filter can run outside a
//! compositing host:
//!
//! ```text
//!   GpuContext::new_headless ──▶ WgpuGraphics ──▶ Canvas (offscreen target)
//!                                     │
//!          load_effect ──▶ EffectProgram (data/uvfx.wgsl, one pipeline per
//!                                     │   technique × target format)
//!          create_texture ──▶ GpuTexture (RGBA8 + sRGB view)
//!                                     │
//!          draw ──▶ render pass over the canvas ──▶ read_canvas() ─▶ RgbaImage
//! ```
//!
//! 8-bit sRGB canvases blend in gamma space unless the overlay texture asks
//! for linear sampling; half-float canvases always blend in linear light.

mod canvas;
mod context;
mod effect;
mod graphics;
mod texture;

pub use canvas::Canvas;
pub use context::{AdapterProfile, GpuContext, GpuPowerPreference};
pub use effect::EffectProgram;
pub use graphics::WgpuGraphics;
pub use texture::GpuTexture;

/// Directory holding the bundled effect source.
pub const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");
