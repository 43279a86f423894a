//! The slice of the host GPU layer the filter relies on.
//!
//! Texture handles and compiled effects are opaque to the core. Every method
//! here must be called from the GPU-owning context; the filter only does so
//! from `tick`, `render`, and `destroy`.

use std::path::{Path, PathBuf};

use crate::color::{ColorFormat, ColorSpace, Technique};

/// Effect parameter the overlay texture is bound to.
pub const TEXTURE_PARAM: &str = "uv_texture";
/// Effect parameter receiving the technique's brightness multiplier.
pub const MULTIPLIER_PARAM: &str = "multiplier";

#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    #[error("failed to load effect {}: {reason}", path.display())]
    Effect { path: PathBuf, reason: String },
    #[error("texture operation failed: {0}")]
    Texture(String),
    #[error("draw failed: {0}")]
    Draw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Source/destination factors for colour blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendFunction {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl BlendFunction {
    /// Standard "over" compositing with straight alpha.
    pub const ALPHA_OVER: Self = Self {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };
}

/// Shape of a texture created from decoded pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    /// Pixels are tightly packed RGBA8, premultiplied.
    pub format: ColorFormat,
    /// Sample through an sRGB view so the shader sees linear values.
    pub srgb: bool,
}

impl TextureDesc {
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// One filtered draw of the overlay over the filter target.
#[derive(Debug)]
pub struct DrawPass<'a, T> {
    pub technique: Technique,
    pub multiplier: f32,
    pub texture: &'a T,
    /// Base size of the filter target.
    pub width: u32,
    pub height: u32,
    /// Space the filter target is processed in.
    pub color_space: ColorSpace,
    pub format: ColorFormat,
    pub blend: BlendFunction,
}

/// GPU operations the filter needs from its host.
pub trait Graphics: Send + Sync {
    type Texture: Send;
    type Effect: Send + Sync;

    /// Compiles the effect program at `path`.
    fn load_effect(&self, path: &Path) -> Result<Self::Effect, GraphicsError>;

    /// Creates a texture and fills it with `pixels`. Dropping the returned
    /// handle releases it.
    fn create_texture(
        &self,
        desc: &TextureDesc,
        pixels: &[u8],
    ) -> Result<Self::Texture, GraphicsError>;

    /// Replaces the full contents of an existing texture.
    fn update_texture(&self, texture: &Self::Texture, pixels: &[u8]) -> Result<(), GraphicsError>;

    /// Space of the render target currently bound by the host.
    fn working_color_space(&self) -> ColorSpace;

    fn draw(
        &self,
        effect: &Self::Effect,
        pass: &DrawPass<'_, Self::Texture>,
    ) -> Result<(), GraphicsError>;
}

impl<T: Graphics> Graphics for std::sync::Arc<T> {
    type Texture = T::Texture;
    type Effect = T::Effect;

    fn load_effect(&self, path: &Path) -> Result<Self::Effect, GraphicsError> {
        (**self).load_effect(path)
    }

    fn create_texture(
        &self,
        desc: &TextureDesc,
        pixels: &[u8],
    ) -> Result<Self::Texture, GraphicsError> {
        (**self).create_texture(desc, pixels)
    }

    fn update_texture(&self, texture: &Self::Texture, pixels: &[u8]) -> Result<(), GraphicsError> {
        (**self).update_texture(texture, pixels)
    }

    fn working_color_space(&self) -> ColorSpace {
        (**self).working_color_space()
    }

    fn draw(
        &self,
        effect: &Self::Effect,
        pass: &DrawPass<'_, Self::Texture>,
    ) -> Result<(), GraphicsError> {
        (**self).draw(effect, pass)
    }
}
