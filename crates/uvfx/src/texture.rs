use crate::color::ColorSpace;
use crate::graphics::{Graphics, GraphicsError};
use crate::image_state::ImageState;

/// GPU copy of the displayed frame. Only touched from the GPU-owning context.
pub struct TextureCache<G: Graphics> {
    texture: Option<G::Texture>,
    color_space: ColorSpace,
}

impl<G: Graphics> Default for TextureCache<G> {
    fn default() -> Self {
        Self {
            texture: None,
            color_space: ColorSpace::Srgb,
        }
    }
}

impl<G: Graphics> TextureCache<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any existing texture with one holding the image's current frame.
    pub fn upload(&mut self, graphics: &G, image: &ImageState) -> Result<(), GraphicsError> {
        self.release();
        let texture = graphics.create_texture(&image.texture_desc(), image.current_pixels())?;
        self.texture = Some(texture);
        self.color_space = image.color_space();
        Ok(())
    }

    /// Rewrites the texture contents with the image's current frame.
    pub fn refresh_frame(&self, graphics: &G, image: &ImageState) -> Result<(), GraphicsError> {
        match &self.texture {
            Some(texture) => graphics.update_texture(texture, image.current_pixels()),
            None => Ok(()),
        }
    }

    /// Drops the texture. Returns whether one was held.
    pub fn release(&mut self) -> bool {
        self.texture.take().is_some()
    }

    pub fn texture(&self) -> Option<&G::Texture> {
        self.texture.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.texture.is_some()
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }
}
