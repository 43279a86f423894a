use crate::animation::{Animation, LoopLimit};
use crate::color::{ColorFormat, ColorSpace};
use crate::decode::{AlphaMode, DecodeError};
use crate::graphics::TextureDesc;

/// Decoded image held in memory between decode and GPU upload.
///
/// Every frame is a full `width * height` RGBA8 buffer with premultiplied
/// alpha. Still images carry exactly one frame and no animation clock.
#[derive(Debug, Clone)]
pub struct ImageState {
    width: u32,
    height: u32,
    frames: Vec<Vec<u8>>,
    animation: Option<Animation>,
    alpha_mode: AlphaMode,
    color_space: ColorSpace,
    mem_usage: u64,
}

impl ImageState {
    pub fn still(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        alpha_mode: AlphaMode,
    ) -> Result<Self, DecodeError> {
        check_frame(width, height, &pixels)?;
        let mem_usage = pixels.len() as u64;
        Ok(Self {
            width,
            height,
            frames: vec![pixels],
            animation: None,
            alpha_mode,
            color_space: ColorSpace::Srgb,
            mem_usage,
        })
    }

    /// Builds an animated image. A single frame degrades to a still image.
    pub fn animated(
        width: u32,
        height: u32,
        frames: Vec<(Vec<u8>, u64)>,
        limit: LoopLimit,
        alpha_mode: AlphaMode,
    ) -> Result<Self, DecodeError> {
        if frames.is_empty() {
            return Err(DecodeError::NoFrames);
        }
        for (pixels, _) in &frames {
            check_frame(width, height, pixels)?;
        }

        let (buffers, delays): (Vec<Vec<u8>>, Vec<u64>) = frames.into_iter().unzip();
        if buffers.len() == 1 {
            let pixels = buffers.into_iter().next().unwrap_or_default();
            return Self::still(width, height, pixels, alpha_mode);
        }

        let mem_usage = buffers.iter().map(|frame| frame.len() as u64).sum();
        Ok(Self {
            width,
            height,
            frames: buffers,
            animation: Some(Animation::new(delays, limit)),
            alpha_mode,
            color_space: ColorSpace::Srgb,
            mem_usage,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_frame(&self) -> usize {
        self.animation
            .as_ref()
            .map_or(0, |animation| animation.current_frame())
    }

    /// Pixels of the frame that should currently be on screen.
    pub fn current_pixels(&self) -> &[u8] {
        &self.frames[self.current_frame()]
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Bytes held by the decoded frame buffers.
    pub fn mem_usage(&self) -> u64 {
        self.mem_usage
    }

    pub fn texture_desc(&self) -> TextureDesc {
        TextureDesc {
            width: self.width,
            height: self.height,
            format: ColorFormat::Rgba8,
            srgb: self.alpha_mode == AlphaMode::PremultiplyLinear,
        }
    }

    /// Advances the animation clock; false for still images.
    pub fn advance(&mut self, elapsed_ns: u64) -> bool {
        self.animation
            .as_mut()
            .is_some_and(|animation| animation.advance(elapsed_ns))
    }

    /// Rewinds the animation; false for still images.
    pub fn restart(&mut self) -> bool {
        match self.animation.as_mut() {
            Some(animation) => {
                animation.restart();
                true
            }
            None => false,
        }
    }
}

fn check_frame(width: u32, height: u32, pixels: &[u8]) -> Result<(), DecodeError> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(DecodeError::FrameSize {
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}
