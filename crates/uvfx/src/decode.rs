//! Image decoding, kept free of any GPU work so it can run on whichever
//! context triggers a load.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat};

use crate::animation::{LoopLimit, DEFAULT_FRAME_DELAY_NS};
use crate::image_state::ImageState;

/// How decoded colour is combined with alpha before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    /// Multiply the gamma-encoded channel values by alpha.
    #[default]
    Premultiply,
    /// Multiply in linear light and re-encode; sampled through an sRGB view.
    PremultiplyLinear,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("animated image contains no frames")]
    NoFrames,
    #[error("frame holds {actual} bytes, expected {expected} for {width}x{height}")]
    FrameSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Turns an image file into an [`ImageState`].
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path, alpha_mode: AlphaMode) -> Result<ImageState, DecodeError>;
}

/// Decoder backed by the `image` crate. GIFs keep every composited frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path, alpha_mode: AlphaMode) -> Result<ImageState, DecodeError> {
        let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image_err = |source| DecodeError::Image {
            path: path.to_path_buf(),
            source,
        };

        // TGA has no magic bytes, so an unrecognised header falls back to the
        // file extension.
        let format = image::guess_format(&bytes)
            .or_else(|err| ImageFormat::from_path(path).map_err(|_| err))
            .map_err(image_err)?;
        if format == ImageFormat::Gif {
            return decode_gif(&bytes, alpha_mode).map_err(|err| match err {
                GifFailure::Image(source) => image_err(source),
                GifFailure::State(err) => err,
            });
        }

        let decoded = image::load_from_memory_with_format(&bytes, format).map_err(image_err)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut pixels = rgba.into_raw();
        premultiply(&mut pixels, alpha_mode);
        tracing::debug!(path = %path.display(), width, height, ?format, "decoded still image");
        ImageState::still(width, height, pixels, alpha_mode)
    }
}

enum GifFailure {
    Image(image::ImageError),
    State(DecodeError),
}

fn decode_gif(bytes: &[u8], alpha_mode: AlphaMode) -> Result<ImageState, GifFailure> {
    let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(GifFailure::Image)?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(GifFailure::Image)?;

    let Some(first) = frames.first() else {
        return Err(GifFailure::State(DecodeError::NoFrames));
    };
    let (width, height) = first.buffer().dimensions();

    let frames = frames
        .into_iter()
        .map(|frame| {
            let delay = frame_delay_ns(frame.delay());
            let mut pixels = frame.into_buffer().into_raw();
            premultiply(&mut pixels, alpha_mode);
            (pixels, delay)
        })
        .collect::<Vec<_>>();

    let limit = gif_loop_limit(bytes).map_err(|err| {
        GifFailure::Image(image::ImageError::Decoding(image::error::DecodingError::new(
            ImageFormat::Gif.into(),
            err,
        )))
    })?;
    tracing::debug!(
        width,
        height,
        frames = frames.len(),
        ?limit,
        "decoded gif"
    );
    ImageState::animated(width, height, frames, limit, alpha_mode).map_err(GifFailure::State)
}

fn frame_delay_ns(delay: image::Delay) -> u64 {
    let (numer, denom) = delay.numer_denom_ms();
    if denom == 0 || numer == 0 {
        return DEFAULT_FRAME_DELAY_NS;
    }
    u64::from(numer) * 1_000_000 / u64::from(denom)
}

/// Walks the block structure for the loop-count application extension. The
/// extension may sit ahead of any frame, so every frame header is visited.
fn gif_loop_limit(bytes: &[u8]) -> Result<LoopLimit, gif::DecodingError> {
    let mut decoder = gif::DecodeOptions::new().read_info(bytes)?;
    while decoder.next_frame_info()?.is_some() {}
    Ok(LoopLimit::from_gif(decoder.repeat()))
}

/// Applies `alpha_mode` premultiplication to tightly packed RGBA8 pixels.
pub fn premultiply(rgba: &mut [u8], alpha_mode: AlphaMode) {
    match alpha_mode {
        AlphaMode::Premultiply => premultiply_encoded(rgba),
        AlphaMode::PremultiplyLinear => premultiply_linear(rgba),
    }
}

fn premultiply_encoded(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn premultiply_linear(rgba: &mut [u8]) {
    let to_linear = srgb_to_linear_table();
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        let alpha = f32::from(a) / 255.0;
        for channel in &mut px[..3] {
            *channel = linear_to_srgb(to_linear[*channel as usize] * alpha);
        }
    }
}

fn srgb_to_linear_table() -> &'static [f32; 256] {
    static TABLE: OnceLock<[f32; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        std::array::from_fn(|value| {
            let c = value as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        })
    })
}

/// Encodes a linear-light channel as 8-bit sRGB, clamping out-of-range input.
pub fn linear_to_srgb(linear: f32) -> u8 {
    let linear = linear.clamp(0.0, 1.0);
    let encoded = if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}
