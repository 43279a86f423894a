#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageFormat, Rgba, RgbaImage};
use uvfx::{
    BlendFunction, ColorSpace, DrawPass, Graphics, GraphicsError, Host, ModuleRegistry,
    OverlayFilter, Settings, Technique, TextureDesc, EFFECT_FILE,
};

pub const MS: u64 = 1_000_000;

pub type TestFilter = OverlayFilter<Arc<FakeHost>, Arc<FakeGraphics>>;

pub struct FakeHost {
    pub showing: AtomicBool,
    pub clock: AtomicU64,
    pub target_space: Mutex<ColorSpace>,
    pub persisted: Mutex<Vec<Settings>>,
}

impl FakeHost {
    pub fn new(showing: bool) -> Arc<Self> {
        Arc::new(Self {
            showing: AtomicBool::new(showing),
            clock: AtomicU64::new(1_000 * MS),
            target_space: Mutex::new(ColorSpace::Srgb),
            persisted: Mutex::new(Vec::new()),
        })
    }

    pub fn set_showing(&self, showing: bool) {
        self.showing.store(showing, Ordering::SeqCst);
    }

    pub fn advance_clock(&self, nanos: u64) {
        self.clock.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl Host for FakeHost {
    fn name(&self) -> String {
        String::from("test source")
    }

    fn showing(&self) -> bool {
        self.showing.load(Ordering::SeqCst)
    }

    fn video_frame_time(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }

    fn sdr_white_level(&self) -> f32 {
        300.0
    }

    fn target_size(&self) -> (u32, u32) {
        (1920, 1080)
    }

    fn target_color_space(&self, preferred: &[ColorSpace]) -> ColorSpace {
        assert_eq!(preferred.first(), Some(&ColorSpace::Srgb));
        *self.target_space.lock().unwrap()
    }

    fn persist_settings(&self, settings: &Settings) {
        self.persisted.lock().unwrap().push(settings.clone());
    }
}

/// Texture handle that tracks how many textures are alive.
#[derive(Debug)]
pub struct FakeTexture {
    pub id: usize,
    pub desc: TextureDesc,
    live: Arc<AtomicUsize>,
}

impl Drop for FakeTexture {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub technique: Technique,
    pub multiplier: f32,
    pub texture: usize,
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub blend: BlendFunction,
}

pub struct FakeGraphics {
    pub created: AtomicUsize,
    pub live: Arc<AtomicUsize>,
    pub fail_creates: AtomicUsize,
    pub fail_effect: AtomicBool,
    pub working_space: Mutex<ColorSpace>,
    pub descs: Mutex<Vec<TextureDesc>>,
    pub updates: Mutex<Vec<(usize, Vec<u8>)>>,
    pub draws: Mutex<Vec<DrawRecord>>,
}

impl FakeGraphics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            created: AtomicUsize::new(0),
            live: Arc::new(AtomicUsize::new(0)),
            fail_creates: AtomicUsize::new(0),
            fail_effect: AtomicBool::new(false),
            working_space: Mutex::new(ColorSpace::Srgb),
            descs: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            draws: Mutex::new(Vec::new()),
        })
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

impl Graphics for FakeGraphics {
    type Texture = FakeTexture;
    type Effect = ();

    fn load_effect(&self, path: &Path) -> Result<(), GraphicsError> {
        if self.fail_effect.load(Ordering::SeqCst) {
            return Err(GraphicsError::Effect {
                path: path.to_path_buf(),
                reason: String::from("syntax error"),
            });
        }
        Ok(())
    }

    fn create_texture(
        &self,
        desc: &TextureDesc,
        pixels: &[u8],
    ) -> Result<FakeTexture, GraphicsError> {
        assert_eq!(pixels.len(), desc.byte_len());
        let pending_failures = self.fail_creates.load(Ordering::SeqCst);
        if pending_failures > 0 {
            self.fail_creates.store(pending_failures - 1, Ordering::SeqCst);
            return Err(GraphicsError::Texture(String::from("out of memory")));
        }
        self.descs.lock().unwrap().push(*desc);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(FakeTexture {
            id: self.created.fetch_add(1, Ordering::SeqCst),
            desc: *desc,
            live: Arc::clone(&self.live),
        })
    }

    fn update_texture(&self, texture: &FakeTexture, pixels: &[u8]) -> Result<(), GraphicsError> {
        assert_eq!(pixels.len(), texture.desc.byte_len());
        self.updates
            .lock()
            .unwrap()
            .push((texture.id, pixels.to_vec()));
        Ok(())
    }

    fn working_color_space(&self) -> ColorSpace {
        *self.working_space.lock().unwrap()
    }

    fn draw(&self, _effect: &(), pass: &DrawPass<'_, FakeTexture>) -> Result<(), GraphicsError> {
        self.draws.lock().unwrap().push(DrawRecord {
            technique: pass.technique,
            multiplier: pass.multiplier,
            texture: pass.texture.id,
            width: pass.width,
            height: pass.height,
            color_space: pass.color_space,
            blend: pass.blend,
        });
        Ok(())
    }
}

pub fn registry(dir: &Path) -> ModuleRegistry {
    let data_dir = dir.join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join(EFFECT_FILE), "// overlay effect").unwrap();
    ModuleRegistry::load(data_dir)
}

pub fn settings_for(path: &Path) -> Settings {
    Settings {
        file: path.to_string_lossy().into_owned(),
        ..Settings::default()
    }
}

pub fn create(
    dir: &Path,
    settings: Settings,
    host: &Arc<FakeHost>,
    graphics: &Arc<FakeGraphics>,
) -> Arc<TestFilter> {
    OverlayFilter::create(
        &registry(dir),
        settings,
        Arc::clone(host),
        Arc::clone(graphics),
    )
    .unwrap()
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

pub fn write_gif(path: &Path, frames: usize, delay_ms: u32, repeat: Repeat) {
    let palette = [
        [255, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
        [255, 255, 0, 255],
    ];
    let mut buf = Vec::new();
    {
        let mut encoder = GifEncoder::new(Cursor::new(&mut buf));
        encoder.set_repeat(repeat).unwrap();
        encoder
            .encode_frames((0..frames).map(|index| {
                Frame::from_parts(
                    RgbaImage::from_pixel(4, 4, Rgba(palette[index % palette.len()])),
                    0,
                    0,
                    Delay::from_numer_denom_ms(delay_ms, 1),
                )
            }))
            .unwrap();
    }
    std::fs::write(path, buf).unwrap();
}

/// Pushes the file's modification time forward so a poll sees a change even
/// on filesystems with coarse timestamps.
pub fn touch_later(path: &Path, seconds: u64) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(seconds))
        .unwrap();
}
