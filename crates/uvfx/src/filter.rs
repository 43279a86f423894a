//! The overlay filter state machine.
//!
//! Two host contexts drive an instance. The control context (settings,
//! visibility, destroy) decodes images; the render context (`tick`, `render`)
//! owns every GPU resource. Decoded images travel to the render context over a
//! hand-off channel, and the `decoded` / `texture_ready` gates tell each side
//! what the other has finished. Each load bumps a generation counter so that an
//! upload racing a newer load never publishes a stale texture.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError, Weak};
use std::time::SystemTime;

use crossbeam_channel::{Receiver, Sender};

use crate::color::{select_technique, ColorSpace, PREFERRED_TARGET_SPACES};
use crate::decode::{AlphaMode, FileDecoder, ImageDecoder};
use crate::error::FilterError;
use crate::graphics::{BlendFunction, DrawPass, Graphics};
use crate::host::Host;
use crate::image_state::ImageState;
use crate::missing::{MissingFile, MissingFileKind};
use crate::properties::{self, Properties};
use crate::registry::{ModuleRegistry, EFFECT_FILE};
use crate::settings::{self, Settings};
use crate::texture::TextureCache;
use crate::watcher::{modified_timestamp, PollTimer};

/// Callback surface the host invokes on a filter instance.
pub trait FilterSource: Send + Sync {
    /// Display name of the filter type.
    fn name(&self) -> &'static str;
    fn update_settings(&self, settings: Settings);
    fn show(&self);
    fn hide(&self);
    fn activate(&self);
    fn tick(&self, seconds: f32);
    fn render(&self);
    /// Releases the texture and decoded image. Render and tick must have
    /// stopped for this instance.
    fn destroy(&self);
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn preferred_color_space(&self) -> ColorSpace;
    fn memory_usage(&self) -> u64;
    fn missing_files(self: &Arc<Self>) -> Vec<MissingFile>;
    fn properties(&self) -> Properties;
}

/// Messages from the control context to the render context.
enum Handoff {
    Release {
        generation: u64,
    },
    Decoded {
        generation: u64,
        path: PathBuf,
        image: Box<ImageState>,
    },
}

/// At most one release and one decoded image are in flight.
const HANDOFF_CAPACITY: usize = 2;

/// Fields written by the control context.
#[derive(Debug, Default)]
struct Control {
    settings: Settings,
    path: String,
    persistent: bool,
    is_slide: bool,
    alpha_mode: AlphaMode,
    last_mod_time: Option<SystemTime>,
}

/// Fields only the render context touches.
struct RenderState<G: Graphics> {
    image: Option<ImageState>,
    path: PathBuf,
    generation: u64,
    textures: TextureCache<G>,
    poll: PollTimer,
    /// Host clock at the previous tick; `0` means no baseline.
    last_frame_clock: u64,
    active: bool,
}

impl<G: Graphics> Default for RenderState<G> {
    fn default() -> Self {
        Self {
            image: None,
            path: PathBuf::new(),
            generation: 0,
            textures: TextureCache::new(),
            poll: PollTimer::new(),
            last_frame_clock: 0,
            active: false,
        }
    }
}

pub struct OverlayFilter<H: Host, G: Graphics> {
    host: H,
    graphics: G,
    effect: G::Effect,
    decoder: Box<dyn ImageDecoder>,

    generation: AtomicU64,
    decoded: AtomicBool,
    texture_ready: AtomicBool,
    load_failed: AtomicBool,
    pending_restart: AtomicBool,

    width: AtomicU32,
    height: AtomicU32,
    mem_usage: AtomicU64,
    color_space: AtomicU8,

    control: Mutex<Control>,
    render: Mutex<RenderState<G>>,
    handoff_tx: Sender<Handoff>,
    handoff_rx: Receiver<Handoff>,
}

impl<H: Host + 'static, G: Graphics + 'static> OverlayFilter<H, G> {
    pub fn create(
        registry: &ModuleRegistry,
        settings: Settings,
        host: H,
        graphics: G,
    ) -> Result<Arc<Self>, FilterError> {
        Self::create_with_decoder(registry, settings, host, graphics, Box::new(FileDecoder))
    }

    /// Loads the effect and applies the initial settings. Fails only when the
    /// effect is missing or does not compile.
    pub fn create_with_decoder(
        registry: &ModuleRegistry,
        settings: Settings,
        host: H,
        graphics: G,
        decoder: Box<dyn ImageDecoder>,
    ) -> Result<Arc<Self>, FilterError> {
        let Some(effect_path) = registry.module_file(EFFECT_FILE) else {
            tracing::warn!(
                source = %host.name(),
                data_dir = %registry.data_dir().display(),
                "effect {EFFECT_FILE} not found"
            );
            return Err(FilterError::EffectMissing {
                name: EFFECT_FILE.to_string(),
                data_dir: registry.data_dir().to_path_buf(),
            });
        };

        let effect = graphics.load_effect(&effect_path).map_err(|error| {
            tracing::warn!(
                source = %host.name(),
                path = %effect_path.display(),
                error = %error,
                "failed to load effect"
            );
            FilterError::from(error)
        })?;

        let (handoff_tx, handoff_rx) = crossbeam_channel::bounded(HANDOFF_CAPACITY);
        let filter = Arc::new(Self {
            host,
            graphics,
            effect,
            decoder,
            generation: AtomicU64::new(0),
            decoded: AtomicBool::new(false),
            texture_ready: AtomicBool::new(false),
            load_failed: AtomicBool::new(false),
            pending_restart: AtomicBool::new(false),
            width: AtomicU32::new(0),
            height: AtomicU32::new(0),
            mem_usage: AtomicU64::new(0),
            color_space: AtomicU8::new(ColorSpace::Srgb.to_tag()),
            control: Mutex::new(Control::default()),
            render: Mutex::new(RenderState::default()),
            handoff_tx,
            handoff_rx,
        });
        filter.update_settings(settings);
        Ok(filter)
    }

    pub fn default_settings() -> Settings {
        settings::default_settings()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn graphics(&self) -> &G {
        &self.graphics
    }

    /// Snapshot of the settings last applied.
    pub fn settings(&self) -> Settings {
        lock(&self.control).settings.clone()
    }

    pub fn is_decoded(&self) -> bool {
        self.decoded.load(Ordering::Acquire)
    }

    pub fn is_texture_ready(&self) -> bool {
        self.texture_ready.load(Ordering::Acquire)
    }

    /// Index of the frame on screen; `None` unless an animation is resident.
    pub fn current_frame(&self) -> Option<usize> {
        let render = lock(&self.render);
        render
            .image
            .as_ref()
            .and_then(ImageState::animation)
            .map(|animation| animation.current_frame())
    }

    /// Completed loops of the resident animation.
    pub fn current_loop(&self) -> Option<u32> {
        let render = lock(&self.render);
        render
            .image
            .as_ref()
            .and_then(ImageState::animation)
            .map(|animation| animation.current_loop())
    }

    /// Decodes the configured file now. Used directly by slideshow drivers;
    /// regular instances load through settings and visibility changes.
    pub fn load_now(&self) {
        let mut control = lock(&self.control);
        self.load_locked(&mut control);
    }

    /// Drops the decoded image and schedules the texture for release.
    pub fn unload(&self) {
        let mut control = lock(&self.control);
        self.unload_locked(&mut control);
    }

    fn unload_locked(&self, _control: &mut Control) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.texture_ready.store(false, Ordering::SeqCst);
        self.decoded.store(false, Ordering::SeqCst);
        self.load_failed.store(false, Ordering::Release);
        self.publish_info(None);
        // Everything queued belongs to an older generation. Only this context
        // sends, under the control lock, so the queue is empty or shrinking
        // after the drain and both sends below fit.
        self.handoff_rx.try_iter().for_each(drop);
        let _ = self.handoff_tx.try_send(Handoff::Release { generation });
    }

    fn load_locked(&self, control: &mut Control) {
        self.unload_locked(control);
        if control.path.is_empty() {
            return;
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let path = PathBuf::from(&control.path);
        control.last_mod_time = modified_timestamp(&path);

        match self.decoder.decode(&path, control.alpha_mode) {
            Ok(image) => {
                tracing::debug!(
                    source = %self.host.name(),
                    path = %path.display(),
                    width = image.width(),
                    height = image.height(),
                    frames = image.frame_count(),
                    "decoded image"
                );
                self.publish_info(Some(&image));
                let _ = self.handoff_tx.try_send(Handoff::Decoded {
                    generation,
                    path,
                    image: Box::new(image),
                });
                self.decoded.store(true, Ordering::Release);
            }
            Err(error) => {
                tracing::warn!(
                    source = %self.host.name(),
                    path = %path.display(),
                    error = %error,
                    "failed to decode image"
                );
                self.load_failed.store(true, Ordering::Release);
            }
        }
    }

    fn publish_info(&self, image: Option<&ImageState>) {
        let (width, height, mem_usage, space) = image.map_or((0, 0, 0, ColorSpace::Srgb), |image| {
            (image.width(), image.height(), image.mem_usage(), image.color_space())
        });
        self.width.store(width, Ordering::Release);
        self.height.store(height, Ordering::Release);
        self.mem_usage.store(mem_usage, Ordering::Release);
        self.color_space.store(space.to_tag(), Ordering::Release);
    }

    fn drain_handoff(&self, render: &mut RenderState<G>) {
        for message in self.handoff_rx.try_iter() {
            match message {
                Handoff::Release { generation } => {
                    if render.textures.release() {
                        tracing::debug!(
                            source = %self.host.name(),
                            path = %render.path.display(),
                            "released texture"
                        );
                    }
                    render.image = None;
                    render.generation = generation;
                }
                Handoff::Decoded {
                    generation,
                    path,
                    image,
                } => {
                    if generation != self.generation.load(Ordering::SeqCst) {
                        tracing::debug!(path = %path.display(), generation, "dropping stale image");
                        continue;
                    }
                    render.textures.release();
                    render.image = Some(*image);
                    render.path = path;
                    render.generation = generation;
                }
            }
        }
    }

    fn upload_texture(&self, render: &mut RenderState<G>) {
        if render.generation != self.generation.load(Ordering::SeqCst) {
            return;
        }
        let Some(image) = render.image.as_ref() else {
            return;
        };

        tracing::debug!(source = %self.host.name(), path = %render.path.display(), "loading texture");
        match render.textures.upload(&self.graphics, image) {
            Ok(()) => {
                render.poll.reset();
                self.texture_ready.store(true, Ordering::SeqCst);
                if self.generation.load(Ordering::SeqCst) != render.generation {
                    self.texture_ready.store(false, Ordering::SeqCst);
                }
            }
            Err(error) => {
                tracing::warn!(
                    source = %self.host.name(),
                    path = %render.path.display(),
                    error = %error,
                    "failed to load texture"
                );
            }
        }
    }

    /// Re-stats the source once per poll interval while shown and reloads it
    /// when the timestamp moved.
    fn poll_source(&self, render: &mut RenderState<G>, seconds: f32) {
        render.poll.accumulate(seconds);
        if !render.poll.is_due() || !self.host.showing() {
            return;
        }

        // Never wait on the control context; retry on a later tick instead.
        let mut control = match self.control.try_lock() {
            Ok(control) => control,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return,
        };
        render.poll.take_due();
        if control.path.is_empty() {
            return;
        }

        let timestamp = modified_timestamp(Path::new(&control.path));
        if timestamp == control.last_mod_time {
            return;
        }

        tracing::debug!(
            source = %self.host.name(),
            path = %control.path,
            "source file changed, reloading"
        );
        self.load_locked(&mut control);
        drop(control);

        self.drain_handoff(render);
        if self.decoded.load(Ordering::Acquire) {
            self.upload_texture(render);
        }
    }

    /// Rewinds an animated image to its first frame. The pending restart stays
    /// armed until an animated image is resident.
    fn restart_animation(&self, render: &mut RenderState<G>) {
        let Some(image) = render.image.as_mut() else {
            return;
        };
        if !image.restart() {
            return;
        }
        if let Err(error) = render.textures.refresh_frame(&self.graphics, image) {
            tracing::warn!(
                source = %self.host.name(),
                path = %render.path.display(),
                error = %error,
                "failed to refresh texture"
            );
        }
        self.pending_restart.store(false, Ordering::Release);
        tracing::debug!(source = %self.host.name(), "restarted animation");
    }

    fn advance_animation(&self, render: &mut RenderState<G>, now: u64) {
        let Some(image) = render.image.as_mut() else {
            return;
        };
        if render.last_frame_clock == 0 || !image.is_animated() {
            return;
        }

        let elapsed = now.saturating_sub(render.last_frame_clock);
        if !image.advance(elapsed) {
            return;
        }
        if let Err(error) = render.textures.refresh_frame(&self.graphics, image) {
            tracing::warn!(
                source = %self.host.name(),
                frame = image.current_frame(),
                error = %error,
                "failed to refresh texture"
            );
        }
    }
}

impl<H: Host + 'static, G: Graphics + 'static> FilterSource for OverlayFilter<H, G> {
    fn name(&self) -> &'static str {
        "UVFX"
    }

    fn update_settings(&self, settings: Settings) {
        let mut control = lock(&self.control);
        control.path = settings.file.clone();
        control.persistent = settings.persistent();
        control.alpha_mode = settings.alpha_mode();
        control.is_slide = settings.is_slide;
        control.settings = settings;

        if control.is_slide {
            return;
        }

        if control.persistent || self.host.showing() {
            self.load_locked(&mut control);
        } else {
            self.unload_locked(&mut control);
        }
    }

    fn show(&self) {
        let mut control = lock(&self.control);
        if !control.persistent && !control.is_slide {
            self.load_locked(&mut control);
        }
    }

    fn hide(&self) {
        let mut control = lock(&self.control);
        if !control.persistent && !control.is_slide {
            self.unload_locked(&mut control);
        }
    }

    fn activate(&self) {
        self.pending_restart.store(true, Ordering::Release);
    }

    fn tick(&self, seconds: f32) {
        let mut guard = lock(&self.render);
        let render = &mut *guard;
        self.drain_handoff(render);

        if !self.texture_ready.load(Ordering::Acquire) {
            if self.decoded.load(Ordering::Acquire) {
                self.upload_texture(render);
            }
            if !self.texture_ready.load(Ordering::Acquire) {
                // A failed load keeps polling so a replaced file is picked up.
                if self.load_failed.load(Ordering::Acquire) {
                    self.poll_source(render, seconds);
                }
                return;
            }
        }

        let now = self.host.video_frame_time();
        self.poll_source(render, seconds);

        if self.host.showing() {
            if !render.active {
                if render.image.as_ref().is_some_and(ImageState::is_animated) {
                    render.last_frame_clock = now;
                }
                render.active = true;
            }
            if self.pending_restart.load(Ordering::Acquire) {
                self.restart_animation(render);
            }
        } else {
            if render.active {
                self.restart_animation(render);
                render.active = false;
            }
            return;
        }

        self.advance_animation(render, now);
        render.last_frame_clock = now;
    }

    fn render(&self) {
        if !self.texture_ready.load(Ordering::Acquire) {
            return;
        }
        let render = lock(&self.render);
        let Some(texture) = render.textures.texture() else {
            return;
        };

        let (width, height) = self.host.target_size();
        let target_space = self.host.target_color_space(&PREFERRED_TARGET_SPACES);
        let choice = select_technique(
            target_space,
            self.graphics.working_color_space(),
            self.host.sdr_white_level(),
        );

        let pass = DrawPass {
            technique: choice.technique,
            multiplier: choice.multiplier,
            texture,
            width,
            height,
            color_space: target_space,
            format: target_space.format(),
            blend: BlendFunction::ALPHA_OVER,
        };
        if let Err(error) = self.graphics.draw(&self.effect, &pass) {
            tracing::warn!(
                source = %self.host.name(),
                technique = %choice.technique,
                error = %error,
                "failed to draw overlay"
            );
        }
    }

    fn destroy(&self) {
        {
            let mut control = lock(&self.control);
            self.unload_locked(&mut control);
            control.path.clear();
        }
        let mut render = lock(&self.render);
        self.drain_handoff(&mut render);
        render.textures.release();
        render.image = None;
    }

    fn width(&self) -> u32 {
        self.width.load(Ordering::Acquire)
    }

    fn height(&self) -> u32 {
        self.height.load(Ordering::Acquire)
    }

    fn preferred_color_space(&self) -> ColorSpace {
        if self.texture_ready.load(Ordering::Acquire) {
            ColorSpace::from_tag(self.color_space.load(Ordering::Acquire))
        } else {
            ColorSpace::Srgb
        }
    }

    fn memory_usage(&self) -> u64 {
        self.mem_usage.load(Ordering::Acquire)
    }

    fn missing_files(self: &Arc<Self>) -> Vec<MissingFile> {
        let path = lock(&self.control).path.clone();
        if path.is_empty() || Path::new(&path).exists() {
            return Vec::new();
        }

        let filter: Weak<Self> = Arc::downgrade(self);
        vec![MissingFile::new(path, MissingFileKind::Source, move |new_path: &str| {
            let Some(filter) = filter.upgrade() else {
                return;
            };
            let mut settings = filter.settings();
            settings.file = new_path.to_string();
            filter.host.persist_settings(&settings);
            filter.update_settings(settings);
        })]
    }

    fn properties(&self) -> Properties {
        properties::describe()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::animation::LoopLimit;
    use crate::color::Technique;
    use crate::decode::DecodeError;
    use crate::graphics::{GraphicsError, TextureDesc};

    const MS: u64 = 1_000_000;

    struct StubHost {
        showing: AtomicBool,
        clock: AtomicU64,
    }

    impl StubHost {
        fn new(showing: bool) -> Self {
            Self {
                showing: AtomicBool::new(showing),
                clock: AtomicU64::new(1_000 * MS),
            }
        }
    }

    impl Host for StubHost {
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
            (64, 32)
        }

        fn target_color_space(&self, preferred: &[ColorSpace]) -> ColorSpace {
            preferred[0]
        }
    }

    #[derive(Default)]
    struct CountingGraphics {
        created: AtomicUsize,
        draws: Mutex<Vec<(Technique, u32, u32)>>,
    }

    impl Graphics for CountingGraphics {
        type Texture = usize;
        type Effect = ();

        fn load_effect(&self, _path: &Path) -> Result<(), GraphicsError> {
            Ok(())
        }

        fn create_texture(
            &self,
            _desc: &TextureDesc,
            _pixels: &[u8],
        ) -> Result<usize, GraphicsError> {
            Ok(self.created.fetch_add(1, Ordering::SeqCst))
        }

        fn update_texture(&self, _texture: &usize, _pixels: &[u8]) -> Result<(), GraphicsError> {
            Ok(())
        }

        fn working_color_space(&self) -> ColorSpace {
            ColorSpace::Srgb
        }

        fn draw(&self, _effect: &(), pass: &DrawPass<'_, usize>) -> Result<(), GraphicsError> {
            self.draws
                .lock()
                .unwrap()
                .push((pass.technique, pass.width, pass.height));
            Ok(())
        }
    }

    /// Produces a two-frame animation for any path except "bad".
    struct StubDecoder;

    impl ImageDecoder for StubDecoder {
        fn decode(&self, path: &Path, alpha_mode: AlphaMode) -> Result<ImageState, DecodeError> {
            if path.ends_with("bad") {
                return Err(DecodeError::NoFrames);
            }
            ImageState::animated(
                2,
                2,
                vec![(vec![1; 16], 50 * MS), (vec![2; 16], 50 * MS)],
                LoopLimit::Infinite,
                alpha_mode,
            )
        }
    }

    fn registry(dir: &Path) -> ModuleRegistry {
        std::fs::write(dir.join(EFFECT_FILE), "// effect").unwrap();
        ModuleRegistry::load(dir)
    }

    fn filter_with(
        dir: &Path,
        file: &str,
        showing: bool,
    ) -> Arc<OverlayFilter<StubHost, CountingGraphics>> {
        let settings = Settings {
            file: file.to_string(),
            ..Settings::default()
        };
        OverlayFilter::create_with_decoder(
            &registry(dir),
            settings,
            StubHost::new(showing),
            CountingGraphics::default(),
            Box::new(StubDecoder),
        )
        .unwrap()
    }

    #[test]
    fn create_fails_without_effect() {
        let dir = tempfile::tempdir().unwrap();
        let result = OverlayFilter::create(
            &ModuleRegistry::load(dir.path()),
            Settings::default(),
            StubHost::new(true),
            CountingGraphics::default(),
        );
        assert!(matches!(result, Err(FilterError::EffectMissing { .. })));
    }

    #[test]
    fn upload_waits_for_first_tick() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with(dir.path(), "overlay.gif", true);
        assert!(filter.is_decoded());
        assert!(!filter.is_texture_ready());
        assert_eq!((filter.width(), filter.height()), (2, 2));

        filter.tick(0.016);
        assert!(filter.is_texture_ready());
        assert_eq!(filter.graphics().created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn decode_failure_leaves_gates_closed() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with(dir.path(), "bad", true);
        filter.tick(0.016);
        assert!(!filter.is_decoded());
        assert!(!filter.is_texture_ready());
        assert_eq!(filter.width(), 0);
        filter.render();
        assert!(filter.graphics().draws.lock().unwrap().is_empty());
    }

    #[test]
    fn render_uses_target_size_and_plain_draw() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with(dir.path(), "overlay.gif", true);
        filter.render();
        assert!(filter.graphics().draws.lock().unwrap().is_empty());

        filter.tick(0.016);
        filter.render();
        assert_eq!(
            filter.graphics().draws.lock().unwrap().as_slice(),
            &[(Technique::Draw, 64, 32)]
        );
    }

    #[test]
    fn first_shown_tick_sets_baseline_without_advancing() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with(dir.path(), "overlay.gif", true);
        filter.tick(0.016);
        assert_eq!(filter.current_frame(), Some(0));

        filter.host().clock.fetch_add(50 * MS, Ordering::SeqCst);
        filter.tick(0.05);
        assert_eq!(filter.current_frame(), Some(1));
    }

    #[test]
    fn empty_path_never_loads() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with(dir.path(), "", true);
        filter.tick(2.0);
        assert!(!filter.is_decoded());
        assert!(filter.missing_files().is_empty());
    }

    #[test]
    fn destroy_releases_everything() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with(dir.path(), "overlay.gif", true);
        filter.tick(0.016);
        filter.destroy();
        assert!(!filter.is_texture_ready());
        assert_eq!(filter.memory_usage(), 0);
        assert_eq!(filter.current_frame(), None);
        assert_eq!(filter.preferred_color_space(), ColorSpace::Srgb);
    }

    #[test]
    fn reloads_between_ticks_keep_one_image_queued() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with(dir.path(), "overlay.gif", true);
        for _ in 0..10 {
            filter.load_now();
            assert!(filter.handoff_rx.len() <= HANDOFF_CAPACITY);
        }
        let queued_images = filter
            .handoff_rx
            .try_iter()
            .filter(|message| matches!(message, Handoff::Decoded { .. }))
            .count();
        assert_eq!(queued_images, 1);

        filter.load_now();
        filter.tick(0.016);
        assert!(filter.is_texture_ready());
        assert_eq!(filter.graphics().created.load(Ordering::SeqCst), 1);
    }
}
