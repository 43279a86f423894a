use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use uvfx::{ColorSpace, Host, Settings};

/// Host side of the preview: a visibility flag and a clock the run loop
/// advances by one frame interval per tick.
#[derive(Debug)]
pub struct PreviewHost {
    showing: AtomicBool,
    clock_ns: AtomicU64,
    white_level: f32,
    size: (u32, u32),
    space: ColorSpace,
}

impl PreviewHost {
    pub fn new(size: (u32, u32), space: ColorSpace, white_level: f32) -> Self {
        Self {
            showing: AtomicBool::new(true),
            clock_ns: AtomicU64::new(0),
            white_level,
            size,
            space,
        }
    }

    pub fn set_showing(&self, showing: bool) {
        self.showing.store(showing, Ordering::SeqCst);
    }

    pub fn advance(&self, ns: u64) -> u64 {
        self.clock_ns.fetch_add(ns, Ordering::SeqCst) + ns
    }
}

impl Host for PreviewHost {
    fn name(&self) -> String {
        String::from("uvfx-preview")
    }

    fn showing(&self) -> bool {
        self.showing.load(Ordering::SeqCst)
    }

    fn video_frame_time(&self) -> u64 {
        self.clock_ns.load(Ordering::SeqCst)
    }

    fn sdr_white_level(&self) -> f32 {
        self.white_level
    }

    fn target_size(&self) -> (u32, u32) {
        self.size
    }

    fn target_color_space(&self, preferred: &[ColorSpace]) -> ColorSpace {
        closest_space(self.space, preferred)
    }

    fn persist_settings(&self, settings: &Settings) {
        tracing::info!(settings = %settings.to_json(), "settings updated");
    }
}

/// `space` if the caller accepts it, otherwise the first accepted space in
/// the same dynamic range.
fn closest_space(space: ColorSpace, preferred: &[ColorSpace]) -> ColorSpace {
    if preferred.is_empty() || preferred.contains(&space) {
        return space;
    }
    preferred
        .iter()
        .copied()
        .find(|candidate| candidate.is_sdr() == space.is_sdr())
        .unwrap_or(preferred[0])
}
