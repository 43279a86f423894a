use crate::color::ColorSpace;
use crate::settings::Settings;

/// Queries the filter makes against the application embedding it.
///
/// Methods may be called from either host context; implementations must be
/// cheap and must not call back into the filter.
pub trait Host: Send + Sync {
    /// Display name of the source the filter is attached to, for diagnostics.
    fn name(&self) -> String {
        String::from("uvfx")
    }

    /// Whether the filter's parent is currently visible in any output.
    fn showing(&self) -> bool;

    /// Host video clock in nanoseconds.
    fn video_frame_time(&self) -> u64;

    /// Reference white for SDR content, in nits.
    fn sdr_white_level(&self) -> f32;

    /// Base width and height of the filter target.
    fn target_size(&self) -> (u32, u32);

    /// Colour space of the filter target, picked from `preferred`.
    fn target_color_space(&self, preferred: &[ColorSpace]) -> ColorSpace;

    /// Stores settings rewritten by the filter (missing-file repair).
    fn persist_settings(&self, _settings: &Settings) {}
}

impl<T: Host + ?Sized> Host for std::sync::Arc<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn showing(&self) -> bool {
        (**self).showing()
    }

    fn video_frame_time(&self) -> u64 {
        (**self).video_frame_time()
    }

    fn sdr_white_level(&self) -> f32 {
        (**self).sdr_white_level()
    }

    fn target_size(&self) -> (u32, u32) {
        (**self).target_size()
    }

    fn target_color_space(&self, preferred: &[ColorSpace]) -> ColorSpace {
        (**self).target_color_space(preferred)
    }

    fn persist_settings(&self, settings: &Settings) {
        (**self).persist_settings(settings)
    }
}
