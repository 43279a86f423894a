//! Frame clock for animated images.
//!
//! Time is tracked in nanoseconds of host video clock. Each frame owns a
//! delay budget; once the accumulated playback time reaches that budget the
//! clock moves to the next frame, carrying the remainder forward so long
//! ticks skip frames instead of drifting.

/// Delay substituted for frames that declare no delay of their own.
pub const DEFAULT_FRAME_DELAY_NS: u64 = 100_000_000;

/// How many times an animation plays before holding on its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopLimit {
    Infinite,
    Times(u32),
}

impl LoopLimit {
    /// Maps a GIF loop-count extension to a limit. Files without the
    /// extension report `Finite(0)` and play once.
    pub fn from_gif(repeat: gif::Repeat) -> Self {
        match repeat {
            gif::Repeat::Infinite => LoopLimit::Infinite,
            gif::Repeat::Finite(0) => LoopLimit::Times(1),
            gif::Repeat::Finite(times) => LoopLimit::Times(u32::from(times)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    delays: Vec<u64>,
    limit: LoopLimit,
    frame: usize,
    loops: u32,
    time: u64,
}

impl Animation {
    /// Builds a clock over the per-frame delays. Zero delays fall back to
    /// [`DEFAULT_FRAME_DELAY_NS`].
    pub fn new(delays: impl IntoIterator<Item = u64>, limit: LoopLimit) -> Self {
        let delays = delays
            .into_iter()
            .map(|delay| if delay == 0 { DEFAULT_FRAME_DELAY_NS } else { delay })
            .collect();
        Self {
            delays,
            limit,
            frame: 0,
            loops: 0,
            time: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.delays.len()
    }

    pub fn current_frame(&self) -> usize {
        self.frame
    }

    pub fn current_loop(&self) -> u32 {
        self.loops
    }

    /// Playback time accumulated inside the current frame.
    pub fn playback_time(&self) -> u64 {
        self.time
    }

    pub fn delays(&self) -> &[u64] {
        &self.delays
    }

    pub fn loop_limit(&self) -> LoopLimit {
        self.limit
    }

    /// Total length of one pass over every frame.
    pub fn cycle_length(&self) -> u64 {
        self.delays.iter().sum()
    }

    /// True once a finite loop limit has been played out.
    pub fn finished(&self) -> bool {
        matches!(self.limit, LoopLimit::Times(times) if self.loops >= times)
    }

    /// Rewinds to the first frame of the first loop.
    pub fn restart(&mut self) {
        self.frame = 0;
        self.loops = 0;
        self.time = 0;
    }

    /// Feeds `elapsed_ns` of clock time into the animation and returns whether
    /// the displayed frame changed.
    pub fn advance(&mut self, elapsed_ns: u64) -> bool {
        if self.delays.len() < 2 || self.finished() {
            return false;
        }

        let previous = self.frame;
        self.time = self.time.saturating_add(elapsed_ns);

        if self.limit == LoopLimit::Infinite {
            // Whole cycles land back on the same frame; count them without walking.
            let cycle = self.cycle_length();
            if self.time >= cycle {
                let skipped = self.time / cycle;
                self.time %= cycle;
                self.loops = self
                    .loops
                    .saturating_add(u32::try_from(skipped).unwrap_or(u32::MAX));
            }
        }

        let mut frame = self.frame;
        loop {
            let delay = self.delays[frame];
            if self.time < delay {
                break;
            }
            self.time -= delay;
            frame += 1;

            if frame == self.delays.len() {
                self.loops = self.loops.saturating_add(1);
                if self.finished() {
                    frame -= 1;
                    self.time = 0;
                    break;
                }
                frame = 0;
            }
        }

        self.frame = frame;
        frame != previous
    }
}
