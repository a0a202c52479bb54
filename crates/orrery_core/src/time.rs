//! Frame timing utilities.
//!
//! `Time` is produced once per frame by the [`TimeClock`] owned by the scene
//! loop.  The clock reads seconds from a [`TimeSource`] so tests can drive it
//! with a manual source instead of the wall clock.
//!
//! # Example
//! ```rust,ignore
//! let mut clock = TimeClock::new();
//! loop {
//!     let time = clock.tick();
//!     camera.move_in(CameraMovement::Forward, time.delta);
//! }
//! ```

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Upper bound on a single frame's delta, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Monotonic source of seconds.
pub trait TimeSource {
    /// Seconds since an arbitrary fixed epoch.  Must never decrease.
    fn now(&self) -> f64;
}

/// Wall-clock source backed by `Instant`, counting from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicSource {
    start: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// A snapshot of timing information for the current frame.
///
/// Since it is `Copy` you can store a copy locally if needed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    /// Seconds elapsed since the previous frame.  Clamped to
    /// [`MAX_FRAME_DELTA`] so a stalled frame (window drag, breakpoint)
    /// does not teleport the camera.
    pub delta: f32,

    /// Frame-clock time of this frame in seconds.  Used for debouncing.
    pub now: f64,

    /// Number of frames ticked before this one (starts at 0).
    pub frame_count: u64,
}

// ─── Clock (lives in the scene loop) ───────────────────────────────────────

/// Stateful timer that produces [`Time`] snapshots.
pub struct TimeClock<S: TimeSource = MonotonicSource> {
    source: S,
    last_tick: f64,
    frame_count: u64,
}

impl TimeClock<MonotonicSource> {
    /// Create a wall-clock timer, starting the epoch now.
    pub fn new() -> Self {
        Self::with_source(MonotonicSource::new())
    }
}

impl Default for TimeClock<MonotonicSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TimeSource> TimeClock<S> {
    pub fn with_source(source: S) -> Self {
        let last_tick = source.now();
        Self {
            source,
            last_tick,
            frame_count: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Advance by one frame.  Returns the [`Time`] snapshot for this frame.
    pub fn tick(&mut self) -> Time {
        let now = self.source.now();
        let raw_dt = (now - self.last_tick).max(0.0) as f32;
        let time = Time {
            delta: raw_dt.min(MAX_FRAME_DELTA),
            now,
            frame_count: self.frame_count,
        };
        self.last_tick = now;
        self.frame_count += 1;
        time
    }
}
