//! Toggleable animation clock.
//!
//! Orbital motion is driven by `elapsed`, which only advances while the
//! clock is [`AnimationState::Running`].  Toggle requests come from a held
//! key, so they arrive every frame the key stays down; a request is only
//! accepted when more than the debounce window has passed since the last
//! accepted transition.

/// Default debounce window in seconds.
pub const DEFAULT_DEBOUNCE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Paused,
    Running,
}

impl AnimationState {
    fn flipped(self) -> Self {
        match self {
            Self::Paused => Self::Running,
            Self::Running => Self::Paused,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationClock {
    state: AnimationState,
    elapsed: f64,
    /// Frame-clock time of the last accepted transition.
    last_transition: Option<f64>,
    debounce: f64,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationClock {
    /// A paused clock at `elapsed = 0` with the default debounce window.
    pub fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(debounce: f64) -> Self {
        Self {
            state: AnimationState::Paused,
            elapsed: 0.0,
            last_transition: None,
            debounce: debounce.max(0.0),
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == AnimationState::Running
    }

    /// Accumulated animation time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn debounce(&self) -> f64 {
        self.debounce
    }

    /// Advance by one frame.  No-op while paused; negative deltas are
    /// ignored so `elapsed` never runs backwards.
    pub fn advance(&mut self, delta: f64) {
        if self.is_running() && delta > 0.0 {
            self.elapsed += delta;
        }
    }

    /// Request a RUNNING/PAUSED flip at frame-clock time `now`.
    ///
    /// Returns `true` if the request was accepted.
    pub fn toggle(&mut self, now: f64) -> bool {
        if let Some(last) = self.last_transition {
            if now - last <= self.debounce {
                return false;
            }
        }
        self.state = self.state.flipped();
        self.last_transition = Some(now);
        log::debug!("animation {:?} at t={now:.3}", self.state);
        true
    }

    /// Force a state without going through the debounce guard.  Used for
    /// start-up configuration.
    pub fn set_running(&mut self, running: bool) {
        self.state = if running {
            AnimationState::Running
        } else {
            AnimationState::Paused
        };
    }
}
