use serde::{Deserialize, Serialize};

use crate::animation::AnimationClock;
use crate::camera::Camera;
use crate::controller::{KeyBindings, NavigationMode};
use crate::input::InputState;
use crate::orbit::OrbitSystem;

/// Fixed clip planes for the perspective projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Default distance kept from the origin in [`NavigationMode::Orbit`].
pub const DEFAULT_ORBIT_RADIUS: f32 = 180.0;
/// Default orbit navigation speed in degrees per second.
pub const DEFAULT_ORBIT_SPEED: f32 = 45.0;

/// Everything the per-frame loop reads and mutates.
///
/// Owned by the runner and handed to
/// [`SceneUpdateLoop::frame`](crate::frame::SceneUpdateLoop::frame) by
/// `&mut` each frame.  Nothing here is global.
#[derive(Debug)]
pub struct SceneState {
    pub camera: Camera,
    pub clock: AnimationClock,
    pub input: InputState,
    pub bindings: KeyBindings,
    pub mode: NavigationMode,
    /// Distance from the origin held while orbiting.
    pub orbit_radius: f32,
    /// Degrees swept per second while an orbit key is held.
    pub orbit_speed: f32,
    pub projection: Projection,
    pub system: OrbitSystem,
}

impl SceneState {
    /// Fly-mode state around `system`, animation paused.
    pub fn new(camera: Camera, system: OrbitSystem) -> Self {
        Self {
            camera,
            clock: AnimationClock::new(),
            input: InputState::new(),
            bindings: KeyBindings::for_mode(NavigationMode::Fly),
            mode: NavigationMode::Fly,
            orbit_radius: DEFAULT_ORBIT_RADIUS,
            orbit_speed: DEFAULT_ORBIT_SPEED,
            projection: Projection::default(),
            system,
        }
    }

    /// Switch navigation mode, replacing the bindings with that mode's
    /// default layout.
    pub fn with_mode(mut self, mode: NavigationMode) -> Self {
        self.mode = mode;
        self.bindings = KeyBindings::for_mode(mode);
        self
    }

    pub fn with_orbit(mut self, radius: f32, speed_degrees: f32) -> Self {
        self.orbit_radius = radius.max(0.0);
        self.orbit_speed = speed_degrees;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_clock(mut self, clock: AnimationClock) -> Self {
        self.clock = clock;
        self
    }
}
