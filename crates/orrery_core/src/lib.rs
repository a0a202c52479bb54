//! orrery_core: camera, orbital motion, transform composition and the
//! per-frame scene loop.
//!
//! Nothing in here touches the GPU or the window system.  Rendering and
//! input arrive through the collaborator types in [`frame`] and [`input`],
//! so everything can be driven headless from tests.

pub mod animation;
pub mod camera;
pub mod color;
pub mod controller;
pub mod error;
pub mod frame;
pub mod input;
pub mod orbit;
pub mod scene;
pub mod time;
pub mod transform;

pub use animation::{AnimationClock, AnimationState, DEFAULT_DEBOUNCE};
pub use camera::{Camera, CameraMovement, CameraSettings, OrbitDirection};
pub use color::Color;
pub use controller::{Action, KeyBindings, NavigationMode};
pub use error::SceneError;
pub use frame::{DrawCommand, Drawable, FrameReport, FrameUniforms, SceneRenderer, SceneUpdateLoop};
pub use input::{InputState, KeyCode};
pub use orbit::{compute_position, Anchor, Body, BodyId, Orbit, OrbitPlane, OrbitSystem};
pub use scene::{Projection, SceneState};
pub use time::{MonotonicSource, Time, TimeClock, TimeSource};
pub use transform::{compose_model_matrix, Rotation, TransformChain};

// glam math types, re-exported so collaborators share one version
pub use glam;
