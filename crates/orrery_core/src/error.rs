use thiserror::Error;

use crate::orbit::BodyId;

/// Errors raised while assembling a scene.
///
/// Per-frame operations never fail; everything that can go wrong at runtime
/// is clamped away.  Only scene construction can be rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("body {parent:?} must be added before a body can orbit it")]
    UnknownParent { parent: BodyId },
    #[error("orbit radius must be finite and non-negative, got {0}")]
    InvalidRadius(f32),
}
