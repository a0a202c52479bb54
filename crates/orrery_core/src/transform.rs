//! Model-matrix composition.
//!
//! Every drawable gets a fresh [`TransformChain`] each frame.  The chain
//! starts at identity and post-multiplies each step, the same way a
//! `translate / rotate / scale` call sequence on a matrix stack behaves, so
//! the **last** call is the one applied to the mesh first.
//!
//! # Example
//! ```rust
//! use orrery_core::transform::TransformChain;
//! use glam::Vec3;
//!
//! // Mesh is scaled, then spun about +Y, then moved to (10, 0, 0).
//! let m = TransformChain::identity()
//!     .translate(Vec3::new(10.0, 0.0, 0.0))
//!     .rotate(0.5, Vec3::Y)
//!     .scale(Vec3::splat(0.2))
//!     .matrix();
//! assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-6));
//! ```

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// An axis-angle rotation.  `angle` is in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub angle: f32,
    pub axis: Vec3,
}

impl Rotation {
    /// No rotation.
    pub const IDENTITY: Self = Self {
        angle: 0.0,
        axis: Vec3::Y,
    };

    pub fn new(angle: f32, axis: Vec3) -> Self {
        Self { angle, axis }
    }

    /// Rotation as a unit quaternion.  A zero-length axis yields identity.
    pub fn quat(&self) -> Quat {
        match self.axis.try_normalize() {
            Some(axis) => Quat::from_axis_angle(axis, self.angle),
            None => Quat::IDENTITY,
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-drawable transform accumulator.
///
/// This is a value type: methods consume and return the chain, and there is
/// no way to carry one over into the next frame by accident.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct TransformChain {
    matrix: Mat4,
}

impl Default for TransformChain {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformChain {
    /// Start a new chain at the identity matrix.
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    /// Post-multiply a translation.
    pub fn translate(self, offset: Vec3) -> Self {
        Self {
            matrix: self.matrix * Mat4::from_translation(offset),
        }
    }

    /// Post-multiply a rotation of `angle` radians about `axis`.
    pub fn rotate(self, angle: f32, axis: Vec3) -> Self {
        self.rotate_by(Rotation::new(angle, axis))
    }

    /// Post-multiply an axis-angle rotation.
    pub fn rotate_by(self, rotation: Rotation) -> Self {
        Self {
            matrix: self.matrix * Mat4::from_quat(rotation.quat()),
        }
    }

    /// Post-multiply a non-uniform scale.
    pub fn scale(self, factors: Vec3) -> Self {
        Self {
            matrix: self.matrix * Mat4::from_scale(factors),
        }
    }

    /// The accumulated model matrix.
    pub fn matrix(self) -> Mat4 {
        self.matrix
    }
}

/// Build a model matrix that scales the mesh, then rotates it, then
/// translates it (`T * R * S`).
///
/// Scale and rotation both fix the local origin, so the origin always lands
/// on `translation`.
pub fn compose_model_matrix(scale: Vec3, rotation: Rotation, translation: Vec3) -> Mat4 {
    TransformChain::identity()
        .translate(translation)
        .rotate_by(rotation)
        .scale(scale)
        .matrix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_matrix() {
        let m = TransformChain::default().matrix();
        assert!((m - Mat4::IDENTITY).abs_diff_eq(Mat4::ZERO, 1e-6));
    }

    #[test]
    fn origin_lands_on_translation() {
        let t = Vec3::new(3.0, -2.0, 7.5);
        let m = compose_model_matrix(
            Vec3::new(2.0, 0.5, 4.0),
            Rotation::new(1.234, Vec3::new(1.0, 1.0, 0.0)),
            t,
        );
        assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(t, 1e-6));
    }

    #[test]
    fn scale_applies_before_rotation() {
        // Stretch along X, then a quarter turn about Z: the stretch must end
        // up along Y.
        let m = compose_model_matrix(
            Vec3::new(3.0, 1.0, 1.0),
            Rotation::new(std::f32::consts::FRAC_PI_2, Vec3::Z),
            Vec3::ZERO,
        );
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-5));
    }

    #[test]
    fn matches_glam_trs() {
        let s = Vec3::new(0.2, 0.2, 0.2);
        let r = Rotation::new(0.7, Vec3::Y);
        let t = Vec3::new(0.0, 0.0, 100.0);
        let ours = compose_model_matrix(s, r, t);
        let glams = Mat4::from_scale_rotation_translation(s, r.quat(), t);
        assert!(ours.abs_diff_eq(glams, 1e-5));
    }

    #[test]
    fn chain_order_is_right_multiplication() {
        // Rotating first then translating moves along the rotated axis.
        let m = TransformChain::identity()
            .rotate(std::f32::consts::FRAC_PI_2, Vec3::Y)
            .translate(Vec3::X)
            .matrix();
        let p = m.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn zero_axis_is_identity_rotation() {
        let r = Rotation::new(1.0, Vec3::ZERO);
        assert_eq!(r.quat(), Quat::IDENTITY);
    }
}
