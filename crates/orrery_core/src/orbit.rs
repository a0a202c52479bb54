//! Orbital motion for the fixed set of scene bodies.
//!
//! Positions are never stored.  Every frame the scene loop asks the
//! [`OrbitSystem`] for all positions at the shared animation time; bodies are
//! evaluated in insertion order, and a body can only orbit a body inserted
//! before it, so a parent's position for *this* frame is always known by the
//! time its children are placed.
//!
//! ```rust
//! use orrery_core::orbit::{Body, Orbit, OrbitPlane, OrbitSystem};
//! use glam::Vec3;
//!
//! let mut system = OrbitSystem::new();
//! let sun = system.add(Body::fixed("sun", Vec3::ZERO)).unwrap();
//! let earth = system
//!     .add(Body::orbiting("earth", sun, Orbit::new(100.0, OrbitPlane::XZ)))
//!     .unwrap();
//! let positions = system.positions(0.0);
//! assert!(positions[earth.index()].abs_diff_eq(Vec3::new(0.0, 0.0, 100.0), 1e-4));
//! ```

use std::f64::consts::TAU;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::SceneError;
use crate::transform::{Rotation, TransformChain};

/// The pair of axes an orbit's sinusoids live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbitPlane {
    /// Equatorial: `(sin θ, 0, cos θ)`.
    #[default]
    XZ,
    /// Inclined, around the X axis: `(0, sin θ, cos θ)`.
    YZ,
    /// Facing the default camera: `(sin θ, cos θ, 0)`.
    XY,
}

impl OrbitPlane {
    /// Unit offset from the orbit center at angle `theta` (radians).
    pub fn offset(self, theta: f32) -> Vec3 {
        let (s, c) = theta.sin_cos();
        match self {
            Self::XZ => Vec3::new(s, 0.0, c),
            Self::YZ => Vec3::new(0.0, s, c),
            Self::XY => Vec3::new(s, c, 0.0),
        }
    }

    /// Rotation that carries a circle drawn in the XY plane into this plane.
    pub fn ring_rotation(self) -> Rotation {
        use std::f32::consts::FRAC_PI_2;
        match self {
            Self::XZ => Rotation::new(FRAC_PI_2, Vec3::X),
            Self::YZ => Rotation::new(FRAC_PI_2, Vec3::Y),
            Self::XY => Rotation::IDENTITY,
        }
    }
}

/// Circular orbit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Orbit {
    /// Distance from the center, in world units.  Zero pins the body to
    /// its center.
    pub radius: f32,
    pub plane: OrbitPlane,
    /// Radians per second of animation time.
    pub angular_rate: f32,
    /// Angle at animation time zero, in radians.
    pub phase: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            radius: 0.0,
            plane: OrbitPlane::XZ,
            angular_rate: 1.0,
            phase: 0.0,
        }
    }
}

impl Orbit {
    pub fn new(radius: f32, plane: OrbitPlane) -> Self {
        Self {
            radius,
            plane,
            ..Default::default()
        }
    }

    pub fn with_rate(mut self, angular_rate: f32) -> Self {
        self.angular_rate = angular_rate;
        self
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    /// Seconds for one full revolution, or `None` for a stationary orbit.
    pub fn period(&self) -> Option<f64> {
        (self.angular_rate != 0.0).then(|| TAU / f64::from(self.angular_rate.abs()))
    }

    /// Orbit angle at animation time `time`, reduced to `[0, 2π)`.
    ///
    /// The product is formed in `f64` so long sessions keep their precision.
    pub fn angle_at(&self, time: f64) -> f32 {
        wrap_angle(time * f64::from(self.angular_rate) + f64::from(self.phase))
    }

    /// World position around `center` at animation time `time`.
    pub fn position(&self, center: Vec3, time: f64) -> Vec3 {
        center + self.radius * self.plane.offset(self.angle_at(time))
    }
}

/// `center + radius * plane.offset(time)`, with unit angular rate.
pub fn compute_position(center: Vec3, radius: f32, time: f64, plane: OrbitPlane) -> Vec3 {
    center + radius * plane.offset(wrap_angle(time))
}

fn wrap_angle(theta: f64) -> f32 {
    theta.rem_euclid(TAU) as f32
}

// ─── Bodies ────────────────────────────────────────────────────────────────

/// Index of a body inside its [`OrbitSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a body sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Fixed(Vec3),
    Orbiting { parent: BodyId, orbit: Orbit },
}

/// A drawable scene body (sun, planet, moon).
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    /// Fixed once constructed; [`OrbitSystem::add`] validates the parent.
    anchor: Anchor,
    /// Self-rotation in radians per second of animation time.
    pub spin_rate: f32,
    pub spin_axis: Vec3,
    /// Uniform mesh scale.
    pub scale: f32,
    /// Whether an orbit ring is drawn for this body.  Ignored for fixed
    /// bodies.
    pub show_ring: bool,
    pub ring_color: Color,
}

impl Body {
    pub fn fixed(name: impl Into<String>, position: Vec3) -> Self {
        Self::with_anchor(name, Anchor::Fixed(position))
    }

    pub fn orbiting(name: impl Into<String>, parent: BodyId, orbit: Orbit) -> Self {
        Self::with_anchor(name, Anchor::Orbiting { parent, orbit })
    }

    fn with_anchor(name: impl Into<String>, anchor: Anchor) -> Self {
        Self {
            name: name.into(),
            anchor,
            spin_rate: 0.0,
            spin_axis: Vec3::Y,
            scale: 1.0,
            show_ring: true,
            ring_color: Color::LIGHT_GRAY,
        }
    }

    pub fn with_spin(mut self, spin_rate: f32, axis: Vec3) -> Self {
        self.spin_rate = spin_rate;
        self.spin_axis = axis;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_ring(mut self, show_ring: bool) -> Self {
        self.show_ring = show_ring;
        self
    }

    pub fn with_ring_color(mut self, color: Color) -> Self {
        self.ring_color = color;
        self
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn orbit(&self) -> Option<&Orbit> {
        match &self.anchor {
            Anchor::Orbiting { orbit, .. } => Some(orbit),
            Anchor::Fixed(_) => None,
        }
    }

    /// Spin angle at animation time `time`.
    pub fn spin_angle(&self, time: f64) -> f32 {
        wrap_angle(time * f64::from(self.spin_rate))
    }

    /// Model matrix: scaled, spun about its own axis, then moved to
    /// `position`.
    pub fn model_matrix(&self, position: Vec3, time: f64) -> Mat4 {
        TransformChain::identity()
            .translate(position)
            .rotate(self.spin_angle(time), self.spin_axis)
            .scale(Vec3::splat(self.scale))
            .matrix()
    }
}

/// Model matrix for a unit-circle ring in the XY plane: stretched to
/// `radius`, laid into `plane`, then moved onto `center`.
pub fn ring_matrix(center: Vec3, radius: f32, plane: OrbitPlane) -> Mat4 {
    TransformChain::identity()
        .translate(center)
        .rotate_by(plane.ring_rotation())
        .scale(Vec3::splat(radius))
        .matrix()
}

// ─── System ────────────────────────────────────────────────────────────────

/// Ordered collection of bodies.  Insertion order is evaluation order.
#[derive(Debug, Clone, Default)]
pub struct OrbitSystem {
    bodies: Vec<Body>,
}

impl OrbitSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body.  An orbiting body's parent must already be in the
    /// system, and its radius must be finite and non-negative.
    pub fn add(&mut self, body: Body) -> Result<BodyId, SceneError> {
        if let Anchor::Orbiting { parent, orbit } = &body.anchor {
            if parent.0 >= self.bodies.len() {
                return Err(SceneError::UnknownParent { parent: *parent });
            }
            if !orbit.radius.is_finite() || orbit.radius < 0.0 {
                return Err(SceneError::InvalidRadius(orbit.radius));
            }
        }
        let id = BodyId(self.bodies.len());
        log::debug!("added body {:?} as {id:?}", body.name);
        self.bodies.push(body);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    /// Appearance can change after insertion; the anchor cannot.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.name == name).map(BodyId)
    }

    /// Bodies with their ids, in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    /// Positions of every body at animation time `time`, indexed by
    /// [`BodyId::index`].
    pub fn positions(&self, time: f64) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(self.bodies.len());
        self.positions_into(time, &mut out);
        out
    }

    /// Same as [`positions`](Self::positions), reusing `out`'s allocation.
    pub fn positions_into(&self, time: f64, out: &mut Vec<Vec3>) {
        out.clear();
        for body in &self.bodies {
            let position = match body.anchor {
                Anchor::Fixed(p) => p,
                // parent index < own index, so out[parent] is this frame's
                Anchor::Orbiting { parent, orbit } => orbit.position(out[parent.0], time),
            };
            out.push(position);
        }
    }

    /// Ring matrix for `id`, centred on its parent's position this frame.
    /// `None` for fixed bodies or bodies with their ring hidden.
    pub fn ring_matrix(&self, id: BodyId, positions: &[Vec3]) -> Option<Mat4> {
        let body = self.bodies.get(id.0)?;
        match body.anchor {
            Anchor::Orbiting { parent, orbit } if body.show_ring => {
                let center = *positions.get(parent.0)?;
                Some(ring_matrix(center, orbit.radius, orbit.plane))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sun_earth_moon() -> (OrbitSystem, BodyId, BodyId, BodyId) {
        let mut system = OrbitSystem::new();
        let sun = system.add(Body::fixed("sun", Vec3::ZERO)).unwrap();
        let earth = system
            .add(Body::orbiting("earth", sun, Orbit::new(100.0, OrbitPlane::XZ).with_rate(0.5)))
            .unwrap();
        let moon = system
            .add(Body::orbiting("moon", earth, Orbit::new(12.0, OrbitPlane::YZ).with_rate(3.0)))
            .unwrap();
        (system, sun, earth, moon)
    }

    #[test]
    fn radius_ten_at_time_zero() {
        let p = compute_position(Vec3::ZERO, 10.0, 0.0, OrbitPlane::XZ);
        assert!((p.length() - 10.0).abs() < 1e-6);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-6));
    }

    #[test]
    fn half_period_flips_offset() {
        for plane in [OrbitPlane::XZ, OrbitPlane::YZ, OrbitPlane::XY] {
            let a = compute_position(Vec3::ZERO, 10.0, 0.0, plane);
            let b = compute_position(Vec3::ZERO, 10.0, PI, plane);
            assert!(b.abs_diff_eq(-a, 1e-5), "{plane:?}: {a:?} vs {b:?}");
        }
    }

    #[test]
    fn zero_radius_collapses_to_center() {
        let c = Vec3::new(1.0, 2.0, 3.0);
        for t in [0.0, 0.3, 17.0, 1e7] {
            assert_eq!(compute_position(c, 0.0, t, OrbitPlane::YZ), c);
        }
    }

    #[test]
    fn planes_keep_their_free_axis_at_zero() {
        let t = 0.8;
        assert_eq!(compute_position(Vec3::ZERO, 5.0, t, OrbitPlane::XZ).y, 0.0);
        assert_eq!(compute_position(Vec3::ZERO, 5.0, t, OrbitPlane::YZ).x, 0.0);
        assert_eq!(compute_position(Vec3::ZERO, 5.0, t, OrbitPlane::XY).z, 0.0);
    }

    #[test]
    fn earth_returns_after_one_period() {
        let (system, _, earth, _) = sun_earth_moon();
        let start = system.positions(0.0)[earth.index()];
        assert!(start.abs_diff_eq(Vec3::new(0.0, 0.0, 100.0), 1e-4));
        let period = system.body(earth).unwrap().orbit().unwrap().period().unwrap();
        let back = system.positions(period)[earth.index()];
        assert!(back.abs_diff_eq(start, 1e-3), "{back:?}");
    }

    #[test]
    fn moon_tracks_current_earth() {
        let (system, _, earth, moon) = sun_earth_moon();
        let moon_orbit = *system.body(moon).unwrap().orbit().unwrap();
        for t in [0.0, 0.4, 2.9, 31.7] {
            let p = system.positions(t);
            let expected = moon_orbit.position(p[earth.index()], t);
            assert_eq!(p[moon.index()], expected);
            assert!(((p[moon.index()] - p[earth.index()]).length() - 12.0).abs() < 1e-3);
        }
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let (mut system, _, _, _) = sun_earth_moon();
        let mut other = OrbitSystem::new();
        let err = other
            .add(Body::orbiting("lost", BodyId(2), Orbit::new(1.0, OrbitPlane::XZ)))
            .unwrap_err();
        assert_eq!(err, SceneError::UnknownParent { parent: BodyId(2) });
        assert!(system
            .add(Body::orbiting("bad", BodyId(0), Orbit::new(-1.0, OrbitPlane::XZ)))
            .is_err());
    }

    #[test]
    fn ring_sits_on_parent_in_orbit_plane() {
        let (system, _, earth, moon) = sun_earth_moon();
        let p = system.positions(1.3);
        let m = system.ring_matrix(moon, &p).unwrap();
        // ring center on earth
        assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(p[earth.index()], 1e-4));
        // every ring point lies on the moon's orbit
        for k in 0..8 {
            let a = k as f32 * std::f32::consts::TAU / 8.0;
            let local = Vec3::new(a.cos(), a.sin(), 0.0);
            let world = m.transform_point3(local) - p[earth.index()];
            assert!((world.length() - 12.0).abs() < 1e-3);
            assert!(world.x.abs() < 1e-3, "YZ ring left the plane: {world:?}");
        }
    }

    #[test]
    fn fixed_bodies_have_no_ring() {
        let (mut system, sun, earth, _) = sun_earth_moon();
        let p = system.positions(0.0);
        assert!(system.ring_matrix(sun, &p).is_none());
        system.body_mut(earth).unwrap().show_ring = false;
        assert!(system.ring_matrix(earth, &p).is_none());
    }

    #[test]
    fn edited_bodies_keep_their_parent() {
        let (mut system, sun, earth, moon) = sun_earth_moon();
        let before = system.positions(2.0);
        {
            let e = system.body_mut(earth).unwrap();
            e.scale = 3.0;
            e.spin_rate = 4.0;
        }
        assert_eq!(system.positions(2.0), before);
        assert!(matches!(
            system.body(moon).unwrap().anchor(),
            Anchor::Orbiting { parent, .. } if *parent == earth
        ));
        assert_eq!(system.body(sun).unwrap().anchor(), &Anchor::Fixed(Vec3::ZERO));
    }

    #[test]
    fn ids_from_another_system_are_rejected() {
        let (_, _, _, moon) = sun_earth_moon();
        let mut small = OrbitSystem::new();
        small.add(Body::fixed("sun", Vec3::ZERO)).unwrap();
        let err = small
            .add(Body::orbiting("stray", moon, Orbit::new(1.0, OrbitPlane::XZ)))
            .unwrap_err();
        assert_eq!(err, SceneError::UnknownParent { parent: moon });
        assert_eq!(small.positions(0.0), vec![Vec3::ZERO]);
    }

    #[test]
    fn body_matrix_spins_in_place() {
        let body = Body::fixed("b", Vec3::ZERO)
            .with_spin(1.0, Vec3::Y)
            .with_scale(2.0);
        let pos = Vec3::new(5.0, 0.0, 0.0);
        let m = body.model_matrix(pos, std::f64::consts::FRAC_PI_2);
        assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(pos, 1e-5));
        // local +X spun a quarter turn about +Y, doubled
        let tip = m.transform_point3(Vec3::X);
        assert!(tip.abs_diff_eq(pos + Vec3::new(0.0, 0.0, -2.0), 1e-4));
    }

    #[test]
    fn find_by_name() {
        let (system, _, earth, _) = sun_earth_moon();
        assert_eq!(system.find("earth"), Some(earth));
        assert_eq!(system.find("pluto"), None);
    }
}
