use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Pitch limit in degrees.  Past ±90° the look-at basis flips.
pub const PITCH_LIMIT: f32 = 89.0;

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// Free-flight movement directions, relative to the camera basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Directions for orbiting around the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbitDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Start-up camera parameters, read from the `[camera]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    /// Degrees; −90 looks down −Z.
    pub yaw: f32,
    /// Degrees, clamped to ±89.
    pub pitch: f32,
    /// World units per second.
    pub movement_speed: f32,
    /// Degrees per pixel of mouse travel.
    pub mouse_sensitivity: f32,
    /// Initial vertical field of view in degrees.
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 20.0, 180.0),
            yaw: DEFAULT_YAW,
            pitch: -6.0,
            movement_speed: 25.0,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

/// Yaw/pitch camera with a derived orthonormal basis.
///
/// The basis (`front`, `right`, `up`) is private and re-derived from yaw and
/// pitch after every mutation, so callers always see a consistent frame.
#[derive(Debug, Clone)]
pub struct Camera {
    // --- view parameters --------------------------------------------------
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    // --- projection parameters --------------------------------------------
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    // --- input tuning -----------------------------------------------------
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}

impl Camera {
    /// Camera at `position` looking down −Z with default tuning.
    pub fn new(position: Vec3) -> Self {
        Self::with_orientation(position, DEFAULT_YAW, DEFAULT_PITCH)
    }

    /// Camera at `position` with the given yaw/pitch in degrees.
    pub fn with_orientation(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
        };
        camera.update_vectors();
        camera
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        let mut camera = Self::with_orientation(settings.position, settings.yaw, settings.pitch);
        camera.movement_speed = settings.movement_speed;
        camera.mouse_sensitivity = settings.mouse_sensitivity;
        camera.set_zoom_range(settings.min_zoom, settings.max_zoom);
        camera.zoom = settings.zoom.clamp(camera.min_zoom, camera.max_zoom);
        camera
    }

    // ── Accessors ────────────────────────────────────────────────────────

    #[inline]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_range(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    /// Set the allowed field-of-view range.  Bounds are swapped if given in
    /// the wrong order; the current zoom is re-clamped.
    pub fn set_zoom_range(&mut self, min: f32, max: f32) {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.min_zoom = lo;
        self.max_zoom = hi;
        self.zoom = self.zoom.clamp(lo, hi);
    }

    // ── Interaction ──────────────────────────────────────────────────────

    /// Displace the camera along its basis by `movement_speed * dt`.
    pub fn move_in(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        let axis = match direction {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Right => self.right,
            CameraMovement::Left => -self.right,
            CameraMovement::Up => self.up,
            CameraMovement::Down => -self.up,
        };
        self.position += axis * velocity;
    }

    /// Mouse-look: offsets are in pixels, scaled by `mouse_sensitivity`.
    pub fn rotate(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Swing the camera `angle_degrees` around the world origin, keeping
    /// it `orbit_radius` away, then re-aim it at the origin.
    ///
    /// LEFT/RIGHT turn the position about world +Y, UP/DOWN about world +X.
    /// Directly above or below the origin the pitch limit keeps the view a
    /// degree short of looking straight at it.  A camera sitting on the
    /// origin is pushed out along +Z.
    pub fn orbit(&mut self, direction: OrbitDirection, orbit_radius: f32, angle_degrees: f32) {
        let (axis, angle) = match direction {
            OrbitDirection::Left => (Vec3::Y, -angle_degrees),
            OrbitDirection::Right => (Vec3::Y, angle_degrees),
            // a positive turn about +X carries +Z towards -Y
            OrbitDirection::Up => (Vec3::X, -angle_degrees),
            OrbitDirection::Down => (Vec3::X, angle_degrees),
        };
        let outward = (Quat::from_axis_angle(axis, angle.to_radians()) * self.position)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        self.position = outward * orbit_radius.max(0.0);
        self.look_along(-outward);
    }

    /// Narrow (positive delta) or widen the field of view.
    pub fn zoom_by(&mut self, scroll_delta: f32) {
        self.zoom = (self.zoom - scroll_delta).clamp(self.min_zoom, self.max_zoom);
    }

    // ── Matrices ─────────────────────────────────────────────────────────

    /// World → view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Right-handed perspective with `zoom` as the vertical field of view
    /// and a 0..1 depth range.
    pub fn projection_matrix(&self, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, znear, zfar)
    }

    // ── Internals ────────────────────────────────────────────────────────

    /// Point the camera along `direction` by re-deriving yaw and pitch.
    fn look_along(&mut self, direction: Vec3) {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.pitch = dir
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(c: &Camera) {
        let (f, r, u) = (c.front(), c.right(), c.up());
        assert!((f.length() - 1.0).abs() < EPS, "front {f:?}");
        assert!((r.length() - 1.0).abs() < EPS, "right {r:?}");
        assert!((u.length() - 1.0).abs() < EPS, "up {u:?}");
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
    }

    #[test]
    fn default_looks_down_negative_z() {
        let c = Camera::default();
        assert!(c.front().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(c.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(c.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn basis_orthonormal_over_yaw_pitch_grid() {
        let mut yaw = -179.0_f32;
        while yaw <= 180.0 {
            let mut pitch = -88.5_f32;
            while pitch < 89.0 {
                let c = Camera::with_orientation(Vec3::ZERO, yaw, pitch);
                assert_orthonormal(&c);
                pitch += 3.5;
            }
            yaw += 6.5;
        }
    }

    #[test]
    fn pitch_is_clamped() {
        let mut c = Camera::default();
        c.rotate(0.0, 10_000.0);
        assert_eq!(c.pitch(), PITCH_LIMIT);
        assert_orthonormal(&c);
        c.rotate(0.0, -50_000.0);
        assert_eq!(c.pitch(), -PITCH_LIMIT);
        assert_orthonormal(&c);
    }

    #[test]
    fn rotate_scales_by_sensitivity() {
        let mut c = Camera::default();
        c.rotate(100.0, 50.0);
        assert!((c.yaw() - (DEFAULT_YAW + 10.0)).abs() < 1e-4);
        assert!((c.pitch() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn move_forward_follows_front() {
        let mut c = Camera::default();
        c.movement_speed = 4.0;
        c.move_in(CameraMovement::Forward, 0.5);
        assert!(c.position.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5));
        c.move_in(CameraMovement::Right, 0.25);
        assert!(c.position.abs_diff_eq(Vec3::new(1.0, 0.0, 1.0), 1e-5));
        c.move_in(CameraMovement::Down, 1.0);
        assert!(c.position.abs_diff_eq(Vec3::new(1.0, -4.0, 1.0), 1e-5));
    }

    #[test]
    fn zoom_stays_in_range_for_any_scroll_sequence() {
        let mut c = Camera::default();
        let deltas = [3.0, 100.0, -7.5, -1e6, 0.25, 44.0, -0.5, 1e9, f32::MIN_POSITIVE];
        for d in deltas {
            c.zoom_by(d);
            let (lo, hi) = c.zoom_range();
            assert!(c.zoom() >= lo && c.zoom() <= hi, "zoom {} after {d}", c.zoom());
        }
    }

    #[test]
    fn zoom_moves_opposite_to_scroll() {
        let mut c = Camera::default();
        c.zoom_by(5.0);
        assert_eq!(c.zoom(), 40.0);
        c.zoom_by(-2.0);
        assert_eq!(c.zoom(), 42.0);
    }

    #[test]
    fn orbit_keeps_radius_and_faces_origin() {
        let mut c = Camera::new(Vec3::new(0.0, 0.0, 50.0));
        let dirs = [
            OrbitDirection::Left,
            OrbitDirection::Up,
            OrbitDirection::Right,
            OrbitDirection::Right,
            OrbitDirection::Down,
            OrbitDirection::Left,
        ];
        for dir in dirs {
            c.orbit(dir, 40.0, 15.0);
            assert!((c.position.length() - 40.0).abs() < 1e-3);
            let to_origin = (-c.position).normalize();
            assert!(c.front().abs_diff_eq(to_origin, 1e-4));
            assert_orthonormal(&c);
        }
    }

    #[test]
    fn orbit_left_moves_against_right_vector() {
        let mut c = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        c.orbit(OrbitDirection::Left, 10.0, 10.0);
        assert!(c.position.x < 0.0);
        let mut c = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        c.orbit(OrbitDirection::Up, 10.0, 10.0);
        assert!(c.position.y > 0.0);
    }

    #[test]
    fn vertical_orbit_turns_about_world_x() {
        // on the X axis itself nothing moves
        let mut c = Camera::new(Vec3::new(10.0, 0.0, 0.0));
        c.orbit(OrbitDirection::Up, 10.0, 30.0);
        assert!(c.position.abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-4));
        assert!(c.front().abs_diff_eq(Vec3::NEG_X, 1e-4));

        // the x component is preserved off-axis too
        let mut c = Camera::new(Vec3::new(3.0, 0.0, 4.0));
        c.orbit(OrbitDirection::Down, 5.0, 90.0);
        assert!(c.position.abs_diff_eq(Vec3::new(3.0, -4.0, 0.0), 1e-4));
    }

    #[test]
    fn vertical_orbit_passes_over_the_pole() {
        let mut c = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        for _ in 0..9 {
            c.orbit(OrbitDirection::Up, 10.0, 10.0);
        }
        // straight overhead: the view stops at the pitch limit
        assert!(c.position.abs_diff_eq(Vec3::new(0.0, 10.0, 0.0), 1e-3));
        assert!((c.pitch() + PITCH_LIMIT).abs() < 1e-3);
        assert_orthonormal(&c);

        for _ in 0..27 {
            c.orbit(OrbitDirection::Up, 10.0, 10.0);
            assert!((c.position.length() - 10.0).abs() < 1e-3);
            assert_orthonormal(&c);
        }
        // a full turn brings it back
        assert!(c.position.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-3));
        assert!(c.front().abs_diff_eq(Vec3::NEG_Z, 1e-3));
    }

    #[test]
    fn orbit_from_origin_pushes_out_along_z() {
        let mut c = Camera::new(Vec3::ZERO);
        c.orbit(OrbitDirection::Right, 5.0, 30.0);
        assert!(c.position.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-4));
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let c = Camera::with_orientation(Vec3::new(4.0, -2.0, 9.0), 30.0, 20.0);
        let eye_in_view = c.view_matrix().transform_point3(c.position);
        assert!(eye_in_view.abs_diff_eq(Vec3::ZERO, 1e-4));
        let ahead = c.view_matrix().transform_point3(c.position + c.front());
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn settings_are_applied_and_clamped() {
        let settings = CameraSettings {
            zoom: 80.0,
            min_zoom: 10.0,
            max_zoom: 60.0,
            pitch: 120.0,
            ..Default::default()
        };
        let c = Camera::from_settings(&settings);
        assert_eq!(c.zoom(), 60.0);
        assert_eq!(c.pitch(), PITCH_LIMIT);
        assert_eq!(c.movement_speed, settings.movement_speed);
    }

    #[test]
    fn degenerate_aspect_falls_back_to_square() {
        let c = Camera::default();
        assert_eq!(c.projection_matrix(0.0, 0.1, 100.0), c.projection_matrix(1.0, 0.1, 100.0));
    }
}
