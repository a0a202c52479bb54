//! The per-frame scene loop and the rendering seam it draws through.
//!
//! One call to [`SceneUpdateLoop::frame`] runs one whole iteration, always
//! in this order:
//!
//! 1. tick the frame clock;
//! 2. advance the animation clock by the frame delta;
//! 3. dispatch held keys, mouse travel and wheel travel;
//! 4. build view and projection from the camera;
//! 5. place every body, parents before children, at the shared animation
//!    time;
//! 6. submit the skybox, then bodies, then orbit rings.

use glam::{Mat3, Mat4, Vec3};

use crate::camera::OrbitDirection;
use crate::color::Color;
use crate::controller::{Action, NavigationMode};
use crate::orbit::BodyId;
use crate::scene::SceneState;
use crate::time::{MonotonicSource, Time, TimeClock, TimeSource};

/// What a draw command refers to.  The renderer maps these to its own GPU
/// resources and ignores any it has nothing registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Drawable {
    Skybox,
    Body(BodyId),
    OrbitRing(BodyId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub drawable: Drawable,
    pub model: Mat4,
    /// Flat colour for rings; white for textured drawables.
    pub color: Color,
}

/// Per-frame camera matrices shared by every draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    /// `view` with its translation removed, so the skybox stays centred on
    /// the eye.
    pub sky_view: Mat4,
    pub camera_position: Vec3,
}

impl FrameUniforms {
    pub fn new(view: Mat4, projection: Mat4, camera_position: Vec3) -> Self {
        Self {
            view,
            projection,
            sky_view: strip_translation(view),
            camera_position,
        }
    }
}

/// Rotation-only part of a view matrix.
pub fn strip_translation(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

/// Where a frame's draws go.
///
/// `begin_frame` receives the camera uniforms before any draw, `end_frame`
/// follows the last one.  Implementations never report failures back to the
/// loop; uploads are fire-and-forget.
pub trait SceneRenderer {
    fn begin_frame(&mut self, uniforms: &FrameUniforms);
    fn draw(&mut self, command: &DrawCommand);
    fn end_frame(&mut self);
}

/// Summary of one frame, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub time: Time,
    /// Animation time the bodies were placed at.
    pub elapsed: f64,
    pub running: bool,
    pub draw_calls: usize,
}

/// Drives one scene iteration per call.
pub struct SceneUpdateLoop<S: TimeSource = MonotonicSource> {
    clock: TimeClock<S>,
    positions: Vec<Vec3>,
}

impl SceneUpdateLoop<MonotonicSource> {
    pub fn new() -> Self {
        Self::with_source(MonotonicSource::new())
    }
}

impl Default for SceneUpdateLoop<MonotonicSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TimeSource> SceneUpdateLoop<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            clock: TimeClock::with_source(source),
            positions: Vec::new(),
        }
    }

    /// Body positions computed by the most recent frame, indexed by
    /// [`BodyId::index`].
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Run one frame against `state`, submitting draws to `renderer`.
    pub fn frame<R: SceneRenderer + ?Sized>(
        &mut self,
        state: &mut SceneState,
        renderer: &mut R,
    ) -> FrameReport {
        let time = self.clock.tick();
        state.clock.advance(f64::from(time.delta));

        dispatch_input(state, &time);

        let camera = &state.camera;
        let view = camera.view_matrix();
        let projection = camera.projection_matrix(
            state.input.aspect(),
            state.projection.near,
            state.projection.far,
        );
        let uniforms = FrameUniforms::new(view, projection, camera.position);

        let elapsed = state.clock.elapsed();
        state.system.positions_into(elapsed, &mut self.positions);

        renderer.begin_frame(&uniforms);
        let mut draw_calls = 0;
        let mut submit = |command: DrawCommand| {
            renderer.draw(&command);
            draw_calls += 1;
        };

        submit(DrawCommand {
            drawable: Drawable::Skybox,
            model: Mat4::IDENTITY,
            color: Color::WHITE,
        });
        for ((id, body), position) in state.system.iter().zip(&self.positions) {
            submit(DrawCommand {
                drawable: Drawable::Body(id),
                model: body.model_matrix(*position, elapsed),
                color: Color::WHITE,
            });
        }
        for (id, body) in state.system.iter() {
            if let Some(model) = state.system.ring_matrix(id, &self.positions) {
                submit(DrawCommand {
                    drawable: Drawable::OrbitRing(id),
                    model,
                    color: body.ring_color,
                });
            }
        }
        renderer.end_frame();

        FrameReport {
            time,
            elapsed,
            running: state.clock.is_running(),
            draw_calls,
        }
    }
}

fn dispatch_input(state: &mut SceneState, time: &Time) {
    for action in state.bindings.active_actions(&state.input) {
        match action {
            Action::Move(direction) => state.camera.move_in(direction, time.delta),
            Action::Orbit(direction) => orbit_camera(state, direction, time.delta),
            Action::ToggleAnimation => {
                if state.clock.toggle(time.now) {
                    log::info!("animation {:?} at t={:.2}s", state.clock.state(), state.clock.elapsed());
                }
            }
            Action::Exit => {
                log::info!("exit requested");
                state.input.request_close();
            }
        }
    }

    // Screen y grows downwards; pitch grows upwards.
    let (dx, dy) = state.input.consume_mouse_delta();
    if state.mode == NavigationMode::Fly && (dx != 0.0 || dy != 0.0) {
        state.camera.rotate(dx, -dy);
    }

    let scroll = state.input.consume_scroll_delta();
    if scroll != 0.0 {
        state.camera.zoom_by(scroll);
    }
}

fn orbit_camera(state: &mut SceneState, direction: OrbitDirection, dt: f32) {
    let angle = state.orbit_speed * dt;
    state.camera.orbit(direction, state.orbit_radius, angle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sky_view_keeps_rotation_only() {
        let view = Mat4::look_at_rh(Vec3::new(10.0, 5.0, -3.0), Vec3::ZERO, Vec3::Y);
        let sky = strip_translation(view);
        assert!(sky.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::ZERO, 1e-6));
        let dir = Vec3::new(0.3, -0.2, 0.9);
        assert!(sky
            .transform_vector3(dir)
            .abs_diff_eq(view.transform_vector3(dir), 1e-5));
    }

    #[test]
    fn uniforms_derive_sky_view() {
        let view = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let u = FrameUniforms::new(view, Mat4::IDENTITY, Vec3::ZERO);
        assert_eq!(u.sky_view, Mat4::IDENTITY);
    }
}
