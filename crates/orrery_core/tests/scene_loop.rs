use std::cell::Cell;
use std::rc::Rc;

use orrery_core::glam::{Mat4, Vec3};
use orrery_core::{
    AnimationState, Body, BodyId, Camera, DrawCommand, Drawable, FrameUniforms, KeyCode,
    NavigationMode, Orbit, OrbitPlane, OrbitSystem, SceneRenderer, SceneState, SceneUpdateLoop,
    TimeSource,
};

#[derive(Clone)]
struct ManualTime(Rc<Cell<f64>>);

impl TimeSource for ManualTime {
    fn now(&self) -> f64 {
        self.0.get()
    }
}

#[derive(Default)]
struct Recorder {
    uniforms: Vec<FrameUniforms>,
    draws: Vec<DrawCommand>,
    ended: usize,
}

impl SceneRenderer for Recorder {
    fn begin_frame(&mut self, uniforms: &FrameUniforms) {
        self.uniforms.push(*uniforms);
        self.draws.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.draws.push(*command);
    }

    fn end_frame(&mut self) {
        self.ended += 1;
    }
}

struct Harness {
    now: Rc<Cell<f64>>,
    scene: SceneUpdateLoop<ManualTime>,
    state: SceneState,
    renderer: Recorder,
    earth: BodyId,
    moon: BodyId,
}

impl Harness {
    fn new(mode: NavigationMode) -> Self {
        let mut system = OrbitSystem::new();
        let sun = system.add(Body::fixed("sun", Vec3::ZERO).with_scale(20.0)).unwrap();
        let earth = system
            .add(
                Body::orbiting("earth", sun, Orbit::new(100.0, OrbitPlane::XZ).with_rate(0.5))
                    .with_spin(1.0, Vec3::Y),
            )
            .unwrap();
        let moon = system
            .add(Body::orbiting("moon", earth, Orbit::new(12.0, OrbitPlane::YZ).with_rate(2.0)))
            .unwrap();

        let mut state = SceneState::new(Camera::new(Vec3::new(0.0, 0.0, 150.0)), system)
            .with_mode(mode)
            .with_orbit(150.0, 90.0);
        state.input.set_framebuffer_size(800, 600);

        let now = Rc::new(Cell::new(0.0));
        let scene = SceneUpdateLoop::with_source(ManualTime(now.clone()));
        Self {
            now,
            scene,
            state,
            renderer: Recorder::default(),
            earth,
            moon,
        }
    }

    fn frame_at(&mut self, now: f64) -> orrery_core::FrameReport {
        self.now.set(now);
        self.scene.frame(&mut self.state, &mut self.renderer)
    }

    fn position(&self, id: BodyId) -> Vec3 {
        self.scene.positions()[id.index()]
    }
}

#[test]
fn draws_skybox_then_bodies_then_rings() {
    let mut h = Harness::new(NavigationMode::Fly);
    let report = h.frame_at(0.016);

    let order: Vec<Drawable> = h.renderer.draws.iter().map(|d| d.drawable).collect();
    let ids: Vec<BodyId> = h.state.system.iter().map(|(id, _)| id).collect();
    assert_eq!(
        order,
        vec![
            Drawable::Skybox,
            Drawable::Body(ids[0]),
            Drawable::Body(ids[1]),
            Drawable::Body(ids[2]),
            Drawable::OrbitRing(ids[1]),
            Drawable::OrbitRing(ids[2]),
        ]
    );
    assert_eq!(report.draw_calls, 6);
    assert_eq!(h.renderer.ended, 1);
}

#[test]
fn earth_starts_on_positive_z() {
    let mut h = Harness::new(NavigationMode::Fly);
    h.frame_at(0.016);
    assert!(h.position(h.earth).abs_diff_eq(Vec3::new(0.0, 0.0, 100.0), 1e-4));

    let earth_draw = h.renderer.draws[2];
    assert_eq!(earth_draw.drawable, Drawable::Body(h.earth));
    let origin = earth_draw.model.transform_point3(Vec3::ZERO);
    assert!(origin.abs_diff_eq(Vec3::new(0.0, 0.0, 100.0), 1e-4));
}

#[test]
fn paused_clock_freezes_bodies() {
    let mut h = Harness::new(NavigationMode::Fly);
    h.frame_at(0.05);
    let before = h.position(h.moon);
    h.frame_at(0.10);
    h.frame_at(0.15);
    assert_eq!(h.position(h.moon), before);
    assert_eq!(h.state.clock.elapsed(), 0.0);
}

#[test]
fn toggle_key_starts_motion_once_per_window() {
    let mut h = Harness::new(NavigationMode::Fly);
    h.state.input.update_key(KeyCode::KeyP, true);
    // held across several frames inside the debounce window
    for now in [0.10, 0.15, 0.20, 0.25] {
        h.frame_at(now);
    }
    assert_eq!(h.state.clock.state(), AnimationState::Running);

    // past the window the held key flips it back
    h.frame_at(0.35);
    assert_eq!(h.state.clock.state(), AnimationState::Paused);
}

#[test]
fn running_clock_moves_bodies() {
    let mut h = Harness::new(NavigationMode::Fly);
    h.state.input.update_key(KeyCode::KeyP, true);
    h.frame_at(0.05);
    h.state.input.update_key(KeyCode::KeyP, false);
    let start = h.position(h.earth);

    let report = h.frame_at(0.10);
    assert!(report.running);
    assert!((report.elapsed - 0.05).abs() < 1e-6);
    assert_ne!(h.position(h.earth), start);
}

#[test]
fn moon_follows_this_frames_earth() {
    let mut h = Harness::new(NavigationMode::Fly);
    h.state.clock.set_running(true);
    let mut now = 0.0;
    for _ in 0..20 {
        now += 0.07;
        h.frame_at(now);
        let offset = h.position(h.moon) - h.position(h.earth);
        assert!((offset.length() - 12.0).abs() < 1e-3, "{offset:?}");
        assert!(offset.x.abs() < 1e-3);
    }

    // the moon's ring is centred on the current earth
    let ring = h
        .renderer
        .draws
        .iter()
        .find(|d| d.drawable == Drawable::OrbitRing(h.moon))
        .unwrap();
    let centre = ring.model.transform_point3(Vec3::ZERO);
    assert!(centre.abs_diff_eq(h.position(h.earth), 1e-3));
}

#[test]
fn skybox_view_ignores_camera_position() {
    let mut h = Harness::new(NavigationMode::Fly);
    h.frame_at(0.016);
    let u = h.renderer.uniforms[0];
    assert_eq!(u.camera_position, Vec3::new(0.0, 0.0, 150.0));
    assert!(u.sky_view.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::ZERO, 1e-5));
    assert_ne!(u.view, u.sky_view);
    assert_ne!(u.projection, Mat4::IDENTITY);
}

#[test]
fn escape_requests_close() {
    let mut h = Harness::new(NavigationMode::Orbit);
    assert!(!h.state.input.should_close());
    h.state.input.update_key(KeyCode::Escape, true);
    h.frame_at(0.016);
    assert!(h.state.input.should_close());
}

#[test]
fn fly_mode_mouse_look_inverts_screen_y() {
    let mut h = Harness::new(NavigationMode::Fly);
    let yaw = h.state.camera.yaw();
    h.state.input.add_mouse_motion(10.0, 20.0);
    h.frame_at(0.016);
    assert!((h.state.camera.yaw() - (yaw + 1.0)).abs() < 1e-4);
    // moving the mouse down looks down
    assert!((h.state.camera.pitch() + 2.0).abs() < 1e-4);
    assert_eq!(h.state.input.consume_mouse_delta(), (0.0, 0.0));
}

#[test]
fn orbit_mode_ignores_mouse_and_keeps_radius() {
    let mut h = Harness::new(NavigationMode::Orbit);
    h.state.input.add_mouse_motion(50.0, 50.0);
    h.state.input.update_key(KeyCode::ArrowLeft, true);
    let mut now = 0.0;
    for _ in 0..10 {
        now += 0.05;
        h.frame_at(now);
    }
    let camera = &h.state.camera;
    assert!((camera.position.length() - 150.0).abs() < 1e-2);
    let to_origin = (-camera.position).normalize();
    assert!(camera.front().abs_diff_eq(to_origin, 1e-4));
    // still level: orbiting left never touched pitch
    assert!(camera.pitch().abs() < 1e-3);
}

#[test]
fn fly_keys_move_along_front() {
    let mut h = Harness::new(NavigationMode::Fly);
    h.state.camera.movement_speed = 10.0;
    h.state.input.update_key(KeyCode::KeyW, true);
    h.frame_at(0.1);
    assert!(h
        .state
        .camera
        .position
        .abs_diff_eq(Vec3::new(0.0, 0.0, 149.0), 1e-4));
}

#[test]
fn scroll_zooms_in() {
    let mut h = Harness::new(NavigationMode::Fly);
    h.state.input.add_scroll(5.0);
    h.frame_at(0.016);
    assert_eq!(h.state.camera.zoom(), 40.0);
}
