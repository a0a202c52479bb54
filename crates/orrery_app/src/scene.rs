//! Turns an [`OrreryConfig`] into the sun/earth/moon scene and uploads the
//! assets it names.
use std::path::Path;

use orrery_assets::{load_cubemap, load_mesh, CubemapFaces};
use orrery_core::{AnimationClock, Body, BodyId, Camera, OrbitSystem, SceneError, SceneState};
use orrery_render::Renderer;

use crate::config::{BodyConfig, OrreryConfig};

/// Ids of the three bodies, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneBodies {
    pub sun: BodyId,
    pub earth: BodyId,
    pub moon: BodyId,
}

impl SceneBodies {
    fn named<'a>(&self, config: &'a OrreryConfig) -> [(BodyId, &'static str, &'a BodyConfig); 3] {
        [
            (self.sun, "sun", &config.sun),
            (self.earth, "earth", &config.earth),
            (self.moon, "moon", &config.moon),
        ]
    }
}

/// Sun fixed at the origin, earth orbiting the sun, moon orbiting the earth.
pub fn build_system(config: &OrreryConfig) -> Result<(OrbitSystem, SceneBodies), SceneError> {
    let mut system = OrbitSystem::new();
    let sun = system.add(body(Body::fixed("sun", glam::Vec3::ZERO), &config.sun))?;
    let earth = system.add(body(Body::orbiting("earth", sun, config.earth.orbit), &config.earth))?;
    let moon = system.add(body(Body::orbiting("moon", earth, config.moon.orbit), &config.moon))?;
    Ok((system, SceneBodies { sun, earth, moon }))
}

/// The full per-frame state: camera, clock, navigation and bodies.
pub fn build_state(config: &OrreryConfig) -> Result<(SceneState, SceneBodies), SceneError> {
    let (system, bodies) = build_system(config)?;

    let mut clock = AnimationClock::with_debounce(config.animation.debounce);
    clock.set_running(!config.animation.start_paused);

    let nav = &config.navigation;
    let state = SceneState::new(Camera::from_settings(&config.camera), system)
        .with_mode(nav.mode)
        .with_orbit(nav.orbit_radius, nav.orbit_speed)
        .with_projection(config.projection)
        .with_clock(clock);
    Ok((state, bodies))
}

/// Load every mesh and the skybox, resolving relative paths against `root`.
/// Missing files are logged by the loaders and leave that drawable out.
pub fn load_assets(renderer: &mut Renderer, config: &OrreryConfig, bodies: &SceneBodies, root: &Path) {
    for (id, name, cfg) in bodies.named(config) {
        let path = root.join(&cfg.mesh);
        log::info!("loading {name} mesh from {}", path.display());
        renderer.register_mesh(id, name, &load_mesh(&path));
    }

    let faces = resolve_faces(&config.skybox.faces(), root);
    let cube = load_cubemap(&faces);
    log::info!("skybox loaded at {0}x{0}", cube.size);
    renderer.set_skybox(&cube);
    renderer.set_clear_color(config.window.clear_color);
}

fn resolve_faces(faces: &CubemapFaces, root: &Path) -> CubemapFaces {
    CubemapFaces {
        right: root.join(&faces.right),
        left: root.join(&faces.left),
        top: root.join(&faces.top),
        bottom: root.join(&faces.bottom),
        front: root.join(&faces.front),
        back: root.join(&faces.back),
    }
}

fn body(body: Body, cfg: &BodyConfig) -> Body {
    body.with_scale(cfg.scale)
        .with_spin(cfg.spin_rate, cfg.spin_axis)
        .with_ring(cfg.show_ring)
        .with_ring_color(cfg.ring_color)
}
