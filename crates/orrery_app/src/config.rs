//! TOML configuration.
//!
//! Every section is optional.  A file is merged key by key over
//! [`OrreryConfig::default`], so a partial `[earth]` section keeps the
//! earth's default orbit for every key it leaves out.
//!
//! ```toml
//! log_level = "debug"
//!
//! [navigation]
//! mode = "orbit"
//! orbit_radius = 220.0
//!
//! [earth]
//! scale = 6.0
//! orbit = { radius = 120.0, angular_rate = 0.3 }
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use orrery_assets::CubemapFaces;
use orrery_core::{CameraSettings, Color, NavigationMode, Orbit, OrbitPlane, Projection, DEFAULT_DEBOUNCE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "orrery.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialise configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Shown only where the skybox does not cover.
    pub clear_color: Color,
    /// Hide and lock the cursor for mouse look.
    pub grab_cursor: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Solar System".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            clear_color: Color::BLACK,
            grab_cursor: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub mode: NavigationMode,
    /// Distance from the origin held in orbit mode.
    pub orbit_radius: f32,
    /// Degrees per second while an orbit key is held.
    pub orbit_speed: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            mode: NavigationMode::Fly,
            orbit_radius: 180.0,
            orbit_speed: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub start_paused: bool,
    /// Seconds a toggle key is ignored after an accepted toggle.
    pub debounce: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            start_paused: true,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// One scene body.  `orbit` is ignored for the sun.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub mesh: PathBuf,
    pub scale: f32,
    /// Radians per second about `spin_axis`.
    pub spin_rate: f32,
    pub spin_axis: Vec3,
    pub orbit: Orbit,
    pub show_ring: bool,
    pub ring_color: Color,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            mesh: PathBuf::new(),
            scale: 1.0,
            spin_rate: 0.0,
            spin_axis: Vec3::Y,
            orbit: Orbit::default(),
            show_ring: true,
            ring_color: Color::LIGHT_GRAY,
        }
    }
}

impl BodyConfig {
    pub fn sun() -> Self {
        Self {
            mesh: PathBuf::from("models/sun.glb"),
            scale: 20.0,
            spin_rate: 0.05,
            show_ring: false,
            ..Default::default()
        }
    }

    pub fn earth() -> Self {
        Self {
            mesh: PathBuf::from("models/earth.glb"),
            scale: 5.0,
            spin_rate: 1.0,
            orbit: Orbit::new(100.0, OrbitPlane::XZ).with_rate(0.5),
            ring_color: Color::SKY_BLUE,
            ..Default::default()
        }
    }

    pub fn moon() -> Self {
        Self {
            mesh: PathBuf::from("models/moon.glb"),
            scale: 1.5,
            spin_rate: 0.2,
            orbit: Orbit::new(15.0, OrbitPlane::YZ).with_rate(2.0),
            ring_color: Color::LIGHT_GRAY,
            ..Default::default()
        }
    }
}

/// Six skybox face images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyboxConfig {
    pub right: PathBuf,
    pub left: PathBuf,
    pub top: PathBuf,
    pub bottom: PathBuf,
    pub front: PathBuf,
    pub back: PathBuf,
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        let f = CubemapFaces::in_dir("skybox", "jpg");
        Self {
            right: f.right,
            left: f.left,
            top: f.top,
            bottom: f.bottom,
            front: f.front,
            back: f.back,
        }
    }
}

impl SkyboxConfig {
    pub fn faces(&self) -> CubemapFaces {
        CubemapFaces {
            right: self.right.clone(),
            left: self.left.clone(),
            top: self.top.clone(),
            bottom: self.bottom.clone(),
            front: self.front.clone(),
            back: self.back.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.  `ORRERY_LOG` wins.
    pub log_level: String,
    pub window: WindowConfig,
    pub camera: CameraSettings,
    pub navigation: NavigationConfig,
    pub animation: AnimationConfig,
    pub projection: Projection,
    pub sun: BodyConfig,
    pub earth: BodyConfig,
    pub moon: BodyConfig,
    pub skybox: SkyboxConfig,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            camera: CameraSettings::default(),
            navigation: NavigationConfig::default(),
            animation: AnimationConfig::default(),
            projection: Projection::default(),
            sun: BodyConfig::sun(),
            earth: BodyConfig::earth(),
            moon: BodyConfig::moon(),
            skybox: SkyboxConfig::default(),
        }
    }
}

impl OrreryConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse `content` and lay it over the defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let user: toml::Table = toml::from_str(content)?;
        let mut merged = match toml::Value::try_from(Self::default()) {
            Ok(toml::Value::Table(table)) => table,
            _ => toml::Table::new(),
        };
        merge(&mut merged, user);
        toml::Value::Table(merged).try_into()
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Config for this run: the path in `arg` if given, else
    /// [`DEFAULT_CONFIG_FILE`] when it exists, else the defaults.  Returns
    /// the path actually read, if any.
    pub fn resolve(arg: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = arg.or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        });
        match path {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }
}

/// Recursively overlay `over` onto `base`.  Tables merge; any other value
/// replaces.
fn merge(base: &mut toml::Table, over: toml::Table) {
    for (key, value) in over {
        let toml::Value::Table(incoming) = value else {
            base.insert(key, value);
            continue;
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge(existing, incoming);
            continue;
        }
        base.insert(key, toml::Value::Table(incoming));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let config = OrreryConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = OrreryConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(OrreryConfig::from_toml("").unwrap(), OrreryConfig::default());
    }

    #[test]
    fn partial_body_keeps_its_own_defaults() {
        let config = OrreryConfig::from_toml(
            r#"
            [earth]
            scale = 6.0
            orbit = { angular_rate = 0.3 }
            "#,
        )
        .unwrap();
        assert_eq!(config.earth.scale, 6.0);
        assert_eq!(config.earth.orbit.angular_rate, 0.3);
        // untouched earth keys are the earth's, not a generic body's
        assert_eq!(config.earth.orbit.radius, 100.0);
        assert_eq!(config.earth.orbit.plane, OrbitPlane::XZ);
        assert_eq!(config.earth.mesh, PathBuf::from("models/earth.glb"));
        assert_eq!(config.moon, BodyConfig::moon());
    }

    #[test]
    fn navigation_and_sections_parse() {
        let config = OrreryConfig::from_toml(
            r#"
            log_level = "debug"

            [window]
            title = "Orrery"
            vsync = false

            [navigation]
            mode = "orbit"
            orbit_radius = 220.0

            [moon]
            orbit = { plane = "xy" }
            ring_color = { r = 1.0, g = 0.5, b = 0.0 }

            [projection]
            far = 2000.0
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.window.title, "Orrery");
        assert!(!config.window.vsync);
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.navigation.mode, NavigationMode::Orbit);
        assert_eq!(config.navigation.orbit_radius, 220.0);
        assert_eq!(config.navigation.orbit_speed, 45.0);
        assert_eq!(config.moon.orbit.plane, OrbitPlane::XY);
        assert_eq!(config.moon.ring_color, Color::rgb(1.0, 0.5, 0.0));
        assert_eq!(config.projection.near, 0.1);
        assert_eq!(config.projection.far, 2000.0);
    }

    #[test]
    fn bad_types_are_parse_errors() {
        assert!(OrreryConfig::from_toml("[window]\nwidth = \"wide\"").is_err());
        assert!(OrreryConfig::from_toml("not = [valid").is_err());
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let err = OrreryConfig::resolve(Some(PathBuf::from("/no/such/orrery.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("orrery-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[animation]\nstart_paused = false\n").unwrap();
        let (config, used) = OrreryConfig::resolve(Some(path.clone())).unwrap();
        assert!(!config.animation.start_paused);
        assert_eq!(config.animation.debounce, DEFAULT_DEBOUNCE);
        assert_eq!(used, Some(path.clone()));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn skybox_faces_keep_order() {
        let faces = SkyboxConfig::default().faces();
        assert_eq!(faces.top, PathBuf::from("skybox/top.jpg"));
        assert_eq!(faces.back, PathBuf::from("skybox/back.jpg"));
    }
}
