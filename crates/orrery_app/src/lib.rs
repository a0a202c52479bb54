//! Desktop shell for the orrery: configuration, logging, the window and the
//! winit event loop that drives `orrery_core::SceneUpdateLoop`.

pub mod builder;
pub mod config;
pub mod graphics;
pub mod logging;
mod runner;
pub mod scene;

pub use builder::App;
pub use config::{ConfigError, OrreryConfig, DEFAULT_CONFIG_FILE};
pub use scene::{build_state, build_system, SceneBodies};
