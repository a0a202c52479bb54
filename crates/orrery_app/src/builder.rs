use std::path::PathBuf;

use crate::config::OrreryConfig;

/// Entry point for the viewer.  Builder-style overrides on top of a loaded
/// [`OrreryConfig`]:
///
/// ```no_run
/// use orrery_app::{App, OrreryConfig};
///
/// App::new(OrreryConfig::default())
///     .with_title("Orrery")
///     .with_size(1600, 900)
///     .run()
///     .unwrap();
/// ```
pub struct App {
    config: OrreryConfig,
    asset_root: PathBuf,
}

impl App {
    pub fn new(config: OrreryConfig) -> Self {
        Self {
            config,
            asset_root: PathBuf::from("."),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.window.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.window.width = width;
        self.config.window.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.window.vsync = vsync;
        self
    }

    /// Directory that relative mesh and skybox paths are resolved against.
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    /// Open the window and run until it closes.
    pub fn run(self) -> anyhow::Result<()> {
        crate::runner::run_internal(self.config, self.asset_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_land_in_window_section() {
        let app = App::new(OrreryConfig::default())
            .with_title("Orrery")
            .with_size(800, 600)
            .with_vsync(false);
        let window = &app.config().window;
        assert_eq!(window.title, "Orrery");
        assert_eq!((window.width, window.height), (800, 600));
        assert!(!window.vsync);
    }
}
