use std::path::{Path, PathBuf};

use anyhow::Context as _;
use orrery_app::{logging, App, OrreryConfig};

fn main() {
    if let Err(e) = run() {
        log::error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let (config, used) = OrreryConfig::resolve(std::env::args_os().nth(1).map(PathBuf::from))?;
    logging::init(&config.log_level).context("failed to install logger")?;

    // Assets are looked up next to the config file that named them.
    let root = match &used {
        Some(path) => {
            log::info!("configuration loaded from {}", path.display());
            path.parent().map(Path::to_path_buf).unwrap_or_default()
        }
        None => {
            log::info!("no configuration file; using defaults");
            PathBuf::from(".")
        }
    };

    App::new(config).with_asset_root(root).run()
}
