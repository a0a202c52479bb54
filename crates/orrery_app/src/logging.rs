use std::time::{SystemTime, UNIX_EPOCH};

use log::LevelFilter;

/// Environment variable that overrides the configured log level.
pub const LOG_ENV: &str = "ORRERY_LOG";

/// Install the global logger: `[HH:MM:SS LEVEL target] message` on stderr.
///
/// `ORRERY_LOG`, when set to a valid level, wins over `configured`.  wgpu
/// and naga are held at `warn` unless the chosen level is `trace`.
pub fn init(configured: &str) -> Result<(), log::SetLoggerError> {
    let level = resolve_level(std::env::var(LOG_ENV).ok().as_deref(), configured);
    let deps = if level == LevelFilter::Trace { level } else { level.min(LevelFilter::Warn) };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                clock_time(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("wgpu_core", deps)
        .level_for("wgpu_hal", deps)
        .level_for("naga", deps)
        .chain(std::io::stderr())
        .apply()
}

/// Level from the environment if it parses, else from the config, else
/// `info`.
pub fn resolve_level(env: Option<&str>, configured: &str) -> LevelFilter {
    env.and_then(|v| v.trim().parse().ok())
        .or_else(|| configured.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// `HH:MM:SS` (UTC) for a wall-clock instant.
fn clock_time(now: SystemTime) -> String {
    let secs = now.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0) % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
