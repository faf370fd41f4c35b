//! Logger setup.

use log::LevelFilter;

/// Picks the log level: `RUST_LOG` when it names a level, otherwise the
/// configured one, otherwise `info`.
pub fn resolve_level(configured: &str) -> LevelFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| parse_level(&level))
        .or_else(|| parse_level(configured))
        .unwrap_or(LevelFilter::Info)
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    s.trim().parse().ok()
}

/// Installs the global logger, writing timestamped lines to stderr.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
