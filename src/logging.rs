//! `env_logger` bootstrap shared by binaries.

use log::LevelFilter;

/// Pick the level: `-v` flags win, then the configured level, then `warn`.
pub fn level_filter(configured: Option<&str>, verbose: u8) -> LevelFilter {
    match verbose {
        0 => configured
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger. Safe to call more than once; later calls are ignored.
pub fn init_logging(configured: Option<&str>, verbose: u8) {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level_filter(configured, verbose))
        .format_target(false)
        .try_init();
}
