//! Logging setup over `env_logger`

/// Install `env_logger` at `level`, still overridable through `RUST_LOG`
///
/// Returns `false` if a `log` backend was already installed; that backend is kept.
pub fn init_with_level(level: log::LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .try_init()
        .is_ok()
}

/// Install the default logger at `info` unless one is already installed
pub fn init() -> bool {
    init_with_level(log::LevelFilter::Info)
}
