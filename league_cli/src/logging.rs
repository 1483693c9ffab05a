//! Logging setup.

/// Initialize the global logger
///
/// Level comes from `RUST_LOG`, `info` when unset.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();
}
