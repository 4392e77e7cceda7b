//! Diagnostic logging setup.
//!
//! Logs go to stderr so stdout carries nothing but the report. `RUST_LOG`
//! takes precedence over the level derived from `--verbose`.

use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Level used when `--verbose` is not given.
pub const DEFAULT_LEVEL: Level = Level::WARN;

pub fn level_for(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        DEFAULT_LEVEL
    }
}

fn mk_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Installs the global subscriber. Calling it twice is a no-op.
pub fn init(verbose: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(mk_filter(level_for(verbose)))
        .with(fmt_layer)
        .try_init();
}
