//! Logging setup
//!
//! Library events go through `tracing`; the CLI installs a compact stderr
//! subscriber whose level follows `-q`/`-v`. `RUST_LOG` overrides it.

use crate::config::CliConfig;
use tracing_subscriber::EnvFilter;

/// Build the filter for `config`, preferring `RUST_LOG` when set
#[must_use]
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.filter_directive()))
}

/// Install the global subscriber; a second call is a no-op
pub fn init(config: &CliConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .without_time()
        .try_init();
}
