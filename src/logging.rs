//! Diagnostics on stderr.
//!
//! stdout belongs to the management command, so everything django-cmd
//! reports goes to stderr.

use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV;

/// Install the global subscriber.
///
/// `DJANGO_CMD_LOG` wins over `default_level` when it parses.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
