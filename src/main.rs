mod config;
mod exec;
mod logging;
mod paths;

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use config::Config;
use exec::Dispatcher;
use tracing::{debug, warn};

fn main() -> Result<ExitCode> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            logging::init(&Config::default().log.level);
            warn!("{e:#}; using defaults");
            Config::default()
        }
    };
    let config = config.with_env_overrides(|key| env::var(key).ok());
    logging::init(&config.log.level);

    run(&config)
}

/// Export the discovered settings module, then hand off to Django.
fn run(config: &Config) -> Result<ExitCode> {
    let applied = django_cmd_resolve::resolve_and_apply()
        .context("could not determine the Django settings module")?;
    debug!(?applied, "environment ready");

    Dispatcher::new(config).run(env::args_os().skip(1))
}
