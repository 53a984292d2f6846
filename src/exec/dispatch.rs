//! Handing off to Django's management command line.

use std::ffi::OsString;
use std::process::{Command, ExitCode};

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;

/// Runs `<python> -m <module> <args...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatcher {
    python: String,
    module: String,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            python: config.dispatch.python.clone(),
            module: config.dispatch.module.clone(),
        }
    }

    /// Build the command; arguments are passed through untouched.
    pub fn command<I>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut cmd = Command::new(&self.python);
        cmd.arg("-m").arg(&self.module).args(args);
        cmd
    }

    /// Run the management command with the current environment.
    ///
    /// On Unix the process is replaced, so this only returns on failure to
    /// start. Elsewhere it waits and reports the command's exit code.
    pub fn run<I>(&self, args: I) -> Result<ExitCode>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut cmd = self.command(args);
        debug!(python = %self.python, module = %self.module, "dispatching");

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;

            let err = cmd.exec();
            Err(err).with_context(|| format!("failed to run {} -m {}", self.python, self.module))
        }

        #[cfg(not(unix))]
        {
            let status = cmd
                .status()
                .with_context(|| format!("failed to run {} -m {}", self.python, self.module))?;
            Ok(ExitCode::from(exit_byte(status.code())))
        }
    }
}

/// Exit status as the low byte of the child's code, the way a shell reports it.
/// A child with no code (killed) reports 1.
#[cfg_attr(unix, allow(dead_code))]
fn exit_byte(code: Option<i32>) -> u8 {
    code.map_or(1, |c| c as u8)
}
