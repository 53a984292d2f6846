//! Exporting a [`Resolution`] into the environment.
//!
//! The dispatcher sees the settings module through `DJANGO_SETTINGS_MODULE`
//! and the search path entry through `PYTHONPATH`.

use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ResolveError;
use crate::resolution::Resolution;

/// Variable naming the settings module.
pub const SETTINGS_ENV: &str = "DJANGO_SETTINGS_MODULE";
/// Module search path of the Python runtime.
pub const PYTHONPATH_ENV: &str = "PYTHONPATH";

/// Environment variables that a resolution is applied to.
pub trait Environment {
    fn var(&self, key: &str) -> Option<OsString>;
    fn set_var(&mut self, key: &str, value: &OsStr);
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<OsString> {
        env::var_os(key)
    }

    fn set_var(&mut self, key: &str, value: &OsStr) {
        // SAFETY: called once at startup, before any other thread exists.
        unsafe { env::set_var(key, value) };
    }
}

/// In-memory environment, for inspecting a resolution without touching the process.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: HashMap<String, OsString>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Environment::set_var`].
    pub fn with(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }
}

impl Environment for MemoryEnv {
    fn var(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }

    fn set_var(&mut self, key: &str, value: &OsStr) {
        self.vars.insert(key.to_string(), value.to_os_string());
    }
}

/// What [`apply`] changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Applied {
    /// Settings module written to `DJANGO_SETTINGS_MODULE`.
    pub settings_module: Option<String>,
    /// A resolved settings module was ignored because the variable was already set.
    pub kept_existing_settings: bool,
    /// Entry put at the front of `PYTHONPATH`.
    pub pythonpath_entry: Option<PathBuf>,
}

/// Apply `resolution` to `env`.
///
/// `DJANGO_SETTINGS_MODULE` is only written when unset. The search path
/// entry is prepended to `PYTHONPATH` whether or not a settings module was
/// written; existing entries keep their order.
pub fn apply<E: Environment>(
    resolution: &Resolution,
    env: &mut E,
) -> Result<Applied, ResolveError> {
    let mut applied = Applied::default();

    if let Some(settings) = &resolution.settings {
        if env.var(SETTINGS_ENV).is_some() {
            debug!(resolved = %settings.value, "{SETTINGS_ENV} already set, keeping it");
            applied.kept_existing_settings = true;
        } else {
            env.set_var(SETTINGS_ENV, OsStr::new(&settings.value));
            applied.settings_module = Some(settings.value.clone());
        }
    }

    if let Some(entry) = &resolution.search_path {
        let current = env.var(PYTHONPATH_ENV);
        let joined = prepend_search_path(current.as_deref(), entry)?;
        env.set_var(PYTHONPATH_ENV, &joined);
        applied.pythonpath_entry = Some(entry.clone());
    }

    debug!(?applied, "applied resolution");
    Ok(applied)
}

/// Put `entry` in front of the `current` search path.
///
/// An unset or empty search path becomes just `entry`.
pub fn prepend_search_path(
    current: Option<&OsStr>,
    entry: &Path,
) -> Result<OsString, ResolveError> {
    let mut paths = vec![entry.to_path_buf()];
    if let Some(current) = current.filter(|c| !c.is_empty()) {
        paths.extend(env::split_paths(current));
    }
    Ok(env::join_paths(paths)?)
}
