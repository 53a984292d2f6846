//! django-cmd-resolve - Django settings module discovery.
//!
//! Finds the settings module of a Django project so `DJANGO_SETTINGS_MODULE`
//! does not have to be exported by hand. Sources, in order:
//! - `[tool.django]` in the nearest `pyproject.toml`, searched upward
//! - `[django]` in `setup.cfg` in the working directory (deprecated)
//!
//! # Example
//!
//! ```no_run
//! use django_cmd_resolve::{apply, resolve, MemoryEnv};
//! use std::path::Path;
//!
//! let resolution = resolve(Path::new(".")).unwrap();
//! let mut env = MemoryEnv::new();
//! apply(&resolution, &mut env).unwrap();
//! println!("settings: {:?}", resolution.settings);
//! ```

mod apply;
mod error;
mod resolution;
mod scanner;
pub mod sources;

use std::env;

use tracing::warn;

pub use apply::{
    Applied, Environment, MemoryEnv, PYTHONPATH_ENV, ProcessEnv, SETTINGS_ENV, apply,
    prepend_search_path,
};
pub use error::ResolveError;
pub use resolution::{Deprecation, Resolution, Settings, Source, resolve};
pub use scanner::find_upward;

/// Resolve the settings module for the current directory and export it.
///
/// Deprecated configuration is reported as warnings. Must run before any
/// other thread is started, since it writes the process environment.
pub fn resolve_and_apply() -> Result<Applied, ResolveError> {
    let cwd = env::current_dir().map_err(ResolveError::CurrentDir)?;
    let resolution = resolve(&cwd)?;
    for deprecation in &resolution.deprecations {
        warn!("{deprecation}");
    }
    apply(&resolution, &mut ProcessEnv)
}
