//! Settings module resolution.
//!
//! [`resolve`] decides what to export without touching the process: it
//! reads the configuration files and reports the settings module, the
//! search path entry and any deprecated configuration it saw.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ResolveError;
use crate::scanner::find_upward;
use crate::sources::{pyproject, setup_cfg};

/// Outcome of resolving a working directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    /// Settings module to export, if any source named one.
    pub settings: Option<Settings>,
    /// Directory to prepend to the module search path.
    pub search_path: Option<PathBuf>,
    /// Deprecated configuration that was used, in the order it was seen.
    pub deprecations: Vec<Deprecation>,
}

/// A settings module and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub value: String,
    pub source: Source,
}

/// File that provided the settings module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum Source {
    Pyproject(PathBuf),
    SetupCfg(PathBuf),
}

/// Deprecated configuration that still took effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Deprecation {
    /// `tool.django.settings_module` instead of `tool.django.settings`.
    SettingsModuleKey { file: PathBuf },
    /// A `[django]` section in setup.cfg.
    SetupCfgSection { file: PathBuf },
}

impl fmt::Display for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deprecation::SettingsModuleKey { file } => write!(
                f,
                "{}: tool.django.{} is deprecated, use tool.django.{} instead",
                file.display(),
                pyproject::DEPRECATED_SETTINGS_KEY,
                pyproject::SETTINGS_KEY,
            ),
            Deprecation::SetupCfgSection { file } => write!(
                f,
                "{}: the [{}] section is deprecated, configure [tool.django] in {} instead",
                file.display(),
                setup_cfg::SECTION,
                pyproject::FILE_NAME,
            ),
        }
    }
}

/// Resolve the settings module for `cwd`.
///
/// pyproject.toml is searched from `cwd` upward and wins whenever it names a
/// settings module. Otherwise setup.cfg in `cwd` is consulted. A
/// pyproject.toml always contributes a search path entry, even without a
/// settings module.
pub fn resolve(cwd: &Path) -> Result<Resolution, ResolveError> {
    let mut resolution = Resolution::default();

    if let Some(path) = find_upward(cwd, pyproject::FILE_NAME) {
        let config = pyproject::load(&path)?;
        if config.used_deprecated_key {
            resolution.deprecations.push(Deprecation::SettingsModuleKey {
                file: config.path.clone(),
            });
        }
        resolution.settings = config.settings.map(|value| Settings {
            value,
            source: Source::Pyproject(config.path),
        });
        resolution.search_path = Some(config.search_path);
    }

    if resolution.settings.is_none() {
        if let Some(config) = setup_cfg::load(cwd)? {
            if config.has_section {
                resolution.deprecations.push(Deprecation::SetupCfgSection {
                    file: config.path.clone(),
                });
            }
            if let Some(value) = config.settings {
                resolution.settings = Some(Settings {
                    value,
                    source: Source::SetupCfg(config.path),
                });
                resolution.search_path = Some(cwd.to_path_buf());
            }
        }
    }

    debug!(?resolution, "resolved {}", cwd.display());
    Ok(resolution)
}
