//! `[tool.django]` in pyproject.toml.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::ResolveError;

/// File name searched for upward from the working directory.
pub const FILE_NAME: &str = "pyproject.toml";

/// Preferred key for the settings module.
pub const SETTINGS_KEY: &str = "settings";
/// Old name of [`SETTINGS_KEY`].
pub const DEPRECATED_SETTINGS_KEY: &str = "settings_module";
/// Search path entry, relative to the file's directory.
pub const PYTHONPATH_KEY: &str = "pythonpath";

/// Values read from a pyproject.toml file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyprojectConfig {
    /// Path of the file that was read.
    pub path: PathBuf,
    /// Settings module, if either key held a non-empty string.
    pub settings: Option<String>,
    /// Whether `settings` came from the deprecated key.
    pub used_deprecated_key: bool,
    /// Directory to put on the module search path.
    pub search_path: PathBuf,
}

/// Read and interpret a pyproject.toml file.
pub fn load(path: &Path) -> Result<PyprojectConfig, ResolveError> {
    let content = fs::read_to_string(path).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &content)
}

/// Interpret pyproject.toml content that was read from `path`.
pub fn parse(path: &Path, content: &str) -> Result<PyprojectConfig, ResolveError> {
    let parsed: toml::Value = toml::from_str(content).map_err(|source| ResolveError::Toml {
        path: path.to_path_buf(),
        source,
    })?;

    let django = parsed
        .get("tool")
        .and_then(|tool| tool.get("django"))
        .filter(|django| django.is_table());

    let mut settings = string_key(path, django, SETTINGS_KEY)?;
    let mut used_deprecated_key = false;
    if settings.is_none() {
        settings = string_key(path, django, DEPRECATED_SETTINGS_KEY)?;
        used_deprecated_key = settings.is_some();
    }

    let pythonpath =
        string_key_raw(path, django, PYTHONPATH_KEY)?.unwrap_or_else(|| ".".to_string());
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let search_path = strip_cur_dir(&base.join(pythonpath));

    Ok(PyprojectConfig {
        path: path.to_path_buf(),
        settings,
        used_deprecated_key,
        search_path,
    })
}

/// Non-empty string value of `key`.
fn string_key(
    path: &Path,
    table: Option<&toml::Value>,
    key: &str,
) -> Result<Option<String>, ResolveError> {
    Ok(string_key_raw(path, table, key)?.filter(|s| !s.is_empty()))
}

fn string_key_raw(
    path: &Path,
    table: Option<&toml::Value>,
    key: &str,
) -> Result<Option<String>, ResolveError> {
    let Some(value) = table.and_then(|t| t.get(key)) else {
        return Ok(None);
    };
    match value.as_str() {
        Some(s) => Ok(Some(s.to_string())),
        None => Err(ResolveError::InvalidValue {
            path: path.to_path_buf(),
            key: format!("tool.django.{key}"),
            expected: "a string",
        }),
    }
}

/// Drop `.` components so `dir/.` reads as `dir`.
fn strip_cur_dir(path: &Path) -> PathBuf {
    let stripped: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if stripped.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        stripped
    }
}
