//! Errors raised while resolving the settings module.

use std::env::JoinPathsError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Resolution error.
///
/// Missing files, sections and keys are never errors; only sources that are
/// present but unusable end up here.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The working directory could not be determined.
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// A configuration file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// pyproject.toml is not valid TOML.
    #[error("failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// setup.cfg is not a valid INI file.
    #[error("failed to parse {}, line {line}: {message}", path.display())]
    Ini {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A recognized key holds a value of the wrong type.
    #[error("{key} in {} must be {expected}", path.display())]
    InvalidValue {
        path: PathBuf,
        key: String,
        expected: &'static str,
    },

    /// The search path entry cannot be added to PYTHONPATH.
    #[error("cannot add entry to PYTHONPATH: {0}")]
    SearchPath(#[from] JoinPathsError),
}
