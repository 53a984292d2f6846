//! Configuration files that can name the settings module.
//!
//! pyproject.toml is searched upward and takes precedence; setup.cfg is
//! only read from the working directory and is deprecated.

pub mod pyproject;
pub mod setup_cfg;
