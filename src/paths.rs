//! Where the launcher's own settings live.
//!
//! Only the interpreter and log level are configured here; the Django
//! settings module always comes from the project files.

use std::path::{Path, PathBuf};

/// Directory holding `config.toml`, under the user's home.
///
/// `~/.django-cmd/` is used only when it is the sole one present, so a
/// fresh install lands in `~/.config/django-cmd/`.
pub fn config_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    config_dir_in(&home)
}

fn config_dir_in(home: &Path) -> PathBuf {
    let primary = home.join(".config").join("django-cmd");
    let fallback = home.join(".django-cmd");

    if primary.exists() || !fallback.exists() {
        primary
    } else {
        fallback
    }
}

/// Launcher config file; absent means all defaults.
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
