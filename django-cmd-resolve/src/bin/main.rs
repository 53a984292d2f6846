//! django-cmd-resolve CLI - debugging tool for settings resolution.

use std::env;
use std::path::PathBuf;
use std::process;

use django_cmd_resolve::{Environment, MemoryEnv, PYTHONPATH_ENV, SETTINGS_ENV, apply, resolve};

fn main() {
    let dir = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let resolution = match resolve(&dir) {
        Ok(resolution) => resolution,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    // Show what would be exported, starting from the caller's environment.
    let mut exported = MemoryEnv::new();
    for key in [SETTINGS_ENV, PYTHONPATH_ENV] {
        if let Some(value) = env::var_os(key) {
            exported.set_var(key, &value);
        }
    }
    if let Err(e) = apply(&resolution, &mut exported) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let report = serde_json::json!({
        "dir": dir.display().to_string(),
        "resolution": resolution,
        "environment": {
            SETTINGS_ENV: exported.var(SETTINGS_ENV).map(|v| v.to_string_lossy().into_owned()),
            PYTHONPATH_ENV: exported.var(PYTHONPATH_ENV).map(|v| v.to_string_lossy().into_owned()),
        },
    });

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
