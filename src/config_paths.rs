//! Where `revise` keeps its config file and logs.
//!
//! Everything sits in one per-user directory named after the binary. On Unix
//! it follows `XDG_CONFIG_HOME` when set; on Windows it goes under `APPDATA`.

use std::{env, fs, io, path::PathBuf};

const APP_DIR: &str = "revise";
const CONFIG_FILE: &str = "config.yaml";
const LOGS_DIR: &str = "logs";

/// Root of the per-user config tree, or `None` when no home can be found
pub fn config_dir() -> Option<PathBuf> {
    user_config_root().map(|root| root.join(APP_DIR))
}

#[cfg(target_os = "windows")]
fn user_config_root() -> Option<PathBuf> {
    env::var_os("APPDATA").map(PathBuf::from)
}

#[cfg(not(target_os = "windows"))]
fn user_config_root() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

/// Engine settings read by [`EngineConfig::load`](crate::config::EngineConfig::load)
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(LOGS_DIR))
}

/// Create the logs directory if needed and hand back its path
pub fn ensure_logs_dir() -> io::Result<PathBuf> {
    let logs = logs_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no user config directory"))?;
    fs::create_dir_all(&logs)?;
    Ok(logs)
}
