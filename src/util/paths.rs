//! Where placekeep keeps its files.
//!
//! Everything lives under one data directory: the layout database, the
//! config file and the log. The directory is fixed once at startup from
//! `--data-dir` or `$PLACEKEEP_DATA_DIR`, falling back to `~/.placekeep`.

use std::path::PathBuf;
use std::sync::OnceLock;

pub const DATA_DIR_ENV: &str = "PLACEKEEP_DATA_DIR";

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Fix the data directory for this process. Later calls are ignored, and the
/// return value tells whether this call took effect.
pub fn init_data_dir(custom_path: Option<PathBuf>) -> bool {
    DATA_DIR
        .set(custom_path.unwrap_or_else(home_data_dir))
        .is_ok()
}

fn home_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".placekeep")
}

pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(home_data_dir)
}

/// Layout database holding markers, anchors and viewpoints.
pub fn database_path() -> PathBuf {
    data_dir().join("placekeep.db")
}

pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

pub fn log_file_path() -> PathBuf {
    logs_dir().join("placekeep.log")
}

pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
