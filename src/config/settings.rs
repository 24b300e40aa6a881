use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml_edit::{DocumentMut, Item, Table};

use crate::util::paths::{config_path, data_dir, database_path};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite file holding the persisted collections
    pub database_path: PathBuf,
    /// tracing filter directive for the log file
    pub log_level: String,
}

/// TOML representation of the `[storage]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlStorageConfig {
    /// Database path; relative paths resolve against the data directory
    pub database: Option<PathBuf>,
}

/// TOML representation of the `[logging]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlLoggingConfig {
    pub level: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub storage: Option<TomlStorageConfig>,
    pub logging: Option<TomlLoggingConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: database_path(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the data directory, merging with defaults.
    /// Writes the bundled example on first run.
    pub fn load() -> Self {
        let config_file = config_path();

        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_from(&config_file)
    }

    /// Load configuration from a specific file. A missing or invalid file
    /// yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();

        let Ok(contents) = fs::read_to_string(path) else {
            return config;
        };

        match toml::from_str::<TomlConfig>(&contents) {
            Ok(toml_config) => config.merge(toml_config),
            Err(e) => eprintln!("Ignoring invalid config {}: {}", path.display(), e),
        }

        config
    }

    fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(database) = toml_config.storage.and_then(|s| s.database) {
            self.database_path = if database.is_relative() {
                data_dir().join(database)
            } else {
                database
            };
        }

        if let Some(level) = toml_config.logging.and_then(|l| l.level) {
            self.log_level = level;
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    eprintln!("Failed to create config directory: {}", e);
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            eprintln!("Failed to write default config: {}", e);
        }
    }
}

/// Save the log level to the config file.
///
/// Only `[logging] level` is touched; comments and other sections are kept.
pub fn save_log_level(level: &str) -> std::io::Result<()> {
    save_log_level_at(&config_path(), level)
}

fn save_log_level_at(config_file: &Path, level: &str) -> std::io::Result<()> {
    let contents = if config_file.exists() {
        fs::read_to_string(config_file)?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = contents
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    if !doc.contains_key("logging") {
        doc["logging"] = Item::Table(Table::new());
    }
    doc["logging"]["level"] = toml_edit::value(level);

    if let Some(parent) = config_file.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(config_file, doc.to_string())?;

    Ok(())
}
