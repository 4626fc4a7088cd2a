//! Configuration management.
//!
//! Configuration is loaded with figment from TOML, environment
//! variables and defaults, mirroring the usual precedence: env over
//! file over built-in values.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keymap::KeyBindings;
use crate::question::Category;
use crate::session::OrderingMode;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "groundschool";

/// Default notes database file name.
const DATABASE_FILE_NAME: &str = "notes.db";

/// Default fallback note file name.
const FALLBACK_FILE_NAME: &str = "notes.json";

/// Default log file name.
const LOG_FILE_NAME: &str = "gschool.log";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GROUNDSCHOOL_`)
/// 2. TOML config file at `~/.config/groundschool/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Note storage configuration.
    pub storage: StorageConfig,
    /// Study session configuration.
    pub study: StudyConfig,
    /// Key bindings for the study screen.
    pub keys: KeyBindings,
}

/// Note storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the notes database.
    /// Defaults to `~/.local/share/groundschool/notes.db`
    pub database_path: Option<PathBuf>,
    /// Path to the JSON fallback note file.
    /// Defaults to `~/.local/share/groundschool/notes.json`
    pub fallback_path: Option<PathBuf>,
}

/// Study session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// How the next question is chosen.
    pub ordering: OrderingMode,
    /// Whether advancing first reveals the answer.
    pub reveal_before_advance: bool,
    /// Category to start in. All categories when unset.
    pub category: Option<Category>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            ordering: OrderingMode::default(),
            reveal_before_advance: true,
            category: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `GROUNDSCHOOL_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("GROUNDSCHOOL_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.keys.validate()
    }

    /// Get the notes database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the fallback note file path, resolving defaults if not set.
    #[must_use]
    pub fn fallback_path(&self) -> PathBuf {
        self.storage
            .fallback_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(FALLBACK_FILE_NAME))
    }

    /// Get the log file path used while the study screen owns the
    /// terminal.
    #[must_use]
    pub fn log_file_path(&self) -> PathBuf {
        Self::default_data_dir().join(LOG_FILE_NAME)
    }
}
