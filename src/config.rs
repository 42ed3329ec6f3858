use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;
use crate::password::PasswordPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub draw: DrawConfig,
    pub password: PasswordPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: String::from("warn"),
            draw: DrawConfig::default(),
            password: PasswordPolicy::default(),
        }
    }
}

impl Config {
    const APP_DIR: &str = "luckydip";
    const FILE_NAME: &str = "config.json";

    /// Loads `path` if given, otherwise the per-user config file when one
    /// exists, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.draw.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }
}

/// Shape of a draw: how many numbers, from which closed range, and the id
/// prefix of the form fields that receive them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub min: u32,
    pub max: u32,
    pub size: usize,
    pub slot_prefix: String,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            min: 1,
            max: 60,
            size: 6,
            slot_prefix: String::from("no"),
        }
    }
}

impl DrawConfig {
    /// Number of distinct values in `min..=max`.
    pub fn span(&self) -> u64 {
        u64::from(self.max) - u64::from(self.min) + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::Invalid(format!(
                "draw range is empty: min {} > max {}",
                self.min, self.max
            )));
        }

        if self.size == 0 {
            return Err(ConfigError::Invalid(String::from(
                "draw size must be at least 1",
            )));
        }

        if self.size as u64 > self.span() {
            return Err(ConfigError::Invalid(format!(
                "cannot draw {} unique numbers from {}..={}",
                self.size, self.min, self.max
            )));
        }

        Ok(())
    }

    /// Field ids `{prefix}1` through `{prefix}{size}`.
    pub fn slot_ids(&self) -> Vec<String> {
        (1..=self.size)
            .map(|i| format!("{}{}", self.slot_prefix, i))
            .collect()
    }
}
