//! Global almanac configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::clock::{DEFAULT_CLOCK_LABEL, DEFAULT_CLOCK_TIMEZONE};
use crate::error::{AlmanacError, AlmanacResult};
use crate::holidays::{DEFAULT_HOLIDAY_API, DEFAULT_HOLIDAY_COUNTRY};

static DEFAULT_DATA_DIR: &str = "~/.local/share/almanac";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_clock_timezone() -> String {
    DEFAULT_CLOCK_TIMEZONE.to_string()
}

fn default_clock_label() -> String {
    DEFAULT_CLOCK_LABEL.to_string()
}

fn default_holiday_api() -> String {
    DEFAULT_HOLIDAY_API.to_string()
}

fn default_holiday_country() -> String {
    DEFAULT_HOLIDAY_COUNTRY.to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HolidayConfig {
    #[serde(default = "default_holiday_api")]
    pub base_url: String,

    #[serde(default = "default_holiday_country")]
    pub country: String,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        HolidayConfig {
            base_url: default_holiday_api(),
            country: default_holiday_country(),
        }
    }
}

/// Global configuration at ~/.config/almanac/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AlmanacConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_clock_timezone")]
    pub clock_timezone: String,

    #[serde(default = "default_clock_label")]
    pub clock_label: String,

    #[serde(default)]
    pub holidays: HolidayConfig,
}

impl Default for AlmanacConfig {
    fn default() -> Self {
        AlmanacConfig {
            data_dir: default_data_dir(),
            clock_timezone: default_clock_timezone(),
            clock_label: default_clock_label(),
            holidays: HolidayConfig::default(),
        }
    }
}

impl AlmanacConfig {
    pub fn config_path() -> AlmanacResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AlmanacError::Config("Could not determine config directory".into()))?
            .join("almanac");

        Ok(config_dir.join("config.toml"))
    }

    /// Load ~/.config/almanac/config.toml, writing a commented default first
    /// if it does not exist yet.
    pub fn load() -> AlmanacResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> AlmanacResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| AlmanacError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AlmanacError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn to_toml(&self) -> AlmanacResult<String> {
        toml::to_string_pretty(self).map_err(|e| AlmanacError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AlmanacResult<()> {
        let contents = format!(
            "\
# almanac configuration

# Where events and preferences are stored:
# data_dir = \"{}\"

# Timezone and label of the clock:
# clock_timezone = \"{}\"
# clock_label = \"{}\"

# Public holiday source:
# [holidays]
# base_url = \"{}\"
# country = \"{}\"
",
            DEFAULT_DATA_DIR,
            DEFAULT_CLOCK_TIMEZONE,
            DEFAULT_CLOCK_LABEL,
            DEFAULT_HOLIDAY_API,
            DEFAULT_HOLIDAY_COUNTRY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AlmanacError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AlmanacError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
