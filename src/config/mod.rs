use crate::errors::{AppError, AppResult};
use crate::utils::time::parse_duration;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys every configuration file is expected to carry.
pub const KNOWN_KEYS: [&str; 5] = [
    "database",
    "daily_quota",
    "min_break_minutes",
    "processor",
    "log_level",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_daily_quota")]
    pub daily_quota: String,
    #[serde(default = "default_min_break")]
    pub min_break_minutes: i64,
    #[serde(default = "default_processor")]
    pub processor: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_daily_quota() -> String {
    "8h".to_string()
}
fn default_min_break() -> i64 {
    60
}
fn default_processor() -> String {
    "system".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            daily_quota: default_daily_quota(),
            min_break_minutes: default_min_break(),
            processor: default_processor(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.punchclock`).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".punchclock")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("punchclock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("punchclock.sqlite")
    }

    /// Load configuration from the standard file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    /// Default daily quota used when an employee has no schedule for a weekday.
    pub fn daily_quota(&self) -> AppResult<TimeDelta> {
        parse_duration(&self.daily_quota)
    }

    pub fn min_break(&self) -> AppResult<TimeDelta> {
        let invalid = || AppError::InvalidValue {
            field: "min_break_minutes",
            value: self.min_break_minutes.to_string(),
        };
        if self.min_break_minutes < 0 {
            return Err(invalid());
        }
        TimeDelta::try_minutes(self.min_break_minutes).ok_or_else(invalid)
    }

    /// Keys from [`KNOWN_KEYS`] that are absent from the given YAML document.
    pub fn missing_keys(content: &str) -> AppResult<Vec<&'static str>> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
        let map = yaml
            .as_mapping()
            .ok_or_else(|| AppError::Config("configuration is not a mapping".into()))?;

        Ok(KNOWN_KEYS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(*k))
            .collect())
    }

    /// Initialize configuration and database files.
    ///
    /// In test mode the config file is left untouched and only the database
    /// file is created.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        if !is_test {
            fs::create_dir_all(&dir)?;
        }

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() || is_test {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}
