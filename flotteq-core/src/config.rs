use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlotteqConfig {
    pub api: ApiConfig,
    pub booking: BookingConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Bearer token attached to every request when set.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Fallback service duration when the caller does not pass one.
    #[serde(default = "default_duration")]
    pub default_duration_minutes: u32,

    /// Upper bound accepted for a single service window.
    #[serde(default = "default_max_duration")]
    pub max_duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub compact: bool,
}

fn default_api_url() -> String {
    "https://api.flotteq.io/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_duration() -> u32 {
    30
}

fn default_max_duration() -> u32 {
    480
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            token: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: default_duration(),
            max_duration_minutes: default_max_duration(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            date_format: default_date_format(),
            compact: false,
        }
    }
}

impl FlotteqConfig {
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> Result<Self, ConfigLoadError> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("FLOTTEQ")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut flotteq_config: FlotteqConfig = config.try_deserialize().unwrap_or_default();

        if let Ok(url) = std::env::var("FLOTTEQ_API_URL") {
            flotteq_config.api.base_url = url;
        }

        if let Ok(token) = std::env::var("FLOTTEQ_API_TOKEN") {
            flotteq_config.api.token = token;
        }

        if let Ok(level) = std::env::var("FLOTTEQ_LOG_LEVEL") {
            flotteq_config.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            flotteq_config.logging.level = level;
        }

        flotteq_config.validate()?;

        Ok(flotteq_config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.api.base_url.is_empty() {
            return Err(ConfigLoadError::MissingRequired("api.base_url".to_string()));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.base_url".to_string(),
                message: "Must be an http:// or https:// URL".to_string(),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.timeout_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.booking.default_duration_minutes == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "booking.default_duration_minutes".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.booking.default_duration_minutes > self.booking.max_duration_minutes {
            return Err(ConfigLoadError::InvalidValue {
                key: "booking.default_duration_minutes".to_string(),
                message: "Cannot be greater than max_duration_minutes".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(ConfigLoadError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("flotteq.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("flotteq").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".flotteq").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    let current_dir = std::env::current_dir().ok();

    let env_paths = [
        current_dir.as_ref().map(|d| d.join(".env")),
        current_dir.as_ref().map(|d| d.join(".env.local")),
        dirs::home_dir().map(|d| d.join(".flotteq").join(".env")),
        dirs::config_dir().map(|d| d.join("flotteq").join(".env")),
    ];

    for path in env_paths.iter().flatten() {
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("flotteq"))
}

pub fn get_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("flotteq"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = FlotteqConfig::default();
        assert_eq!(config.api.base_url, "https://api.flotteq.io/v1");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.token.is_empty());
        assert_eq!(config.booking.default_duration_minutes, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.display.color);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let config = FlotteqConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let mut config = FlotteqConfig::default();
        config.api.base_url = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = FlotteqConfig::default();
        config.api.base_url = "ftp://api.flotteq.io".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = FlotteqConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duration_above_max() {
        let mut config = FlotteqConfig::default();
        config.booking.default_duration_minutes = 600;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = FlotteqConfig::default();
        config.logging.level = "noisy".to_string();
        assert!(config.validate().is_err());

        // Directive-style filters pass through untouched
        config.logging.level = "flotteq_core=debug".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_dir_functions() {
        assert!(get_config_dir().is_some());
        assert!(get_data_dir().is_some());
    }
}
