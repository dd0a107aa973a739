use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub log_level: String,
    pub timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.flotteq.io/v1".to_string(),
            api_token: None,
            log_level: "info".to_string(),
            timeout_secs: 30,
        }
    }
}

#[allow(dead_code)]
impl CliConfig {
    pub fn load() -> Result<Self> {
        load_dotenv_files();

        let api_url = std::env::var("FLOTTEQ_API_URL").context(
            "FLOTTEQ_API_URL environment variable not set. \n\
             Please set FLOTTEQ_API_URL in your environment or create a .env file with:\n\
             FLOTTEQ_API_URL=https://api.flotteq.io/v1",
        )?;

        let api_token = std::env::var("FLOTTEQ_API_TOKEN").ok().filter(|t| !t.is_empty());

        let log_level = std::env::var("FLOTTEQ_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        let timeout_secs = std::env::var("FLOTTEQ_API_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            api_url,
            api_token,
            log_level,
            timeout_secs,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
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

#[allow(dead_code)]
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("flotteq"))
}

#[allow(dead_code)]
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir =
        get_config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    Ok(config_dir)
}
