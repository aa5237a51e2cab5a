use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_ENV: &str = "GOOGLE_GENERATIVE_AI_API_KEY";
pub const PORT_ENV: &str = "PORT";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const CONFIG_PATH_ENV: &str = "TOPIC_ANALYZER_CONFIG";

/// Upper bound on sources returned to callers.
pub const SOURCE_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub base_url: String,
    pub request_timeout_seconds: u64,
    pub max_sources: usize,
    pub validate_charts: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: "0.0.0.0".to_string(),
            port: 3001,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_seconds: 120,
            max_sources: SOURCE_LIMIT,
            validate_charts: false,
        }
    }
}

impl AppConfig {
    /// Builds the config from optional JSON file content, then applies environment overrides.
    pub fn from_sources<F>(file_content: Option<&str>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: AppConfig = match file_content {
            Some(content) => serde_json::from_str(content)?,
            None => AppConfig::default(),
        };

        if let Some(key) = env(API_KEY_ENV) {
            config.api_key = key;
        }
        if let Some(port) = env(PORT_ENV) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: PORT_ENV, value: port.clone() })?;
        }
        if let Some(model) = env(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }

        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey(API_KEY_ENV));
        }
        if config.request_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_seconds",
                value: "0".to_string(),
            });
        }
        if config.max_sources > SOURCE_LIMIT {
            return Err(ConfigError::InvalidValue {
                key: "max_sources",
                value: config.max_sources.to_string(),
            });
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| path.to_string());
    let content = match fs::read_to_string(&path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    AppConfig::from_sources(content.as_deref(), |key| std::env::var(key).ok())
}
