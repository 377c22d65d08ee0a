use std::env;
use std::net::SocketAddr;

use thiserror::Error;

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No API key configured. Set {} in the environment or in a .env file.", API_KEY_ENV)]
    MissingApiKey,
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),
}

/// Process-wide settings, resolved once at startup and never mutated
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Settings {
    /// Resolve settings from the environment (after `.env` has been loaded).
    pub fn from_env(model: Option<String>, api_base: Option<String>) -> Result<Self, ConfigError> {
        let api_key = load_env_api_key().ok_or(ConfigError::MissingApiKey)?;
        Ok(Self::new(api_key, model, api_base))
    }

    pub fn new(api_key: String, model: Option<String>, api_base: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: api_base
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }
}

fn load_env_api_key() -> Option<String> {
    match env::var(API_KEY_ENV) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// Parse the web form's listen address from host and port
pub fn listen_addr(host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    format!("{}:{}", host, port)
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", host, port)))
}
