use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub api_host: String,
    pub api_port: u16,

    // Outbound provider calls
    pub provider_timeout_secs: u64,
    pub devto_base_url: String,
    pub youtube_base_url: String,
    pub youtube_api_key: Option<String>,
    pub google_books_base_url: String,
    pub google_books_api_key: Option<String>,
    pub open_library_base_url: String,
    pub free_books_base_url: String,

    // Chat completion
    pub chat_api_key: Option<String>,
    pub chat_base_url: String,
    pub chat_models: Vec<String>,
    pub chat_mock_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 3001,
            provider_timeout_secs: 15,
            devto_base_url: "https://dev.to/api".to_string(),
            youtube_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            youtube_api_key: None,
            google_books_base_url: "https://www.googleapis.com/books/v1".to_string(),
            google_books_api_key: None,
            open_library_base_url: "https://openlibrary.org".to_string(),
            free_books_base_url: "https://www.dbooks.org/api".to_string(),
            chat_api_key: None,
            chat_base_url: "https://openrouter.ai/api/v1".to_string(),
            chat_models: vec![
                "openai/gpt-4o-mini".to_string(),
                "meta-llama/llama-3.1-8b-instruct:free".to_string(),
            ],
            chat_mock_fallback: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            api_host: optional_env("API_HOST").unwrap_or(defaults.api_host),
            api_port: match optional_env("API_PORT") {
                Some(port) => port.parse::<u16>().context("API_PORT must be a number")?,
                None => defaults.api_port,
            },
            provider_timeout_secs: match optional_env("PROVIDER_TIMEOUT_SECS") {
                Some(secs) => secs
                    .parse::<u64>()
                    .context("PROVIDER_TIMEOUT_SECS must be a number")?,
                None => defaults.provider_timeout_secs,
            },
            devto_base_url: optional_env("DEVTO_BASE_URL").unwrap_or(defaults.devto_base_url),
            youtube_base_url: optional_env("YOUTUBE_BASE_URL")
                .unwrap_or(defaults.youtube_base_url),
            youtube_api_key: optional_env("YOUTUBE_API_KEY"),
            google_books_base_url: optional_env("GOOGLE_BOOKS_BASE_URL")
                .unwrap_or(defaults.google_books_base_url),
            google_books_api_key: optional_env("GOOGLE_BOOKS_API_KEY"),
            open_library_base_url: optional_env("OPEN_LIBRARY_BASE_URL")
                .unwrap_or(defaults.open_library_base_url),
            free_books_base_url: optional_env("FREE_BOOKS_BASE_URL")
                .unwrap_or(defaults.free_books_base_url),
            chat_api_key: optional_env("CHAT_API_KEY"),
            chat_base_url: optional_env("CHAT_BASE_URL").unwrap_or(defaults.chat_base_url),
            chat_models: optional_env("CHAT_MODELS")
                .map(|raw| parse_list(&raw))
                .filter(|models| !models.is_empty())
                .unwrap_or(defaults.chat_models),
            chat_mock_fallback: optional_env("CHAT_MOCK_FALLBACK")
                .map(|v| v.parse::<bool>().unwrap_or(false))
                .unwrap_or(false),
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) => {
                    let n = v.chars().take(5).map(char::len_utf8).sum::<usize>();
                    format!("{}...({} chars)", &v[..n], v.len())
                }
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  YOUTUBE_API_KEY: {}", preview_opt(&self.youtube_api_key));
        tracing::info!("  GOOGLE_BOOKS_API_KEY: {}", preview_opt(&self.google_books_api_key));
        tracing::info!("  CHAT_API_KEY: {}", preview_opt(&self.chat_api_key));
        tracing::info!("  CHAT_MODELS: {}", self.chat_models.join(","));
        tracing::info!("  CHAT_MOCK_FALLBACK: {}", self.chat_mock_fallback);
        tracing::info!("  PROVIDER_TIMEOUT_SECS: {}", self.provider_timeout_secs);
    }
}

/// Unset and blank are the same thing here.
fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
