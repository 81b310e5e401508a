use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{LlmSettings, DEFAULT_MODEL};
use crate::presenter::clipboard::CommandClipboard;

/// Upper bound on `LLM_MAX_RETRIES`.
const MAX_LLM_ATTEMPTS: u32 = 10;

/// Application configuration loaded from environment variables.
/// The API key is optional at startup; generation reports its absence.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub clipboard_command: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub llm_max_retries: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()),
            host: var("HOST", "127.0.0.1"),
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            data_dir: PathBuf::from(var("DATA_DIR", ".resume-wizard")),
            export_dir: PathBuf::from(var("EXPORT_DIR", "exports")),
            clipboard_command: var("CLIPBOARD_COMMAND", CommandClipboard::platform_default()),
            llm_model: var("LLM_MODEL", DEFAULT_MODEL),
            llm_timeout: Duration::from_secs(
                var("LLM_TIMEOUT_SECS", "60")
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            llm_max_retries: var("LLM_MAX_RETRIES", "3")
                .parse::<u32>()
                .context("LLM_MAX_RETRIES must be a positive integer")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            model: self.llm_model.clone(),
            timeout: self.llm_timeout,
            // Counts every attempt, the first one included.
            max_attempts: self.llm_max_retries.clamp(1, MAX_LLM_ATTEMPTS),
            ..LlmSettings::default()
        }
    }
}
