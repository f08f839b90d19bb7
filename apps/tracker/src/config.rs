use anyhow::{Context, Result};

use crate::extraction::PromptVariant;

const DEFAULT_COMPLETION_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "openai/gpt-4";

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; every variable has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Completion API key. The service runs without one, but URL extraction
    /// requests are refused until it is set.
    pub openrouter_api_key: Option<String>,
    pub openrouter_api_url: String,
    pub llm_model: String,
    pub extraction_prompt: PromptVariant,
    pub seed_sample_jobs: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            openrouter_api_url: optional_env("OPENROUTER_API_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            extraction_prompt: optional_env("EXTRACTION_PROMPT")
                .map(|v| v.parse::<PromptVariant>())
                .transpose()
                .context("EXTRACTION_PROMPT must be one of: visit, structured, strict")?
                .unwrap_or_default(),
            seed_sample_jobs: parse_flag(optional_env("SEED_SAMPLE_JOBS").as_deref())
                .context("SEED_SAMPLE_JOBS must be true or false")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            openrouter_api_key: None,
            openrouter_api_url: DEFAULT_COMPLETION_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            extraction_prompt: PromptVariant::default(),
            seed_sample_jobs: true,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: Option<&str>) -> Result<bool> {
    match value.map(|v| v.to_ascii_lowercase()).as_deref() {
        None => Ok(true),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}
