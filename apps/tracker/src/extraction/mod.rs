//! URL extraction — the completion-API proxy.
//!
//! Substitutes a listing URL into a prompt template, asks the model for the
//! listing's fields as JSON, and parses whatever comes back on a best-effort
//! basis. The model never fetches the page itself.
//!
//! `AppState` holds an `Arc<dyn JobExtractor>`; `LlmJobExtractor` is the
//! production backend.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::jobs::models::{JobStatus, NewJob};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{outermost_json_object, strip_json_fences, LlmClient, LlmError};

pub mod handlers;
pub mod prompts;

use prompts::{STRICT_PROMPT_TEMPLATE, STRUCTURED_PROMPT_TEMPLATE, VISIT_PROMPT_TEMPLATE};

// ────────────────────────────────────────────────────────────────────────────
// Prompt selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVariant {
    Visit,
    #[default]
    Structured,
    Strict,
}

impl PromptVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptVariant::Visit => "visit",
            PromptVariant::Structured => "structured",
            PromptVariant::Strict => "strict",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            PromptVariant::Visit => VISIT_PROMPT_TEMPLATE,
            PromptVariant::Structured => STRUCTURED_PROMPT_TEMPLATE,
            PromptVariant::Strict => STRICT_PROMPT_TEMPLATE,
        }
    }

    fn system(&self) -> Option<&'static str> {
        match self {
            PromptVariant::Strict => Some(JSON_ONLY_SYSTEM),
            PromptVariant::Visit | PromptVariant::Structured => None,
        }
    }
}

impl fmt::Display for PromptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visit" => Ok(PromptVariant::Visit),
            "structured" => Ok(PromptVariant::Structured),
            "strict" => Ok(PromptVariant::Strict),
            other => anyhow::bail!("unknown prompt variant '{other}'"),
        }
    }
}

/// A rendered prompt pair.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: Option<&'static str>,
    pub user: String,
}

pub fn build_prompt(variant: PromptVariant, url: &str) -> Prompt {
    Prompt {
        system: variant.system(),
        user: variant.template().replace("{url}", url),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

/// Fields recovered from a completion. Anything the model left out is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedJob {
    pub company: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub source: Option<String>,
    /// Always the submitted URL, whatever the model said.
    pub link: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawExtraction {
    company: Option<Value>,
    #[serde(alias = "title", alias = "position")]
    role: Option<Value>,
    location: Option<Value>,
    salary: Option<Value>,
    source: Option<Value>,
}

/// Parses completion text into an `ExtractedJob`.
///
/// Tolerates code fences and prose around the object. Strings are trimmed,
/// numbers are stringified, and null/blank/other values become `None`.
pub fn parse_extraction(text: &str, url: &str) -> Result<ExtractedJob, LlmError> {
    let text = strip_json_fences(text);
    let object = outermost_json_object(text).ok_or(LlmError::NoJsonObject)?;
    let raw: RawExtraction = serde_json::from_str(object)?;

    Ok(ExtractedJob {
        company: field(raw.company),
        role: field(raw.role),
        location: field(raw.location),
        salary: field(raw.salary),
        source: field(raw.source),
        link: url.to_string(),
    })
}

fn field(value: Option<Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty() && !text.eq_ignore_ascii_case("null")).then_some(text)
}

impl ExtractedJob {
    /// Turns an extraction into a new `Saved` job, filling placeholders for
    /// the two mandatory fields when the model could not supply them.
    pub fn into_new_job(self) -> NewJob {
        let notes = format!("Imported from {}", self.link);
        NewJob {
            company: self.company.unwrap_or_else(|| "Unknown company".to_string()),
            role: self.role.unwrap_or_else(|| "Unknown role".to_string()),
            location: self.location.unwrap_or_default(),
            status: JobStatus::Saved,
            salary: self.salary.unwrap_or_default(),
            source: self.source.unwrap_or_default(),
            link: self.link,
            date_applied: None,
            contact: String::new(),
            notes,
            documents: Vec::new(),
        }
    }
}

/// Rejects blank and non-http(s) URLs before any model call is made.
pub fn validate_url(url: &str) -> Result<Url, AppError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::Validation("URL is required".to_string()));
    }
    let parsed =
        Url::parse(url).map_err(|e| AppError::Validation(format!("Invalid URL '{url}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(AppError::Validation(format!(
            "Unsupported URL scheme '{scheme}'"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extractor backends
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait JobExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractedJob, AppError>;
}

/// Production extractor backed by the completion API.
pub struct LlmJobExtractor {
    llm: LlmClient,
    variant: PromptVariant,
}

impl LlmJobExtractor {
    pub fn new(llm: LlmClient, variant: PromptVariant) -> Self {
        Self { llm, variant }
    }
}

#[async_trait]
impl JobExtractor for LlmJobExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedJob, AppError> {
        if !self.llm.has_api_key() {
            return Err(LlmError::MissingApiKey.into());
        }
        validate_url(url)?;
        let url = url.trim();

        let prompt = build_prompt(self.variant, url);
        info!(
            "Extracting job listing from {} (prompt: {}, model: {})",
            url,
            self.variant,
            self.llm.model()
        );

        let text = self.llm.call_text(&prompt.user, prompt.system).await?;
        debug!("Completion text: {text}");

        Ok(parse_extraction(&text, url)?)
    }
}
