use crate::error::{Error, Result};
use crate::llm::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_AIRTABLE_URL: &str = "https://api.airtable.com/v0";

/// Contents of `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub openai_api_key: String,
}

impl OpenAiConfig {
    /// Loads the key file, writing a placeholder copy when it does not exist yet.
    ///
    /// A freshly created file is reported as [`Error::ConfigCreated`] so the
    /// caller can stop and let the user fill it in.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let placeholder = Self {
                openai_api_key: PLACEHOLDER_API_KEY.to_string(),
            };
            std::fs::write(path, serde_json::to_string_pretty(&placeholder)?)?;
            tracing::warn!("Created default config at {}", path.display());
            return Err(Error::ConfigCreated(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| Error::parse(path, e))?;

        let key = config.openai_api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(Error::Config(format!(
                "openai_api_key in {} is not set",
                path.display()
            )));
        }

        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_id: String,
    pub api_url: String,
}

impl AirtableConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("AIRTABLE_API_KEY")
            .map_err(|_| Error::Config("AIRTABLE_API_KEY environment variable not set".to_string()))?;

        let base_id = env::var("AIRTABLE_BASE_ID")
            .map_err(|_| Error::Config("AIRTABLE_BASE_ID environment variable not set".to_string()))?;

        let table_id = env::var("AIRTABLE_TABLE_ID")
            .map_err(|_| Error::Config("AIRTABLE_TABLE_ID environment variable not set".to_string()))?;

        let api_url = env::var("AIRTABLE_API_URL")
            .unwrap_or_else(|_| DEFAULT_AIRTABLE_URL.to_string());

        Ok(Self {
            api_key,
            base_id,
            table_id,
            api_url,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Applied when the completion request itself fails.
    pub transport_retry: RetryPolicy,
    /// Applied when a response arrives but does not validate.
    pub validation_retry: RetryPolicy,
    /// Pause after each written output file.
    pub file_delay: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("comments"),
            output_dir: PathBuf::from("comments/output"),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: 16_384,
            transport_retry: RetryPolicy::linear(3, Duration::from_secs(5)),
            validation_retry: RetryPolicy::immediate(3),
            file_delay: Duration::from_secs(2),
        }
    }
}
