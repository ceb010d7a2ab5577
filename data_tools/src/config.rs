//! Pipeline configuration.
//!
//! Loaded with the following priority (highest to lowest):
//! 1. Environment variables (`NEWSPREP_OUTPUT_DIR`, `NEWSPREP_MIN_CRIT`,
//!    `NEWSPREP_TRANSLATE_ENDPOINT`), including a `.env` file
//! 2. The TOML file named by `NEWSPREP_CONFIG`
//! 3. Built-in defaults
//!
//! # Example config file
//!
//! ```toml
//! min_crit = 2
//! output_dir = "saida"
//! keywords_file = "keywords.toml"
//!
//! [translation]
//! retry_delay_secs = 30
//! workers = 4
//! ```

use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::category::KeywordCatalog;
use crate::error::{PipelineError, Result};
use crate::relevance::DEFAULT_MIN_CRIT;
use crate::translate::{RetryPolicy, DEFAULT_ENDPOINT};

pub const CONFIG_PATH_VAR: &str = "NEWSPREP_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum keyword count for an article to be kept
    pub min_crit: usize,
    /// Directory the spreadsheet is written to
    pub output_dir: PathBuf,
    pub source_lang: String,
    pub target_lang: String,
    /// Also run the stripping chain on the English translation
    pub clean_translation: bool,
    /// Custom keyword catalog; the built-in one when unset
    pub keywords_file: Option<PathBuf>,
    pub translation: TranslationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_crit: DEFAULT_MIN_CRIT,
            output_dir: PathBuf::from("."),
            source_lang: "pt".to_string(),
            target_lang: "en".to_string(),
            clean_translation: false,
            keywords_file: None,
            translation: TranslationConfig::default(),
        }
    }
}

/// Translation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Total attempts per article, including the first
    pub max_attempts: u32,
    /// Wait between attempts
    pub retry_delay_secs: u64,
    /// Articles translated concurrently
    pub workers: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
            max_attempts: 2,
            retry_delay_secs: 60,
            workers: 1,
        }
    }
}

impl TranslationConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PipelineConfig {
    /// Load configuration with the full priority chain.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;

        Ok(config)
    }

    /// Load configuration from a specific TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Self::from_toml_str(&content)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Apply `NEWSPREP_*` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup("NEWSPREP_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("NEWSPREP_MIN_CRIT") {
            self.min_crit = value.trim().parse().map_err(|_| {
                PipelineError::Config(format!("NEWSPREP_MIN_CRIT is not a count: {value:?}"))
            })?;
        }
        if let Some(endpoint) = lookup("NEWSPREP_TRANSLATE_ENDPOINT") {
            self.translation.endpoint = endpoint;
        }
        Ok(())
    }

    /// The configured keyword catalog.
    pub fn keyword_catalog(&self) -> Result<KeywordCatalog> {
        match &self.keywords_file {
            Some(path) => KeywordCatalog::from_file(path),
            None => KeywordCatalog::builtin(),
        }
    }
}
