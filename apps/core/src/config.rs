//! Runtime configuration.
//!
//! Everything comes from environment variables, with an optional `.env`
//! file loaded first. Unset variables fall back to defaults; malformed ones
//! are a `Config` error.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use validator::Validate;

use crate::classifier::{Lexicon, TextClassifier};
use crate::error::AppError;
use crate::telemetry::LogFormat;

pub const ENV_HOME: &str = "PAGEMOOD_HOME";
pub const ENV_LEXICON: &str = "PAGEMOOD_LEXICON";
pub const ENV_WORDS_PER_MINUTE: &str = "PAGEMOOD_WORDS_PER_MINUTE";
pub const ENV_MAX_INPUT_BYTES: &str = "PAGEMOOD_MAX_INPUT_BYTES";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PAGEMOOD_REQUEST_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "PAGEMOOD_LOG_FORMAT";

/// Tunables of the text classifier
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ClassifierConfig {
    /// Reading speed used for the reading time estimate.
    #[validate(range(min = 1))]
    pub words_per_minute: usize,
    /// Number of leading sentences kept in the summary.
    #[validate(range(min = 1))]
    pub summary_sentences: usize,
    /// Summary length cap in characters, ellipsis included.
    #[validate(range(min = 4))]
    pub summary_max_chars: usize,
    /// Number of emotions kept in `topEmotions`.
    #[validate(range(min = 1))]
    pub top_emotions: usize,
    /// Snapshots larger than this produce an `Error` record. Unlimited
    /// unless `PAGEMOOD_MAX_INPUT_BYTES` is set.
    #[validate(range(min = 1))]
    pub max_input_bytes: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            summary_sentences: 2,
            summary_max_chars: 150,
            top_emotions: 3,
            max_input_bytes: usize::MAX,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    /// Root of the `data/` tree; `None` means next to the executable.
    pub home: Option<PathBuf>,
    /// Optional JSON lexicon replacing the built-in dictionaries.
    pub lexicon_path: Option<PathBuf>,
    #[validate(nested)]
    pub classifier: ClassifierConfig,
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home: None,
            lexicon_path: None,
            classifier: ClassifierConfig::default(),
            request_timeout_secs: 30,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any) and then read the environment
    pub fn load() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Build the configuration from the current environment only
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let classifier_defaults = ClassifierConfig::default();

        let config = Self {
            home: env::var_os(ENV_HOME).map(PathBuf::from),
            lexicon_path: env::var_os(ENV_LEXICON).map(PathBuf::from),
            classifier: ClassifierConfig {
                words_per_minute: parse_var(ENV_WORDS_PER_MINUTE)?
                    .unwrap_or(classifier_defaults.words_per_minute),
                max_input_bytes: parse_var(ENV_MAX_INPUT_BYTES)?
                    .unwrap_or(classifier_defaults.max_input_bytes),
                ..classifier_defaults
            },
            request_timeout_secs: parse_var(ENV_REQUEST_TIMEOUT_SECS)?
                .unwrap_or(defaults.request_timeout_secs),
            log_format: parse_var(ENV_LOG_FORMAT)?.unwrap_or(defaults.log_format),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The configured lexicon, or the built-in one
    pub fn lexicon(&self) -> Result<Lexicon, AppError> {
        match &self.lexicon_path {
            Some(path) => Ok(Lexicon::from_json_file(path)?),
            None => Ok(Lexicon::default()),
        }
    }

    /// Build a classifier from this configuration
    pub fn build_classifier(&self) -> Result<TextClassifier, AppError> {
        let lexicon = self.lexicon()?;
        info!(
            custom_lexicon = self.lexicon_path.is_some(),
            words_per_minute = self.classifier.words_per_minute,
            "Building text classifier"
        );
        Ok(TextClassifier::with_lexicon(lexicon, self.classifier.clone())?)
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{} has invalid value '{}': {}", name, raw, e))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AppError::Config(format!("{}: {}", name, e))),
    }
}
