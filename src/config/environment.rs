// ABOUTME: Environment configuration for the completion service, content locale and data directory
// ABOUTME: Parses NUTRIPLAN_* and GEMINI_API_KEY variables into a validated AppConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! Environment-based configuration
//!
//! NutriPlan reads all runtime settings from environment variables. The API key
//! for the completion service is only ever taken from here; when it is absent
//! the recommendation service runs without a provider and serves fallback plans.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use super::nutrition::NutritionConfig;
use crate::errors::{AppError, AppResult, ErrorCode};

/// Environment variable names
pub mod keys {
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Model identifier
    pub const LLM_MODEL: &str = "NUTRIPLAN_LLM_MODEL";
    /// API base URL (point at a server-side proxy in production)
    pub const LLM_BASE_URL: &str = "NUTRIPLAN_LLM_BASE_URL";
    /// Request timeout in seconds
    pub const LLM_TIMEOUT_SECS: &str = "NUTRIPLAN_LLM_TIMEOUT_SECS";
    /// Sampling temperature
    pub const LLM_TEMPERATURE: &str = "NUTRIPLAN_LLM_TEMPERATURE";
    /// Maximum output tokens
    pub const LLM_MAX_TOKENS: &str = "NUTRIPLAN_LLM_MAX_TOKENS";
    /// Language of generated content
    pub const CONTENT_LANGUAGE: &str = "NUTRIPLAN_CONTENT_LANGUAGE";
    /// Cuisine the meal plans draw from
    pub const CUISINE: &str = "NUTRIPLAN_CUISINE";
    /// Directory holding the key/value store
    pub const DATA_DIR: &str = "NUTRIPLAN_DATA_DIR";
}

/// Default values applied when a variable is unset
pub mod defaults {
    /// Default Gemini model
    pub const LLM_MODEL: &str = "gemini-2.0-flash";
    /// Default Generative Language API base URL
    pub const LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    /// Default request timeout (seconds)
    pub const LLM_TIMEOUT_SECS: u64 = 15;
    /// Default sampling temperature
    pub const LLM_TEMPERATURE: f32 = 0.7;
    /// Default output token budget
    pub const LLM_MAX_TOKENS: u32 = 2048;
    /// Default content language
    pub const CONTENT_LANGUAGE: &str = "English";
    /// Default cuisine
    pub const CUISINE: &str = "Indonesian";
    /// Directory name under the platform data dir
    pub const DATA_DIR_NAME: &str = "nutriplan";
}

/// Completion service settings
#[derive(Clone)]
pub struct LlmConfig {
    /// API key; `None` disables the provider
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// API base URL without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,
    /// Output token budget
    pub max_output_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: defaults::LLM_MODEL.to_owned(),
            base_url: defaults::LLM_BASE_URL.to_owned(),
            timeout: Duration::from_secs(defaults::LLM_TIMEOUT_SECS),
            temperature: defaults::LLM_TEMPERATURE,
            max_output_tokens: defaults::LLM_MAX_TOKENS,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

/// Language and cuisine of generated content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    /// Natural language of generated text
    pub language: String,
    /// Cuisine meal plans should draw from
    pub cuisine: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            language: defaults::CONTENT_LANGUAGE.to_owned(),
            cuisine: defaults::CUISINE.to_owned(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Completion service settings
    pub llm: LlmConfig,
    /// Content locale
    pub content: ContentConfig,
    /// Directory holding the key/value store
    pub data_dir: PathBuf,
    /// Derivation coefficients
    pub nutrition: NutritionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when a variable is set but cannot be parsed or
    /// is outside its accepted range.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when a value cannot be parsed or fails validation.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_key = get(keys::GEMINI_API_KEY);
        if api_key.is_none() {
            info!(
                "{} not set; recommendations will use the offline fallback plan",
                keys::GEMINI_API_KEY
            );
        }

        let llm = LlmConfig {
            api_key,
            model: get(keys::LLM_MODEL).unwrap_or_else(|| defaults::LLM_MODEL.to_owned()),
            base_url: get(keys::LLM_BASE_URL)
                .unwrap_or_else(|| defaults::LLM_BASE_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            timeout: Duration::from_secs(parse_or(
                keys::LLM_TIMEOUT_SECS,
                get(keys::LLM_TIMEOUT_SECS),
                defaults::LLM_TIMEOUT_SECS,
            )?),
            temperature: parse_or(
                keys::LLM_TEMPERATURE,
                get(keys::LLM_TEMPERATURE),
                defaults::LLM_TEMPERATURE,
            )?,
            max_output_tokens: parse_or(
                keys::LLM_MAX_TOKENS,
                get(keys::LLM_MAX_TOKENS),
                defaults::LLM_MAX_TOKENS,
            )?,
        };

        let content = ContentConfig {
            language: get(keys::CONTENT_LANGUAGE)
                .unwrap_or_else(|| defaults::CONTENT_LANGUAGE.to_owned()),
            cuisine: get(keys::CUISINE).unwrap_or_else(|| defaults::CUISINE.to_owned()),
        };

        let data_dir = get(keys::DATA_DIR).map_or_else(default_data_dir, PathBuf::from);

        let config = Self {
            llm,
            content,
            data_dir,
            nutrition: NutritionConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for a zero timeout or token budget, a
    /// temperature outside 0.0-2.0, or invalid nutrition coefficients.
    pub fn validate(&self) -> AppResult<()> {
        if self.llm.timeout.is_zero() {
            return Err(invalid(format!(
                "{} must be greater than zero",
                keys::LLM_TIMEOUT_SECS
            )));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(invalid(format!(
                "{} must be between 0.0 and 2.0, got {}",
                keys::LLM_TEMPERATURE,
                self.llm.temperature
            )));
        }
        if self.llm.max_output_tokens == 0 {
            return Err(invalid(format!(
                "{} must be greater than zero",
                keys::LLM_MAX_TOKENS
            )));
        }
        self.nutrition.validate()
    }

    /// Whether a completion provider can be constructed
    #[must_use]
    pub const fn has_llm_credentials(&self) -> bool {
        self.llm.api_key.is_some()
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "NutriPlan Configuration:\n\
             - Completion provider: {}\n\
             - Model: {}\n\
             - Base URL: {}\n\
             - Timeout: {}s\n\
             - Content: {} ({} cuisine)\n\
             - Data directory: {}",
            if self.has_llm_credentials() {
                "Enabled"
            } else {
                "Disabled (fallback plans only)"
            },
            self.llm.model,
            self.llm.base_url,
            self.llm.timeout.as_secs(),
            self.content.language,
            self.content.cuisine,
            self.data_dir.display()
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            content: ContentConfig::default(),
            data_dir: default_data_dir(),
            nutrition: NutritionConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(format!(".{}", defaults::DATA_DIR_NAME)),
        |dir| dir.join(defaults::DATA_DIR_NAME),
    )
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> AppResult<T> {
    raw.map_or(Ok(default), |value| {
        value
            .parse()
            .map_err(|_| invalid(format!("Invalid {key} value '{value}'")))
    })
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::new(ErrorCode::ConfigInvalid, message)
}
