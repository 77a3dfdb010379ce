// ABOUTME: Tests for environment-driven configuration and logging setup
// ABOUTME: Mutates process environment variables, so every test runs serially
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use nutriplan::config::environment::keys;
use nutriplan::config::AppConfig;
use nutriplan::errors::ErrorCode;
use nutriplan::logging::{LogFormat, LoggingConfig};
use serial_test::serial;

const ALL_KEYS: [&str; 9] = [
    keys::GEMINI_API_KEY,
    keys::LLM_MODEL,
    keys::LLM_BASE_URL,
    keys::LLM_TIMEOUT_SECS,
    keys::LLM_TEMPERATURE,
    keys::LLM_MAX_TOKENS,
    keys::CONTENT_LANGUAGE,
    keys::CUISINE,
    keys::DATA_DIR,
];

fn clear_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_without_key_disables_provider() {
    clear_env();

    let config = AppConfig::from_env().unwrap();

    assert!(!config.has_llm_credentials());
    assert!(config.summary().contains("Disabled"));
}

#[test]
#[serial]
fn test_from_env_reads_overrides() {
    clear_env();
    env::set_var(keys::GEMINI_API_KEY, "env-test-key");
    env::set_var(keys::LLM_MODEL, "gemini-1.5-pro");
    env::set_var(keys::LLM_TIMEOUT_SECS, "30");
    env::set_var(keys::DATA_DIR, "/tmp/nutriplan-env-test");

    let config = AppConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.llm.api_key.as_deref(), Some("env-test-key"));
    assert_eq!(config.llm.model, "gemini-1.5-pro");
    assert_eq!(config.llm.timeout, Duration::from_secs(30));
    assert_eq!(config.data_dir, PathBuf::from("/tmp/nutriplan-env-test"));
    assert!(!config.summary().contains("env-test-key"));
}

#[test]
#[serial]
fn test_from_env_rejects_bad_values() {
    clear_env();
    env::set_var(keys::LLM_TEMPERATURE, "warm");

    let error = AppConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    env::set_var("RUST_LOG", "nutriplan=trace");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("LOG_INCLUDE_LOCATION", "1");

    let config = LoggingConfig::from_env();
    env::remove_var("RUST_LOG");
    env::remove_var("LOG_FORMAT");
    env::remove_var("LOG_INCLUDE_LOCATION");

    assert_eq!(config.level, "nutriplan=trace");
    assert_eq!(config.format, LogFormat::Json);
    assert!(config.include_location);
    assert!(!config.include_spans);

    let defaults = LoggingConfig::from_env();
    assert_eq!(defaults.format, LogFormat::Compact);
}
