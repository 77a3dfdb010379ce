// ABOUTME: Failure taxonomy for the AI recommendation normalizer
// ABOUTME: Classifies provider errors and converts every variant into RecommendationUnavailable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # Recommendation Error Types
//!
//! Every way the completion path can fail. The normalizer absorbs all of them
//! into a fallback plan; callers that opt into the strict path receive them as
//! an [`AppError`] with [`ErrorCode::RecommendationUnavailable`].

use std::time::Duration;

use thiserror::Error;

use super::{AppError, ErrorCode};

/// Errors produced while obtaining a structured recommendation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecommendationError {
    /// No completion provider configured (missing API key)
    #[error("no completion provider configured")]
    NotConfigured,

    /// The request never reached the service or the connection dropped
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The service answered with a non-success HTTP status
    #[error("upstream returned HTTP {status}: {message}")]
    UpstreamHttp {
        /// HTTP status code (0 when the provider did not report one)
        status: u16,
        /// Message extracted from the upstream error body
        message: String,
    },

    /// The response envelope held no text candidate
    #[error("completion contained no text")]
    EmptyCompletion,

    /// The extracted text is not valid JSON for the expected schema
    #[error("malformed JSON in completion: {0}")]
    MalformedJson(String),

    /// JSON parsed but required top-level keys are absent
    #[error("completion is missing required fields: {0}")]
    MissingFields(String),

    /// The request exceeded the configured timeout
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),
}

impl RecommendationError {
    /// Classify an error returned by a completion provider
    #[must_use]
    pub fn from_provider(error: &AppError) -> Self {
        match error.code {
            ErrorCode::ExternalServiceUnavailable => Self::NetworkFailure(error.message.clone()),
            ErrorCode::ExternalEmptyResponse => Self::EmptyCompletion,
            ErrorCode::ExternalAuthFailed => Self::UpstreamHttp {
                status: 401,
                message: error.message.clone(),
            },
            ErrorCode::ExternalRateLimited => Self::UpstreamHttp {
                status: 429,
                message: error.message.clone(),
            },
            ErrorCode::ConfigError | ErrorCode::ConfigMissing | ErrorCode::ConfigInvalid => {
                Self::NotConfigured
            }
            _ => Self::UpstreamHttp {
                status: extract_status(&error.message).unwrap_or(0),
                message: error.message.clone(),
            },
        }
    }

    /// Short machine-readable label used in structured logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::NetworkFailure(_) => "network_failure",
            Self::UpstreamHttp { .. } => "upstream_http",
            Self::EmptyCompletion => "empty_completion",
            Self::MalformedJson(_) => "malformed_json",
            Self::MissingFields(_) => "missing_fields",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Pull an HTTP status out of messages shaped like `"... (503): ..."`
fn extract_status(message: &str) -> Option<u16> {
    let open = message.find('(')?;
    let close = message[open..].find(')')? + open;
    message[open + 1..close].parse().ok()
}

impl From<RecommendationError> for AppError {
    fn from(error: RecommendationError) -> Self {
        Self::new(ErrorCode::RecommendationUnavailable, error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_network_failure() {
        let error = AppError::external_unavailable("gemini", "connection refused");
        assert!(matches!(
            RecommendationError::from_provider(&error),
            RecommendationError::NetworkFailure(_)
        ));
    }

    #[test]
    fn test_classifies_http_status_from_message() {
        let error = AppError::external_service("gemini", "API error (503): overloaded");
        assert_eq!(
            RecommendationError::from_provider(&error),
            RecommendationError::UpstreamHttp {
                status: 503,
                message: "gemini: API error (503): overloaded".to_owned(),
            }
        );
    }

    #[test]
    fn test_converts_into_unavailable() {
        let error: AppError = RecommendationError::EmptyCompletion.into();
        assert_eq!(error.code, ErrorCode::RecommendationUnavailable);
    }
}
