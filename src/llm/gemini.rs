// ABOUTME: Google Gemini generateContent client implementing LlmProvider
// ABOUTME: Sends the API key as a header, maps HTTP failures onto external error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # Gemini Provider
//!
//! Talks to `POST {base_url}/models/{model}:generateContent`. The key comes
//! from [`LlmConfig`] (`GEMINI_API_KEY`) and travels in the `x-goog-api-key`
//! header so it never ends up in a logged URL. Point `base_url` at a
//! server-side proxy to keep the key off end-user machines entirely.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, MessageRole, TokenUsage};
use crate::config::LlmConfig;
use crate::errors::{AppError, AppResult, ErrorCode};

const SERVICE: &str = "gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Gemini text-completion client
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    default_model: String,
    client: Client,
}

impl GeminiProvider {
    /// Build a provider from the completion settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when no API key is configured, or `ConfigError`
    /// if the HTTP client cannot be constructed.
    pub fn from_config(config: &LlmConfig) -> AppResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AppError::new(
                ErrorCode::ConfigMissing,
                "GEMINI_API_KEY is not set; AI recommendations are disabled",
            )
        })?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            default_model: config.model.clone(),
            client,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    /// Gemini only knows `user` and `model`; system text goes to `systemInstruction`
    fn build_request(request: &ChatRequest) -> GenerateContentRequest {
        let text_content = |role: Option<&str>, message: &ChatMessage| Content {
            role: role.map(str::to_owned),
            parts: vec![Part {
                text: Some(message.content.clone()),
            }],
        };

        let mut contents = Vec::with_capacity(request.messages.len());
        let mut system_instruction = None;
        for message in &request.messages {
            match message.role {
                MessageRole::System => system_instruction = Some(text_content(None, message)),
                MessageRole::User => contents.push(text_content(Some("user"), message)),
                MessageRole::Assistant => contents.push(text_content(Some("model"), message)),
            }
        }

        let generation_config = (request.temperature.is_some() || request.max_tokens.is_some())
            .then_some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            });

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    /// Text of the first candidate, joined across its parts
    fn first_candidate_text(response: &GenerateContentResponse) -> AppResult<String> {
        let text: String = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::new(
                ErrorCode::ExternalEmptyResponse,
                "Gemini returned no text candidate",
            ));
        }
        Ok(text)
    }

    fn map_api_error(status: u16, body: &str) -> AppError {
        let message = serde_json::from_str::<GenerateContentResponse>(body)
            .ok()
            .and_then(|response| response.error)
            .map_or_else(|| body.trim().to_owned(), |error| error.message);

        match status {
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("Gemini quota exceeded (429): {message}"),
            ),
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("Gemini rejected the API key ({status}): {message}"),
            ),
            _ => AppError::external_service(SERVICE, format!("API error ({status}): {message}")),
        }
    }

    fn convert_usage(metadata: &UsageMetadata) -> TokenUsage {
        TokenUsage {
            prompt_tokens: metadata.prompt_token_count.unwrap_or(0),
            completion_tokens: metadata.candidates_token_count.unwrap_or(0),
            total_tokens: metadata.total_token_count.unwrap_or(0),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        SERVICE
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, request), fields(provider = SERVICE))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let body = Self::build_request(request);

        debug!(model, "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::external_unavailable(SERVICE, format!("request failed: {e}"))
                    .with_source(e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AppError::external_unavailable(SERVICE, format!("failed to read response: {e}"))
        })?;

        if !status.is_success() {
            warn!(status = %status, "Gemini API returned an error status");
            return Err(Self::map_api_error(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            AppError::external_service(SERVICE, format!("unreadable response envelope: {e}"))
        })?;

        if let Some(error) = &parsed.error {
            return Err(AppError::external_service(
                SERVICE,
                format!("API error ({}): {}", status.as_u16(), error.message),
            ));
        }

        let content = Self::first_candidate_text(&parsed)?;
        debug!(chars = content.len(), "Received Gemini completion");

        Ok(ChatResponse {
            content,
            model: model.to_owned(),
            usage: parsed.usage_metadata.as_ref().map(Self::convert_usage),
            finish_reason: parsed
                .candidates
                .first()
                .and_then(|candidate| candidate.finish_reason.clone()),
        })
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    fn config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: api_key.map(str::to_owned),
            model: "gemini-2.0-flash".to_owned(),
            base_url: "https://example.invalid/v1beta/".to_owned(),
            timeout: Duration::from_secs(15),
            temperature: 0.7,
            max_output_tokens: 2048,
        }
    }

    #[test]
    fn test_missing_key_is_config_missing() {
        let error = GeminiProvider::from_config(&config(None)).unwrap_err();
        assert_eq!(error.code, ErrorCode::ConfigMissing);
    }

    #[test]
    fn test_endpoint_and_debug_redaction() {
        let provider = GeminiProvider::from_config(&config(Some("secret-key"))).unwrap();
        assert_eq!(
            provider.endpoint("gemini-2.0-flash"),
            "https://example.invalid/v1beta/models/gemini-2.0-flash:generateContent"
        );
        let debug = format!("{provider:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest::prompt("plan my week")
            .with_temperature(0.7)
            .with_max_tokens(2048);
        let body = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();
        // f32 widens to 0.699999988079071 on the wire
        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "plan my week"}]}],
                "generationConfig": {"temperature": f64::from(0.7_f32), "maxOutputTokens": 2048}
            })
        );
        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_system_message_becomes_instruction() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
        ]);
        let body = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_first_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}, "finishReason": "STOP"}]
        }))
        .unwrap();
        assert_eq!(
            GeminiProvider::first_candidate_text(&response).unwrap(),
            "{\"a\":1}"
        );

        let empty: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": []})).unwrap();
        assert_eq!(
            GeminiProvider::first_candidate_text(&empty).unwrap_err().code,
            ErrorCode::ExternalEmptyResponse
        );
    }

    #[test]
    fn test_error_status_mapping() {
        let body = r#"{"error": {"message": "Resource has been exhausted"}}"#;
        let limited = GeminiProvider::map_api_error(429, body);
        assert_eq!(limited.code, ErrorCode::ExternalRateLimited);
        assert!(limited.message.contains("Resource has been exhausted"));

        assert_eq!(
            GeminiProvider::map_api_error(403, "denied").code,
            ErrorCode::ExternalAuthFailed
        );

        let server = GeminiProvider::map_api_error(503, "overloaded");
        assert_eq!(server.code, ErrorCode::ExternalServiceError);
        assert_eq!(server.message, "gemini: API error (503): overloaded");
    }
}
