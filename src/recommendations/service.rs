// ABOUTME: Recommendation service orchestrating prompt, completion, normalization and fallback
// ABOUTME: Never fails on the default path; the strict path surfaces the classified error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::fallback::{fallback_recommendations, fallback_workout_plan};
use super::normalizer::normalize_completion;
use crate::config::{AppConfig, ContentConfig, NutritionConfig};
use crate::errors::{AppError, AppResult, RecommendationError};
use crate::intelligence::compute_daily_calories;
use crate::llm::prompts::{food_question_prompt, recommendation_prompt};
use crate::llm::{ChatRequest, GeminiProvider, LlmProvider};
use crate::models::{PersonalizedRecommendations, PlanSource, UserProfile};

/// Sampling temperature for free-text food questions
pub const FOOD_QUESTION_TEMPERATURE: f32 = 0.8;
/// Output token budget for free-text food questions
pub const FOOD_QUESTION_MAX_TOKENS: u32 = 300;

/// Reply when the service answered without any text
pub const FOOD_QUESTION_EMPTY_REPLY: &str =
    "Sorry, I couldn't process your question right now.";
/// Reply when the question could not be answered at all
pub const FOOD_QUESTION_ERROR_REPLY: &str =
    "Sorry, something went wrong while processing your question. Please try again.";

/// Notice shown alongside a fallback plan
pub const FALLBACK_NOTICE: &str =
    "AI recommendations are unavailable right now; showing a standard plan sized to your calorie target.";

/// Recommendations plus where they came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOutcome {
    /// The plan to show
    pub recommendations: PersonalizedRecommendations,
    /// Generated or fallback
    pub source: PlanSource,
    /// Non-blocking message for the user when the fallback was served
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Why generation failed, when it did
    #[serde(skip)]
    pub failure: Option<RecommendationError>,
}

impl RecommendationOutcome {
    /// Whether the plan came from the completion service
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.source == PlanSource::Generated
    }
}

/// Completion request settings used for plan generation
#[derive(Debug, Clone)]
struct GenerationSettings {
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    timeout: Duration,
}

/// Builds personalized plans from the completion service
pub struct RecommendationService {
    provider: Option<Arc<dyn LlmProvider>>,
    settings: GenerationSettings,
    content: ContentConfig,
    nutrition: NutritionConfig,
}

impl RecommendationService {
    /// Service over an explicit provider (or none)
    #[must_use]
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, config: &AppConfig) -> Self {
        Self {
            provider,
            settings: GenerationSettings {
                model: config.llm.model.clone(),
                temperature: config.llm.temperature,
                max_output_tokens: config.llm.max_output_tokens,
                timeout: config.llm.timeout,
            },
            content: config.content.clone(),
            nutrition: config.nutrition.clone(),
        }
    }

    /// Service backed by Gemini when a key is configured, fallback-only otherwise
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let provider: Option<Arc<dyn LlmProvider>> = match GeminiProvider::from_config(&config.llm)
        {
            Ok(provider) => {
                info!(model = %config.llm.model, "AI recommendations enabled");
                Some(Arc::new(provider))
            }
            Err(e) => {
                warn!(error = %e, "AI recommendations disabled; fallback plans only");
                None
            }
        };
        Self::new(provider, config)
    }

    /// Whether a completion provider is configured
    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Calorie target for the profile, recomputed from its body metrics
    ///
    /// Falls back to the stored `daily_calories` if the stored metrics no
    /// longer validate.
    #[must_use]
    pub fn target_calories(&self, profile: &UserProfile) -> u32 {
        compute_daily_calories(
            profile.weight,
            profile.height,
            profile.age,
            profile.gender,
            profile.activity_level,
            profile.goal,
            &self.nutrition,
        )
        .unwrap_or(profile.daily_calories)
    }

    /// Static plan scaled to the profile
    #[must_use]
    pub fn fallback(&self, profile: &UserProfile) -> PersonalizedRecommendations {
        fallback_recommendations(profile, self.target_calories(profile), &self.nutrition)
    }

    /// Generate a plan, surfacing any failure
    ///
    /// # Errors
    ///
    /// Returns the classified [`RecommendationError`] when the provider is
    /// missing, the request fails or times out, or the output cannot be
    /// normalized.
    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    pub async fn try_generate(
        &self,
        profile: &UserProfile,
    ) -> Result<PersonalizedRecommendations, RecommendationError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(RecommendationError::NotConfigured)?;

        let prompt = recommendation_prompt(profile, self.target_calories(profile), &self.content);
        let request = ChatRequest::prompt(prompt)
            .with_model(self.settings.model.clone())
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_output_tokens);

        debug!(phase = "requesting", provider = provider.name(), "Requesting recommendations");
        let response = timeout(self.settings.timeout, provider.complete(&request))
            .await
            .map_err(|_| RecommendationError::Timeout(self.settings.timeout))?
            .map_err(|e| RecommendationError::from_provider(&e))?;

        debug!(phase = "parsing", chars = response.content.len(), "Normalizing completion");
        let normalized = normalize_completion(&response.content, fallback_workout_plan)?;
        if normalized.workout_replaced {
            info!("Completion had no usable workout week; substituted the standard week");
        }

        debug!(phase = "ready", "Recommendations generated");
        Ok(normalized.recommendations)
    }

    /// Generate a plan, serving the fallback on any failure
    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    pub async fn get_recommendations(&self, profile: &UserProfile) -> RecommendationOutcome {
        match self.try_generate(profile).await {
            Ok(recommendations) => RecommendationOutcome {
                recommendations,
                source: PlanSource::Generated,
                notice: None,
                failure: None,
            },
            Err(error) => {
                warn!(
                    phase = "failed",
                    kind = error.kind(),
                    error = %error,
                    "Recommendation generation failed; serving fallback plan"
                );
                RecommendationOutcome {
                    recommendations: self.fallback(profile),
                    source: PlanSource::Fallback,
                    notice: Some(FALLBACK_NOTICE.to_owned()),
                    failure: Some(error),
                }
            }
        }
    }

    /// Answer a free-text nutrition question for this user
    ///
    /// Any service failure yields a fixed apology rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the question is blank.
    #[instrument(skip(self, profile, question), fields(user_id = %profile.id))]
    pub async fn answer_food_question(
        &self,
        profile: &UserProfile,
        question: &str,
    ) -> AppResult<String> {
        if question.trim().is_empty() {
            return Err(AppError::invalid_input("Question must not be empty"));
        }
        let Some(provider) = self.provider.as_ref() else {
            warn!("Food question asked without a configured provider");
            return Ok(FOOD_QUESTION_ERROR_REPLY.to_owned());
        };

        let request = ChatRequest::prompt(food_question_prompt(profile, question, &self.content))
            .with_model(self.settings.model.clone())
            .with_temperature(FOOD_QUESTION_TEMPERATURE)
            .with_max_tokens(FOOD_QUESTION_MAX_TOKENS);

        match timeout(self.settings.timeout, provider.complete(&request)).await {
            Ok(Ok(response)) if !response.content.trim().is_empty() => {
                Ok(response.content.trim().to_owned())
            }
            Ok(Ok(_)) => Ok(FOOD_QUESTION_EMPTY_REPLY.to_owned()),
            Ok(Err(e)) => {
                let error = RecommendationError::from_provider(&e);
                if matches!(error, RecommendationError::EmptyCompletion) {
                    return Ok(FOOD_QUESTION_EMPTY_REPLY.to_owned());
                }
                warn!(kind = error.kind(), error = %error, "Food question failed");
                Ok(FOOD_QUESTION_ERROR_REPLY.to_owned())
            }
            Err(_) => {
                warn!(timeout = ?self.settings.timeout, "Food question timed out");
                Ok(FOOD_QUESTION_ERROR_REPLY.to_owned())
            }
        }
    }
}
