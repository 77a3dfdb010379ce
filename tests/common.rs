// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging, sample profiles, sessions and scripted completion providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `nutriplan`

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use nutriplan::config::{AppConfig, NutritionConfig};
use nutriplan::errors::AppError;
use nutriplan::intelligence::derive_metrics;
use nutriplan::llm::{ChatRequest, ChatResponse, LlmProvider};
use nutriplan::models::{ActivityLevel, BodyMetrics, Gender, Goal, UserProfile};
use nutriplan::session::{OnboardingInput, Session};
use nutriplan::storage::InMemoryStore;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// 70 kg, 170 cm, 25 year old man, moderately active, maintaining weight
///
/// Mifflin-St Jeor BMR 1642.5, TDEE 2545.875, daily target 2546 kcal.
pub fn sample_input() -> OnboardingInput {
    OnboardingInput {
        name: "Budi".to_owned(),
        email: "budi@example.com".to_owned(),
        age: 25,
        gender: Gender::Male,
        height: 170.0,
        weight: 70.0,
        activity_level: ActivityLevel::Moderate,
        goal: Goal::MaintainWeight,
        dietary_restrictions: BTreeSet::new(),
        allergies: BTreeSet::new(),
    }
}

/// Stored form of [`sample_input`], derived fields computed with the default config
pub fn sample_profile() -> UserProfile {
    let input = sample_input();
    let metrics = BodyMetrics {
        weight_kg: input.weight,
        height_cm: input.height,
        age: input.age,
        gender: input.gender,
    };
    let derived = derive_metrics(
        &metrics,
        input.activity_level,
        input.goal,
        &NutritionConfig::default(),
    )
    .unwrap();

    UserProfile {
        id: Uuid::new_v4(),
        name: input.name,
        email: input.email,
        age: input.age,
        gender: input.gender,
        height: input.height,
        weight: input.weight,
        activity_level: input.activity_level,
        goal: input.goal,
        bmi: derived.bmi,
        ideal_weight: derived.ideal_weight,
        daily_calories: derived.daily_calories,
        dietary_restrictions: input.dietary_restrictions,
        allergies: input.allergies,
        created_at: Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap(),
    }
}

/// Default configuration with a short timeout for tests
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.llm.timeout = Duration::from_millis(500);
    config
}

/// Session over an empty in-memory store
pub fn memory_session() -> Session {
    init_test_logging();
    Session::new(Box::new(InMemoryStore::new()), test_config().nutrition)
}

/// Session that has already completed onboarding with [`sample_input`]
pub fn onboarded_session() -> Session {
    let session = memory_session();
    session
        .onboard(sample_input(), Utc::now())
        .expect("sample onboarding is valid");
    session
}

/// Provider that answers every request with a fixed result
pub struct ScriptedProvider {
    reply: Result<String, AppError>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: AppError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(ChatResponse {
                content: text.clone(),
                model: request.model.clone().unwrap_or_else(|| "scripted-model".to_owned()),
                usage: None,
                finish_reason: Some("STOP".to_owned()),
            }),
            Err(error) => Err(AppError::new(error.code, error.message.clone())),
        }
    }
}

/// Provider that holds every request until released
pub struct GatedProvider {
    reply: String,
    gate: Notify,
    started: Notify,
}

impl GatedProvider {
    pub fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            gate: Notify::new(),
            started: Notify::new(),
        })
    }

    /// Wait until a request has reached the provider
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Let one waiting request complete
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl LlmProvider for GatedProvider {
    fn name(&self) -> &'static str {
        "gated"
    }

    fn default_model(&self) -> &str {
        "gated-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.started.notify_one();
        self.gate.notified().await;
        Ok(ChatResponse {
            content: self.reply.clone(),
            model: "gated-model".to_owned(),
            usage: None,
            finish_reason: None,
        })
    }
}

/// A well-formed nested completion, optionally wrapped in a code fence
pub fn nested_completion(daily_calories: u32, fenced: bool) -> String {
    let breakfast = daily_calories / 4;
    let lunch = daily_calories * 35 / 100;
    let dinner = daily_calories - breakfast - lunch;
    let days: Vec<String> = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ]
    .iter()
    .map(|day| {
        format!(
            r#"{{"day":"{day}","exercises":["Brisk walk"],"duration":"30 minutes","intensity":"Low","focus":"Cardio"}}"#
        )
    })
    .collect();
    let body = format!(
        r#"{{
  "meals": {{
    "breakfast": {{"menu":"Nasi uduk","calories":{breakfast},"time":"07:00","reasoning":"Energy","portions":"1 plate"}},
    "lunch": {{"menu":"Gado-gado","calories":{lunch},"time":"12:30","reasoning":"Fibre","portions":"1 bowl"}},
    "dinner": {{"menu":"Ikan bakar","calories":{dinner},"time":"19:00","reasoning":"Protein","portions":"1 fillet"}},
    "totalCalories": {daily_calories},
    "nutritionTips": "Eat slowly",
    "hydrationGoal": "2.5 liters per day"
  }},
  "workout": {{
    "weeklyPlan": [{}],
    "generalReasoning": "Stay active",
    "tips": "Warm up first"
  }}
}}"#,
        days.join(",")
    );
    if fenced {
        format!("Here is your plan:\n```json\n{body}\n```\nEnjoy!")
    } else {
        body
    }
}
