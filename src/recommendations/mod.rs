// ABOUTME: AI recommendation normalizer: prompt, completion, JSON extraction, typed plan or fallback
// ABOUTME: Also hosts refresh serialization and the free-text food question helper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # Recommendations
//!
//! Per invocation the service moves through `requesting`, then either
//! `parsing` and `ready`, or `failed` and a ready fallback. Phases are logged
//! through `tracing`; callers only see the final [`RecommendationOutcome`].
//!
//! Every failure kind (missing key, network, HTTP status, empty completion,
//! malformed JSON, missing fields, timeout) collapses into a fallback plan
//! whose meal calories add up to the profile's calorie target.

/// Static plans sized to the calorie target
pub mod fallback;
/// Completion text to typed plan
pub mod normalizer;
/// Generation counter guarding against stale responses
pub mod refresh;
/// Orchestration over the completion provider
pub mod service;

pub use fallback::{fallback_meal_plan, fallback_recommendations, fallback_workout_plan};
pub use normalizer::{normalize_completion, NormalizedPlan};
pub use refresh::{RecommendationRefresher, RefreshOutcome};
pub use service::{RecommendationOutcome, RecommendationService};
