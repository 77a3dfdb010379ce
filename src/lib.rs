// ABOUTME: Main library entry point for the NutriPlan nutrition and training planner
// ABOUTME: Profile derivation, AI recommendation normalizer, persistence and session flows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

#![deny(unsafe_code)]

//! # NutriPlan
//!
//! A personal nutrition and training planner. From a handful of body metrics
//! NutriPlan derives BMI, BMR, a daily calorie target and macro targets, asks
//! a generative language model for a personalized meal and workout plan, and
//! normalizes whatever text comes back into a typed plan. When the model is
//! unavailable or its output unusable, a static plan scaled to the user's
//! calorie target is served instead.
//!
//! ## Architecture
//!
//! - **Intelligence**: pure derivation, daily totals, progress analytics
//! - **LLM**: completion provider trait and the Gemini client
//! - **Recommendations**: prompt, completion, extraction, normalization, fallback
//! - **Storage**: versioned JSON values in a key/value store
//! - **Session**: onboarding, route guarding, consumption and progress logs
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nutriplan::config::AppConfig;
//! use nutriplan::recommendations::RecommendationService;
//! use nutriplan::session::Session;
//! use nutriplan::storage::FileStore;
//!
//! # async fn run() -> nutriplan::errors::AppResult<()> {
//! let config = AppConfig::from_env()?;
//! let session = Session::new(
//!     Box::new(FileStore::open(&config.data_dir)?),
//!     config.nutrition.clone(),
//! );
//! let service = RecommendationService::from_config(&config);
//! let profile = session.require_user()?;
//! let outcome = service.get_recommendations(&profile).await;
//! println!("{} kcal planned", outcome.recommendations.meals.total_calories);
//! # Ok(())
//! # }
//! ```

/// Environment configuration and nutrition coefficients
pub mod config;

/// Unified error handling system with standard error codes
pub mod errors;

/// Code-fence stripping and JSON block extraction from model output
pub mod extraction;

/// Profile derivation, daily nutrition and progress analytics
pub mod intelligence;

/// Completion provider abstraction and the Gemini client
pub mod llm;

/// Structured logging configuration
pub mod logging;

/// Domain models shared with `nutriplan-core`
pub mod models;

/// AI recommendation normalizer with fallback plans
pub mod recommendations;

/// Onboarding, route guard and per-user logs over the store
pub mod session;

/// Versioned key/value persistence
pub mod storage;

pub use nutriplan_core::constants;
