// ABOUTME: Configuration management module for environment settings and nutrition coefficients
// ABOUTME: Re-exports AppConfig and the nutrition configuration sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! Configuration module for NutriPlan
//!
//! - **Environment**: completion service, content locale and data directory
//!   from environment variables
//! - **Nutrition**: BMR coefficients, activity factors, goal adjustments,
//!   macro splits and meal calorie distribution

/// Environment-driven application configuration
pub mod environment;
/// Nutrition derivation coefficients
pub mod nutrition;

pub use environment::{AppConfig, ContentConfig, LlmConfig};
pub use nutrition::{
    ActivityFactorsConfig, BmrConfig, GoalAdjustmentConfig, MacroDistribution, MacroSplitConfig,
    MealDistributionConfig, NutritionConfig,
};
