// ABOUTME: Intelligence module grouping the nutrition and progress computations
// ABOUTME: Profile derivation, daily nutrition totals, food catalog and progress analytics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # Intelligence Module
//!
//! Synchronous, side-effect free computations over the user's profile, plans
//! and logs. Nothing here touches storage or the network.

/// Daily nutrition totals and dashboard summary
pub mod daily_nutrition;
/// Built-in food catalog and search
pub mod food_catalog;
/// BMI, ideal weight, BMR, calorie target and macro targets
pub mod profile_derivation;
/// Weight trend, goal progress and achievements
pub mod progress;

pub use daily_nutrition::{build_dashboard, summarize_day, DailyNutrition, DashboardSummary, NutritionTotals};
pub use food_catalog::FoodCatalog;
pub use profile_derivation::{
    classify_bmi, compute_bmi, compute_bmr, compute_daily_calories, compute_ideal_weight,
    compute_macro_targets, compute_tdee, derive_metrics, BmiCategory, BmiClassification,
    BmiSeverity, DerivedMetrics, MacroTargets,
};
pub use progress::{summarize_progress, Achievement, ProgressSummary, WeightDirection, WeightTrend};
