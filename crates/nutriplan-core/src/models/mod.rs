// ABOUTME: Domain model re-exports for profile, plan, food and progress types
// ABOUTME: Every persisted shape in the key/value store is defined here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

/// Food catalog items and custom meal plans
pub mod food;
/// Meal and workout plans
pub mod plan;
/// User profile and its closed enumerations
pub mod profile;
/// Body progress snapshots
pub mod progress;

pub use food::{CustomMealPlan, FoodItem};
pub use plan::{
    CachedRecommendations, DayPlan, Exercises, MealDetail, MealPlan, MealSlot,
    PersonalizedRecommendations, PlanSource, WorkoutPlan, DAYS_PER_WEEK,
};
pub use profile::{ActivityLevel, BodyMetrics, Gender, Goal, UserProfile};
pub use progress::{BodyMeasurements, NewProgressEntry, ProgressEntry};
