// ABOUTME: Daily nutrition totals merging plans with the consumption log
// ABOUTME: Planned and consumed sums, calories remaining, and the dashboard summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! Daily Nutrition Module
//!
//! AI meal plans only carry calories, so their macros are estimated from a
//! fixed split (`NutritionConfig::consumed_meal_estimate`). Custom plans use
//! the catalog facts of each food. Consumption ids that match nothing in the
//! current plan are ignored.

use std::collections::BTreeSet;
use std::ops::AddAssign;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::profile_derivation::{
    classify_bmi, compute_macro_targets, BmiClassification, MacroTargets,
};
use crate::config::{MacroDistribution, NutritionConfig};
use crate::errors::AppResult;
use crate::models::{CustomMealPlan, FoodItem, MealPlan, UserProfile};
use nutriplan_core::constants::units;

/// Calories and macros of a set of foods or meals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    /// Energy (kcal)
    pub calories: u32,
    /// Protein (g)
    pub protein: f64,
    /// Carbohydrates (g)
    pub carbs: f64,
    /// Fat (g)
    pub fat: f64,
}

impl NutritionTotals {
    /// Totals of one catalog food
    #[must_use]
    pub const fn from_food(food: &FoodItem) -> Self {
        Self {
            calories: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
        }
    }

    /// Estimate macros of a meal known only by its calories, in whole grams
    #[must_use]
    pub fn estimated(calories: u32, split: MacroDistribution) -> Self {
        let kcal = f64::from(calories);
        Self {
            calories,
            protein: (kcal * f64::from(split.protein_pct) / 100.0 / units::KCAL_PER_GRAM_PROTEIN)
                .round(),
            carbs: (kcal * f64::from(split.carbs_pct) / 100.0 / units::KCAL_PER_GRAM_CARBS)
                .round(),
            fat: (kcal * f64::from(split.fat_pct) / 100.0 / units::KCAL_PER_GRAM_FAT).round(),
        }
    }
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, other: Self) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fat += other.fat;
    }
}

/// Planned totals of an AI meal plan
#[must_use]
pub fn planned_plan_totals(plan: &MealPlan, split: MacroDistribution) -> NutritionTotals {
    NutritionTotals::estimated(plan.total_calories, split)
}

/// Totals of the AI meal slots marked eaten
#[must_use]
pub fn consumed_plan_totals(
    plan: &MealPlan,
    consumed: &BTreeSet<String>,
    split: MacroDistribution,
) -> NutritionTotals {
    let mut totals = NutritionTotals::default();
    for (slot, meal) in plan.meals() {
        if consumed.contains(&slot.consumption_id()) {
            totals += NutritionTotals::estimated(meal.calories, split);
        }
    }
    totals
}

/// Planned totals of a custom meal plan
#[must_use]
pub fn planned_custom_totals(plan: &CustomMealPlan) -> NutritionTotals {
    let mut totals = NutritionTotals::default();
    for food in plan.all_foods() {
        totals += NutritionTotals::from_food(food);
    }
    totals
}

/// Totals of the custom-plan foods marked eaten
#[must_use]
pub fn consumed_custom_totals(plan: &CustomMealPlan, consumed: &BTreeSet<String>) -> NutritionTotals {
    let mut totals = NutritionTotals::default();
    for food in plan.all_foods().filter(|food| consumed.contains(&food.id)) {
        totals += NutritionTotals::from_food(food);
    }
    totals
}

/// Nutrition picture of one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyNutrition {
    /// Day summarized
    pub date: NaiveDate,
    /// Daily calorie target from the profile
    pub target_calories: u32,
    /// Macro targets for the calorie target
    pub macro_targets: MacroTargets,
    /// Totals of everything planned (AI plan plus custom foods)
    pub planned: NutritionTotals,
    /// Totals of everything marked eaten
    pub consumed: NutritionTotals,
    /// Target minus consumed; negative once the target is exceeded
    pub calories_remaining: i64,
}

impl DailyNutrition {
    /// Consumed calories as a percentage of the target
    #[must_use]
    pub fn calorie_progress_percent(&self) -> f64 {
        if self.target_calories == 0 {
            return 0.0;
        }
        f64::from(self.consumed.calories) / f64::from(self.target_calories) * 100.0
    }
}

/// Merge plans and consumption log into a daily summary
///
/// # Errors
///
/// Returns `ConfigInvalid` if the goal's macro split does not sum to 100.
pub fn summarize_day(
    date: NaiveDate,
    profile: &UserProfile,
    ai_plan: Option<&MealPlan>,
    custom_plan: &CustomMealPlan,
    consumed: &BTreeSet<String>,
    config: &NutritionConfig,
) -> AppResult<DailyNutrition> {
    let macro_targets =
        compute_macro_targets(profile.daily_calories, profile.goal, &config.macro_splits)?;

    let mut planned = planned_custom_totals(custom_plan);
    let mut eaten = consumed_custom_totals(custom_plan, consumed);
    if let Some(plan) = ai_plan {
        planned += planned_plan_totals(plan, config.consumed_meal_estimate);
        eaten += consumed_plan_totals(plan, consumed, config.consumed_meal_estimate);
    }

    Ok(DailyNutrition {
        date,
        target_calories: profile.daily_calories,
        macro_targets,
        planned,
        consumed: eaten,
        calories_remaining: i64::from(profile.daily_calories) - i64::from(eaten.calories),
    })
}

/// Headline numbers shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// User's display name
    pub name: String,
    /// Current BMI
    pub bmi: f64,
    /// BMI band
    pub bmi_class: BmiClassification,
    /// Ideal weight (kg)
    pub ideal_weight: f64,
    /// Daily calorie target
    pub daily_calories: u32,
    /// Today's nutrition
    pub today: DailyNutrition,
}

/// Assemble the dashboard from the profile and today's summary
#[must_use]
pub fn build_dashboard(profile: &UserProfile, today: DailyNutrition) -> DashboardSummary {
    DashboardSummary {
        name: profile.name.clone(),
        bmi: profile.bmi,
        bmi_class: classify_bmi(profile.bmi),
        ideal_weight: profile.ideal_weight,
        daily_calories: profile.daily_calories,
        today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_macros_use_split() {
        let totals = NutritionTotals::estimated(2000, MacroDistribution::new(25, 45, 30));
        assert_eq!(totals.calories, 2000);
        assert!((totals.protein - 125.0).abs() < f64::EPSILON);
        assert!((totals.carbs - 225.0).abs() < f64::EPSILON);
        assert!((totals.fat - 67.0).abs() < f64::EPSILON);
    }
}
