// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors
// ABOUTME: Output formatting helpers for the nutriplan CLI
// ABOUTME: Human-readable tables for plans and summaries, or pretty JSON with --json

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use nutriplan::intelligence::{DailyNutrition, DerivedMetrics, NutritionTotals};
use nutriplan::models::{MealPlan, UserProfile, WorkoutPlan};

const RULE_WIDTH: usize = 60;

/// Where command results go
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or hand it to `human` for text output
    pub fn render<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }

    /// One status line
    pub fn line(&self, message: &str) {
        if self.json {
            println!("{}", json!({ "message": message }));
        } else {
            println!("{message}");
        }
    }
}

fn rule() {
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn join_or_none<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    let joined = items.into_iter().cloned().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_owned()
    } else {
        joined
    }
}

pub fn display_profile(profile: &UserProfile) {
    println!("\n{} <{}>", profile.name, profile.email);
    rule();
    println!("   Age: {}   Gender: {}", profile.age, profile.gender);
    println!("   Height: {:.1} cm   Weight: {:.1} kg", profile.height, profile.weight);
    println!("   Activity: {}", profile.activity_level.description());
    println!("   Goal: {}", profile.goal.description());
    println!("   Dietary restrictions: {}", join_or_none(&profile.dietary_restrictions));
    println!("   Allergies: {}", join_or_none(&profile.allergies));
    println!(
        "   BMI: {:.1}   Ideal weight: {:.1} kg   Daily target: {} kcal",
        profile.bmi, profile.ideal_weight, profile.daily_calories
    );
}

pub fn display_metrics(metrics: &DerivedMetrics) {
    println!("\nBody metrics");
    rule();
    println!("   BMI: {:.1} ({})", metrics.bmi, metrics.bmi_class.label);
    println!("   Ideal weight: {:.1} kg", metrics.ideal_weight);
    println!("   BMR: {:.0} kcal/day", metrics.bmr);
    println!("   TDEE: {:.0} kcal/day", metrics.tdee);
    println!("   Daily target: {} kcal", metrics.daily_calories);
    println!(
        "   Macros: {} g protein, {} g carbs, {} g fat",
        metrics.macros.protein_grams, metrics.macros.carb_grams, metrics.macros.fat_grams
    );
}

pub fn display_meal_plan(plan: &MealPlan) {
    println!("\nMeal plan ({} kcal)", plan.total_calories);
    rule();
    for (slot, meal) in plan.meals() {
        println!("[{slot}] {} - {} kcal", meal.menu, meal.calories);
        if !meal.time.is_empty() {
            println!("   Time: {}", meal.time);
        }
        if !meal.portions.is_empty() {
            println!("   Portions: {}", meal.portions);
        }
        if !meal.reasoning.is_empty() {
            println!("   Why: {}", meal.reasoning);
        }
    }
    if let Some(tips) = &plan.nutrition_tips {
        println!("\nTips: {tips}");
    }
    if let Some(hydration) = &plan.hydration_goal {
        println!("Hydration: {hydration}");
    }
}

pub fn display_workout_plan(plan: &WorkoutPlan) {
    println!("\nWorkout week");
    rule();
    for day in &plan.weekly_plan {
        println!("{:<10} {} ({}, {})", day.day, day.exercises, day.duration, day.intensity);
    }
    if let Some(tips) = &plan.tips {
        println!("\nTips: {tips}");
    }
}

fn display_totals(label: &str, totals: &NutritionTotals) {
    println!(
        "   {label:<9} {:>5} kcal  {:>5.0} g protein  {:>5.0} g carbs  {:>5.0} g fat",
        totals.calories, totals.protein, totals.carbs, totals.fat
    );
}

pub fn display_daily_nutrition(day: &DailyNutrition) {
    println!("\nNutrition for {}", day.date);
    rule();
    println!(
        "   Target:   {:>5} kcal  ({} g protein, {} g carbs, {} g fat)",
        day.target_calories,
        day.macro_targets.protein_grams,
        day.macro_targets.carb_grams,
        day.macro_targets.fat_grams
    );
    display_totals("Planned:", &day.planned);
    display_totals("Consumed:", &day.consumed);
    println!(
        "   Remaining: {} kcal ({:.0}% of target eaten)",
        day.calories_remaining,
        day.calorie_progress_percent()
    );
}
