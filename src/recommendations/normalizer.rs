// ABOUTME: Turns raw completion text into typed meal and workout plans
// ABOUTME: Accepts nested and flat shapes, requires the three main meals, repairs the workout group
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! Completion normalizer
//!
//! Accepted shapes:
//!
//! - nested: `{"meals": {...}, "workout": {...}}`
//! - flat: a bare meal plan `{"breakfast": ..., "lunch": ..., "dinner": ...}`,
//!   optionally with `workout` or `weeklyPlan` alongside
//!
//! The meal plan is mandatory. The workout group is all-or-nothing: when it is
//! absent, malformed, or not exactly seven days, the caller's fallback week is
//! used instead and [`NormalizedPlan::workout_replaced`] is set.

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::RecommendationError;
use crate::extraction::extract_json_block;
use crate::models::{MealPlan, MealSlot, PersonalizedRecommendations, WorkoutPlan};

const REQUIRED_MEALS: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

/// Result of normalizing one completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPlan {
    /// Typed plan
    pub recommendations: PersonalizedRecommendations,
    /// Whether the workout group came from the fallback week
    pub workout_replaced: bool,
}

/// Parse completion text into recommendations
///
/// # Errors
///
/// Returns `MalformedJson` when no JSON can be extracted or it does not match
/// the meal schema, and `MissingFields` when a main meal is absent.
pub fn normalize_completion<F>(
    text: &str,
    fallback_workout: F,
) -> Result<NormalizedPlan, RecommendationError>
where
    F: FnOnce() -> WorkoutPlan,
{
    let block = extract_json_block(text).ok_or_else(|| {
        RecommendationError::MalformedJson("no JSON object found in completion".to_owned())
    })?;
    let value: Value = serde_json::from_str(block)
        .map_err(|e| RecommendationError::MalformedJson(e.to_string()))?;
    let Value::Object(root) = value else {
        return Err(RecommendationError::MissingFields(
            "expected a JSON object with meals".to_owned(),
        ));
    };

    let (meals_value, workout_value) = split_groups(root);
    let meals = parse_meals(meals_value)?;

    let workout = workout_value.and_then(parse_workout);
    let workout_replaced = workout.is_none();
    if workout_replaced {
        debug!("Workout group missing or invalid; using fallback week");
    }

    Ok(NormalizedPlan {
        recommendations: PersonalizedRecommendations {
            meals,
            workout: workout.unwrap_or_else(fallback_workout),
        },
        workout_replaced,
    })
}

/// Separate the meal group from the workout group in either accepted shape
fn split_groups(mut root: Map<String, Value>) -> (Value, Option<Value>) {
    if root.get("meals").is_some_and(Value::is_object) {
        let meals = root.remove("meals").unwrap_or_default();
        return (meals, root.remove("workout"));
    }

    let workout = root.remove("workout").or_else(|| {
        let weekly_plan = root.remove("weeklyPlan")?;
        let mut group = Map::new();
        group.insert("weeklyPlan".to_owned(), weekly_plan);
        if let Some(reasoning) = root.remove("workoutReasoning") {
            group.insert("generalReasoning".to_owned(), reasoning);
        }
        if let Some(tips) = root.remove("tips") {
            group.insert("tips".to_owned(), tips);
        }
        Some(Value::Object(group))
    });
    (Value::Object(root), workout)
}

fn parse_meals(value: Value) -> Result<MealPlan, RecommendationError> {
    let Value::Object(meals) = &value else {
        return Err(RecommendationError::MissingFields(
            "meals must be an object".to_owned(),
        ));
    };
    let missing: Vec<&str> = REQUIRED_MEALS
        .iter()
        .map(MealSlot::as_str)
        .filter(|slot| matches!(meals.get(*slot), None | Some(Value::Null)))
        .collect();
    if !missing.is_empty() {
        return Err(RecommendationError::MissingFields(missing.join(", ")));
    }

    let mut plan: MealPlan = serde_json::from_value(value)
        .map_err(|e| RecommendationError::MalformedJson(format!("meals: {e}")))?;
    if plan.total_calories == 0 {
        plan.total_calories = plan.slot_calories();
    }
    Ok(plan)
}

fn parse_workout(value: Value) -> Option<WorkoutPlan> {
    let plan: WorkoutPlan = serde_json::from_value(value)
        .map_err(|e| debug!(error = %e, "Workout group did not match the schema"))
        .ok()?;
    plan.validate()
        .map_err(|e| debug!(error = %e, "Workout group rejected"))
        .ok()?;
    Some(plan)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::recommendations::fallback::fallback_workout_plan;

    fn meal(calories: u32) -> Value {
        json!({"menu": "dish", "calories": calories, "time": "08:00", "reasoning": "r", "portions": "p"})
    }

    #[test]
    fn test_flat_shape_with_weekly_plan() {
        let days: Vec<Value> = (0..7)
            .map(|i| json!({"day": format!("Day {i}"), "exercises": ["squats"], "duration": "20 min", "intensity": "Low", "focus": "legs"}))
            .collect();
        let text = json!({
            "breakfast": meal(400),
            "lunch": meal(600),
            "dinner": meal(500),
            "weeklyPlan": days,
            "tips": ["sleep", "hydrate"]
        })
        .to_string();

        let normalized = normalize_completion(&text, fallback_workout_plan).unwrap();
        assert!(!normalized.workout_replaced);
        assert_eq!(normalized.recommendations.meals.total_calories, 1500);
        assert_eq!(
            normalized.recommendations.workout.tips.as_deref(),
            Some("sleep hydrate")
        );
    }

    #[test]
    fn test_missing_meal_is_reported() {
        let text = json!({"meals": {"breakfast": meal(400), "dinner": meal(500)}}).to_string();
        assert_eq!(
            normalize_completion(&text, fallback_workout_plan).unwrap_err(),
            RecommendationError::MissingFields("lunch".to_owned())
        );
    }

    #[test]
    fn test_array_root_is_rejected() {
        assert!(matches!(
            normalize_completion("[1, 2]", fallback_workout_plan),
            Err(RecommendationError::MissingFields(_))
        ));
    }
}
