// ABOUTME: Meal and workout plan models returned by the recommendation normalizer
// ABOUTME: Deserialization is lenient on scalar shapes so model output with "450 kcal" still parses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Number of days in a weekly workout plan
pub const DAYS_PER_WEEK: usize = 7;

/// Meal slot of a daily plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Optional between-meal snack
    Snacks,
}

impl MealSlot {
    /// Slots in display order
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snacks];

    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snacks => "snacks",
        }
    }

    /// Identifier stored in the consumption log when this slot is eaten
    #[must_use]
    pub fn consumption_id(&self) -> String {
        format!("meal-{}", self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str() == normalized || (normalized == "snack" && *slot == Self::Snacks))
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "Unrecognized meal slot '{s}' (expected breakfast, lunch, dinner or snacks)"
                ))
            })
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recommended meal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealDetail {
    /// Dish description
    pub menu: String,
    /// Energy content (kcal)
    #[serde(deserialize_with = "deserialize_calories")]
    pub calories: u32,
    /// Suggested time window, e.g. "07:00 - 08:00"
    #[serde(default, deserialize_with = "deserialize_text")]
    pub time: String,
    /// Why the meal fits the profile
    #[serde(default, deserialize_with = "deserialize_text")]
    pub reasoning: String,
    /// Portion description
    #[serde(default, deserialize_with = "deserialize_text")]
    pub portions: String,
}

/// A full day of meals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    /// Morning meal
    pub breakfast: MealDetail,
    /// Midday meal
    pub lunch: MealDetail,
    /// Evening meal
    pub dinner: MealDetail,
    /// Optional snack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snacks: Option<MealDetail>,
    /// Total energy of the plan (kcal); zero when the source omitted it
    #[serde(default, deserialize_with = "deserialize_calories")]
    pub total_calories: u32,
    /// Overall explanation of the plan
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_optional_text")]
    pub general_reasoning: Option<String>,
    /// Nutrition advice
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_optional_text")]
    pub nutrition_tips: Option<String>,
    /// Daily water target, e.g. "2.5 liters per day"
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_optional_text")]
    pub hydration_goal: Option<String>,
}

impl MealPlan {
    /// Meal in the given slot, if present
    #[must_use]
    pub const fn meal(&self, slot: MealSlot) -> Option<&MealDetail> {
        match slot {
            MealSlot::Breakfast => Some(&self.breakfast),
            MealSlot::Lunch => Some(&self.lunch),
            MealSlot::Dinner => Some(&self.dinner),
            MealSlot::Snacks => self.snacks.as_ref(),
        }
    }

    /// Present meals in display order
    pub fn meals(&self) -> impl Iterator<Item = (MealSlot, &MealDetail)> {
        MealSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.meal(slot).map(|meal| (slot, meal)))
    }

    /// Sum of the per-slot calories
    #[must_use]
    pub fn slot_calories(&self) -> u32 {
        self.meals().map(|(_, meal)| meal.calories).sum()
    }
}

/// Exercises of a day, which the completion service returns either as a list or as prose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Exercises {
    /// Individual exercise names
    List(Vec<String>),
    /// Free-text description
    Text(String),
}

impl fmt::Display for Exercises {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One day of a weekly workout plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Day label
    #[serde(deserialize_with = "deserialize_text")]
    pub day: String,
    /// Exercises to perform
    pub exercises: Exercises,
    /// Session length, e.g. "30 minutes"
    #[serde(default, deserialize_with = "deserialize_text")]
    pub duration: String,
    /// Effort level
    #[serde(default, deserialize_with = "deserialize_text")]
    pub intensity: String,
    /// Training focus or reasoning
    #[serde(default, deserialize_with = "deserialize_text")]
    pub focus: String,
}

/// Seven-day workout plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    /// Ordered days, Monday first
    pub weekly_plan: Vec<DayPlan>,
    /// Overall explanation of the program
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_optional_text")]
    pub general_reasoning: Option<String>,
    /// Training advice
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_optional_text")]
    pub tips: Option<String>,
}

impl WorkoutPlan {
    /// Check that the plan covers exactly one week
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `weeklyPlan` does not hold seven days.
    pub fn validate(&self) -> AppResult<()> {
        if self.weekly_plan.len() == DAYS_PER_WEEK {
            Ok(())
        } else {
            Err(AppError::invalid_input(format!(
                "Weekly plan must contain {DAYS_PER_WEEK} days, got {}",
                self.weekly_plan.len()
            )))
        }
    }
}

/// Meal and workout plan pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizedRecommendations {
    /// Daily meal plan
    pub meals: MealPlan,
    /// Weekly workout plan
    pub workout: WorkoutPlan,
}

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    /// Parsed from the completion service
    Generated,
    /// Static plan scaled to the profile
    Fallback,
}

/// Last successful recommendation, cached for warm start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedRecommendations {
    /// Profile the plan was generated for; entries without one never match
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Day the plan was generated for
    pub date: NaiveDate,
    /// The plan itself
    pub recommendations: PersonalizedRecommendations,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientScalar {
    Number(f64),
    Text(String),
}

fn deserialize_calories<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match LenientScalar::deserialize(deserializer)? {
        LenientScalar::Number(number) => number,
        LenientScalar::Text(text) => leading_number(&text).ok_or_else(|| {
            DeError::custom(format!("calories '{text}' is not a number"))
        })?,
    };
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(DeError::custom(format!(
            "calories {value} out of range"
        )));
    }
    // Range checked above
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(value.round() as u32)
}

/// Parse the numeric prefix of strings like "450 kcal" or "~1,200"
fn leading_number(text: &str) -> Option<f64> {
    let digits: String = text
        .trim()
        .trim_start_matches('~')
        .chars()
        .filter(|c| *c != ',')
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_text(deserializer)?.unwrap_or_default())
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(text) => text,
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" "),
        ),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calories_accept_floats_and_unit_suffix() {
        let meal: MealDetail =
            serde_json::from_str(r#"{"menu":"Oatmeal","calories":"~1,250 kcal"}"#).unwrap();
        assert_eq!(meal.calories, 1250);

        let meal: MealDetail =
            serde_json::from_str(r#"{"menu":"Oatmeal","calories":549.6}"#).unwrap();
        assert_eq!(meal.calories, 550);
        assert!(meal.time.is_empty());
    }

    #[test]
    fn test_negative_calories_rejected() {
        assert!(serde_json::from_str::<MealDetail>(r#"{"menu":"x","calories":-5}"#).is_err());
    }

    #[test]
    fn test_exercises_list_or_text() {
        let day: DayPlan = serde_json::from_str(
            r#"{"day":"Monday","exercises":["squat","plank"],"duration":30,"intensity":"moderate","focus":"legs"}"#,
        )
        .unwrap();
        assert_eq!(day.exercises.to_string(), "squat, plank");
        assert_eq!(day.duration, "30");

        let day: DayPlan =
            serde_json::from_str(r#"{"day":"Tuesday","exercises":"Yoga"}"#).unwrap();
        assert_eq!(day.exercises, Exercises::Text("Yoga".to_owned()));
    }

    #[test]
    fn test_meal_slot_consumption_id() {
        assert_eq!(MealSlot::Snacks.consumption_id(), "meal-snacks");
        assert_eq!("snack".parse::<MealSlot>().unwrap(), MealSlot::Snacks);
        assert!("brunch".parse::<MealSlot>().is_err());
    }
}
