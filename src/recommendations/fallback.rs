// ABOUTME: Static meal and workout plans scaled to the user's calorie target
// ABOUTME: Served whenever the completion service is unavailable or its output is unusable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! Fallback plans
//!
//! Meal calories come from the configured slot distribution; snacks take
//! whatever rounding left over so the four slots add up to the target exactly.

use crate::config::{MealDistributionConfig, NutritionConfig};
use crate::models::{
    DayPlan, Exercises, MealDetail, MealPlan, MealSlot, PersonalizedRecommendations, UserProfile,
    WorkoutPlan,
};

/// Water recommendation per kilogram of body weight
const HYDRATION_ML_PER_KG: f64 = 35.0;

struct MealTemplate {
    menu: &'static str,
    portions: &'static str,
    time: &'static str,
    reasoning: &'static str,
}

const fn meal_template(slot: MealSlot) -> MealTemplate {
    match slot {
        MealSlot::Breakfast => MealTemplate {
            menu: "Oatmeal with banana and almonds",
            portions: "1 medium bowl (80g oats, 1 banana, 15g almonds)",
            time: "07:00 - 08:00",
            reasoning: "Slow-release carbohydrates, fibre and some protein for steady morning energy",
        },
        MealSlot::Lunch => MealTemplate {
            menu: "Brown rice with grilled chicken and sauteed spinach",
            portions: "1 plate (100g brown rice, 120g chicken, 150g spinach)",
            time: "12:00 - 13:00",
            reasoning: "Complex carbohydrates and lean protein to carry you through the afternoon",
        },
        MealSlot::Dinner => MealTemplate {
            menu: "Baked salmon with boiled potatoes and broccoli",
            portions: "1 serving (150g salmon, 100g potatoes, 100g broccoli)",
            time: "18:00 - 19:00",
            reasoning: "Omega-3 fats and protein for overnight muscle recovery",
        },
        MealSlot::Snacks => MealTemplate {
            menu: "Greek yogurt with fresh fruit",
            portions: "1 cup (150g yogurt, 80g fruit)",
            time: "15:00 - 16:00",
            reasoning: "Protein and micronutrients to bridge lunch and dinner",
        },
    }
}

/// Per-slot calories that sum to `daily_calories`
#[must_use]
pub fn distribute_calories(
    daily_calories: u32,
    distribution: &MealDistributionConfig,
) -> [(MealSlot, u32); 4] {
    let share = |slot| (f64::from(daily_calories) * distribution.share(slot)).round() as u32;
    let breakfast = share(MealSlot::Breakfast);
    let lunch = share(MealSlot::Lunch);
    let dinner = share(MealSlot::Dinner);
    let snacks = daily_calories.saturating_sub(breakfast + lunch + dinner);
    [
        (MealSlot::Breakfast, breakfast),
        (MealSlot::Lunch, lunch),
        (MealSlot::Dinner, dinner),
        (MealSlot::Snacks, snacks),
    ]
}

fn meal_detail(slot: MealSlot, calories: u32) -> MealDetail {
    let template = meal_template(slot);
    MealDetail {
        menu: template.menu.to_owned(),
        calories,
        time: template.time.to_owned(),
        reasoning: template.reasoning.to_owned(),
        portions: template.portions.to_owned(),
    }
}

/// Balanced day of meals totalling `daily_calories`
#[must_use]
pub fn fallback_meal_plan(
    profile: &UserProfile,
    daily_calories: u32,
    distribution: &MealDistributionConfig,
) -> MealPlan {
    let [breakfast, lunch, dinner, snacks] =
        distribute_calories(daily_calories, distribution).map(|(slot, kcal)| meal_detail(slot, kcal));
    let liters = profile.weight * HYDRATION_ML_PER_KG / 1000.0;

    MealPlan {
        breakfast,
        lunch,
        dinner,
        snacks: Some(snacks),
        total_calories: daily_calories,
        general_reasoning: Some(format!(
            "A balanced spread of carbohydrates, protein and healthy fats sized to your \
             {daily_calories} kcal daily target."
        )),
        nutrition_tips: Some(
            "Fill half the plate with vegetables, pick whole grains over refined ones, \
             and keep a protein source in every meal."
                .to_owned(),
        ),
        hydration_goal: Some(format!("{liters:.1} liters of water per day")),
    }
}

/// Progressive general-fitness week, Monday first
#[must_use]
pub fn fallback_workout_plan() -> WorkoutPlan {
    let day = |day: &str, exercises: &str, duration: &str, intensity: &str, focus: &str| DayPlan {
        day: day.to_owned(),
        exercises: Exercises::Text(exercises.to_owned()),
        duration: duration.to_owned(),
        intensity: intensity.to_owned(),
        focus: focus.to_owned(),
    };

    WorkoutPlan {
        weekly_plan: vec![
            day("Monday", "Light cardio (brisk walk or jog)", "30 minutes", "Moderate", "Cardiovascular"),
            day("Tuesday", "Bodyweight strength (push-ups, squats, plank)", "25 minutes", "Moderate", "Full-body strength"),
            day("Wednesday", "Yoga or stretching", "20 minutes", "Low", "Flexibility"),
            day("Thursday", "Cardio intervals", "25 minutes", "High", "Calorie burn"),
            day("Friday", "Resistance training (dumbbells or bands)", "30 minutes", "Moderate", "Muscle building"),
            day("Saturday", "Outdoor activity (cycling or hiking)", "45 minutes", "Moderate", "Endurance"),
            day("Sunday", "Rest or gentle yoga", "15 minutes", "Low", "Recovery"),
        ],
        general_reasoning: Some(
            "The week alternates cardio, strength and mobility so stamina and strength \
             build steadily without overloading recovery."
                .to_owned(),
        ),
        tips: Some(
            "Start at a comfortable intensity and progress gradually. Always warm up and cool down."
                .to_owned(),
        ),
    }
}

/// Full fallback pair for the profile
#[must_use]
pub fn fallback_recommendations(
    profile: &UserProfile,
    daily_calories: u32,
    config: &NutritionConfig,
) -> PersonalizedRecommendations {
    PersonalizedRecommendations {
        meals: fallback_meal_plan(profile, daily_calories, &config.meal_distribution),
        workout: fallback_workout_plan(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_sums_to_target() {
        let distribution = MealDistributionConfig::default();
        for target in [1, 999, 1234, 2466, 3001] {
            let total: u32 = distribute_calories(target, &distribution)
                .iter()
                .map(|(_, kcal)| kcal)
                .sum();
            assert_eq!(total, target);
        }
    }

    #[test]
    fn test_distribution_follows_shares() {
        let slots = distribute_calories(2000, &MealDistributionConfig::default());
        assert_eq!(
            slots,
            [
                (MealSlot::Breakfast, 500),
                (MealSlot::Lunch, 700),
                (MealSlot::Dinner, 600),
                (MealSlot::Snacks, 200),
            ]
        );
    }

    #[test]
    fn test_workout_covers_a_week() {
        assert!(fallback_workout_plan().validate().is_ok());
    }
}
