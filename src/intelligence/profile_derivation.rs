// ABOUTME: Profile derivation formulas: BMI and its band, Devine ideal weight, Mifflin-St Jeor BMR
// ABOUTME: Daily calorie target from activity and goal, and whole-gram macronutrient targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! Profile Derivation Module
//!
//! Pure, deterministic health metrics computed from a user's physical inputs.
//! Every coefficient comes from [`NutritionConfig`].
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>
//!
//! - Devine, B.J. (1974). Gentamicin therapy. *Drug Intelligence & Clinical Pharmacy*, 8, 650-655.
//!
//! - WHO (2000). Obesity: preventing and managing the global epidemic. BMI cut-off points.
//!
//! # Gender
//!
//! Both Mifflin-St Jeor and Devine publish constants for two sexes only, so
//! [`Gender`] is binary and every formula branches on exactly those values.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ActivityFactorsConfig, BmrConfig, MacroSplitConfig, NutritionConfig};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{ActivityLevel, BodyMetrics, Gender, Goal};
use nutriplan_core::constants::units;

/// Lower bound of the normal BMI band
pub const BMI_NORMAL_MIN: f64 = 18.5;
/// Lower bound of the overweight BMI band
pub const BMI_OVERWEIGHT_MIN: f64 = 25.0;
/// Lower bound of the obese BMI band
pub const BMI_OBESE_MIN: f64 = 30.0;

/// Devine reference height (inches)
const DEVINE_BASE_INCHES: f64 = 60.0;
/// Devine kilograms per inch above the reference height
const DEVINE_KG_PER_INCH: f64 = 2.3;
/// Devine base weight for men (kg)
const DEVINE_MALE_BASE_KG: f64 = 50.0;
/// Devine base weight for women (kg)
const DEVINE_FEMALE_BASE_KG: f64 = 45.5;

/// BMI band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    /// BMI below 18.5
    Underweight,
    /// 18.5 to below 25
    Normal,
    /// 25 to below 30
    Overweight,
    /// 30 and above
    Obese,
}

/// How far a BMI band is from the healthy range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BmiSeverity {
    /// Inside the healthy range
    Healthy,
    /// Outside the range, worth attention
    Caution,
    /// Associated with elevated health risk
    Risk,
}

/// Result of [`classify_bmi`]
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct BmiClassification {
    /// Band
    pub category: BmiCategory,
    /// Distance from the healthy range
    pub severity: BmiSeverity,
    /// Display label
    pub label: &'static str,
}

/// Daily macronutrient targets in whole grams
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroTargets {
    /// Protein (g)
    pub protein_grams: u32,
    /// Carbohydrates (g)
    pub carb_grams: u32,
    /// Fat (g)
    pub fat_grams: u32,
}

impl MacroTargets {
    /// Energy represented by these grams at 4/4/9 kcal per gram
    #[must_use]
    pub fn calories(&self) -> u32 {
        self.protein_grams * units::KCAL_PER_GRAM_PROTEIN as u32
            + self.carb_grams * units::KCAL_PER_GRAM_CARBS as u32
            + self.fat_grams * units::KCAL_PER_GRAM_FAT as u32
    }
}

/// Every derived field of a profile, computed in one validated pass
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DerivedMetrics {
    /// Body mass index
    pub bmi: f64,
    /// BMI band
    pub bmi_class: BmiClassification,
    /// Devine ideal weight (kg)
    pub ideal_weight: f64,
    /// Basal metabolic rate (kcal/day)
    pub bmr: f64,
    /// Total daily energy expenditure before goal adjustment (kcal/day)
    pub tdee: f64,
    /// Goal-adjusted daily target (kcal)
    pub daily_calories: u32,
    /// Macronutrient targets for the daily target
    pub macros: MacroTargets,
}

/// Calculate Body Mass Index
///
/// Formula: `weight_kg / height_m²`. No rounding is applied.
///
/// # Errors
///
/// Returns `InvalidInput` if weight or height is not a positive finite number.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> AppResult<f64> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "Weight must be a positive number, got {weight_kg}"
        )));
    }
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "Height must be a positive number, got {height_cm}"
        )));
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// Map a BMI to its band; each band includes its lower bound
#[must_use]
pub fn classify_bmi(bmi: f64) -> BmiClassification {
    let (category, severity, label) = if bmi < BMI_NORMAL_MIN {
        (BmiCategory::Underweight, BmiSeverity::Caution, "Underweight")
    } else if bmi < BMI_OVERWEIGHT_MIN {
        (BmiCategory::Normal, BmiSeverity::Healthy, "Normal weight")
    } else if bmi < BMI_OBESE_MIN {
        (BmiCategory::Overweight, BmiSeverity::Caution, "Overweight")
    } else {
        (BmiCategory::Obese, BmiSeverity::Risk, "Obese")
    };
    BmiClassification {
        category,
        severity,
        label,
    }
}

/// Calculate ideal body weight using the Devine formula
///
/// - Male: `50 + 2.3 × (height_in − 60)`
/// - Female: `45.5 + 2.3 × (height_in − 60)`
///
/// # Errors
///
/// Returns `InvalidInput` if height is not a positive finite number, or if the
/// height is so short that the formula yields a non-positive weight.
pub fn compute_ideal_weight(height_cm: f64, gender: Gender) -> AppResult<f64> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "Height must be a positive number, got {height_cm}"
        )));
    }
    let base = match gender {
        Gender::Male => DEVINE_MALE_BASE_KG,
        Gender::Female => DEVINE_FEMALE_BASE_KG,
    };
    let inches = height_cm / units::CM_PER_INCH;
    let ideal = DEVINE_KG_PER_INCH.mul_add(inches - DEVINE_BASE_INCHES, base);
    if ideal <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "Height {height_cm} cm is outside the range of the ideal weight formula"
        )));
    }
    Ok(ideal)
}

/// Calculate Basal Metabolic Rate using the Mifflin-St Jeor equation
///
/// Formula: `10 × weight + 6.25 × height − 5 × age + s`, where `s` is +5 for
/// men and −161 for women. The result is floored at `config.min_bmr_kcal`.
///
/// # Errors
///
/// Returns `InvalidInput` if weight or height is outside (0, 300] or age is outside 10-120.
pub fn compute_bmr(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    config: &BmrConfig,
) -> AppResult<f64> {
    BodyMetrics {
        weight_kg,
        height_cm,
        age,
        gender,
    }
    .validate()?;

    let weight_component = config.msj_weight_coef * weight_kg;
    let height_component = config.msj_height_coef * height_cm;
    let age_component = config.msj_age_coef * f64::from(age);

    let gender_constant = match gender {
        Gender::Male => config.msj_male_constant,
        Gender::Female => config.msj_female_constant,
    };

    let bmr = weight_component + height_component + age_component + gender_constant;
    Ok(bmr.max(config.min_bmr_kcal))
}

/// Total Daily Energy Expenditure: BMR × activity multiplier
#[must_use]
pub fn compute_tdee(bmr: f64, activity_level: ActivityLevel, config: &ActivityFactorsConfig) -> f64 {
    bmr * config.factor(activity_level)
}

/// Calculate the goal-adjusted daily calorie target
///
/// `round(BMR × activity multiplier × (1 + goal adjustment))`
///
/// Activity level and goal are closed enums; callers holding strings parse
/// them with `FromStr`, which rejects unrecognized values.
///
/// # Errors
///
/// Returns `InvalidInput` if the physical inputs are invalid or the adjusted
/// target is not positive.
pub fn compute_daily_calories(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    activity_level: ActivityLevel,
    goal: Goal,
    config: &NutritionConfig,
) -> AppResult<u32> {
    let bmr = compute_bmr(weight_kg, height_cm, age, gender, &config.bmr)?;
    let tdee = compute_tdee(bmr, activity_level, &config.activity_factors);
    adjusted_target(tdee, goal, config)
}

fn adjusted_target(tdee: f64, goal: Goal, config: &NutritionConfig) -> AppResult<u32> {
    let target = (tdee * (1.0 + config.goal_adjustments.adjustment(goal))).round();
    if !target.is_finite() || target < 1.0 || target > f64::from(u32::MAX) {
        return Err(AppError::invalid_input(format!(
            "Daily calorie target must be positive, got {target}"
        )));
    }
    Ok(target as u32)
}

/// Split a daily calorie budget into whole-gram macronutrient targets
///
/// Fat and protein grams are rounded from their percentage share; carbohydrate
/// grams take the remaining energy. The 4/4/9 kcal reconstruction is within
/// ±2 kcal of `daily_calories`.
///
/// # Errors
///
/// Returns `ConfigInvalid` if the goal's percentages do not sum to 100.
pub fn compute_macro_targets(
    daily_calories: u32,
    goal: Goal,
    config: &MacroSplitConfig,
) -> AppResult<MacroTargets> {
    let split = config.for_goal(goal);
    if split.total() != 100 {
        return Err(AppError::new(
            ErrorCode::ConfigInvalid,
            format!(
                "{goal} macro percentages must sum to 100, got {}",
                split.total()
            ),
        ));
    }

    let calories = f64::from(daily_calories);
    let fat_grams = (calories * f64::from(split.fat_pct) / 100.0 / units::KCAL_PER_GRAM_FAT).round();
    let protein_grams =
        (calories * f64::from(split.protein_pct) / 100.0 / units::KCAL_PER_GRAM_PROTEIN).round();
    let remaining = fat_grams.mul_add(
        -units::KCAL_PER_GRAM_FAT,
        protein_grams.mul_add(-units::KCAL_PER_GRAM_PROTEIN, calories),
    );
    let carb_grams = (remaining / units::KCAL_PER_GRAM_CARBS).round().max(0.0);

    Ok(MacroTargets {
        protein_grams: protein_grams as u32,
        carb_grams: carb_grams as u32,
        fat_grams: fat_grams as u32,
    })
}

/// Validate the inputs once and compute every derived field
///
/// # Errors
///
/// Returns `InvalidInput` for invalid physical inputs and `ConfigInvalid` for
/// an invalid macro split.
pub fn derive_metrics(
    metrics: &BodyMetrics,
    activity_level: ActivityLevel,
    goal: Goal,
    config: &NutritionConfig,
) -> AppResult<DerivedMetrics> {
    metrics.validate()?;

    let bmi = compute_bmi(metrics.weight_kg, metrics.height_cm)?;
    let ideal_weight = compute_ideal_weight(metrics.height_cm, metrics.gender)?;
    let bmr = compute_bmr(
        metrics.weight_kg,
        metrics.height_cm,
        metrics.age,
        metrics.gender,
        &config.bmr,
    )?;
    let tdee = compute_tdee(bmr, activity_level, &config.activity_factors);
    let daily_calories = adjusted_target(tdee, goal, config)?;
    let macros = compute_macro_targets(daily_calories, goal, &config.macro_splits)?;

    debug!(
        bmi,
        bmr,
        tdee,
        daily_calories,
        activity = %activity_level,
        goal = %goal,
        "Derived profile metrics"
    );

    Ok(DerivedMetrics {
        bmi,
        bmi_class: classify_bmi(bmi),
        ideal_weight,
        bmr,
        tdee,
        daily_calories,
        macros,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_known_value() {
        let bmi = compute_bmi(70.0, 175.0).unwrap();
        assert!((bmi - 22.857).abs() < 0.001);
    }

    #[test]
    fn test_bmi_rejects_zero_height() {
        let error = compute_bmi(70.0, 0.0).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_devine_male_at_six_feet() {
        // 182.88 cm is exactly 72 inches
        let ideal = compute_ideal_weight(182.88, Gender::Male).unwrap();
        assert!((ideal - 77.6).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_floor_applies() {
        let config = BmrConfig::default();
        let bmr = compute_bmr(20.0, 100.0, 80, Gender::Female, &config).unwrap();
        assert!((bmr - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_macro_targets_cover_budget() {
        let macros =
            compute_macro_targets(2546, Goal::MaintainWeight, &MacroSplitConfig::default())
                .unwrap();
        assert_eq!(macros.fat_grams, 82);
        assert_eq!(macros.protein_grams, 154);
        assert!(macros.calories().abs_diff(2546) <= 3);
    }
}
