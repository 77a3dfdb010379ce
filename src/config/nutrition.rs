// ABOUTME: Nutrition configuration for calorie and macronutrient derivation
// ABOUTME: Configures BMR coefficients, activity factors, goal adjustments, macro splits, and meal distribution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! Nutrition Derivation Configuration
//!
//! Every coefficient used by profile derivation lives here so the formulas in
//! `intelligence::profile_derivation` stay free of magic numbers.
//!
//! # Scientific References
//!
//! - BMR: Mifflin et al. (1990) DOI: 10.1093/ajcn/51.2.241
//! - Activity factors: `McArdle`, Katch & Katch (2010), Exercise Physiology

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{ActivityLevel, Goal, MealSlot};

/// Nutrition derivation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionConfig {
    /// Basal Metabolic Rate (BMR) calculation settings
    pub bmr: BmrConfig,
    /// Activity factor multipliers for TDEE calculation
    pub activity_factors: ActivityFactorsConfig,
    /// Calorie adjustment applied per goal
    pub goal_adjustments: GoalAdjustmentConfig,
    /// Macronutrient percentage split per goal
    pub macro_splits: MacroSplitConfig,
    /// Share of the daily target assigned to each meal slot
    pub meal_distribution: MealDistributionConfig,
    /// Split used to estimate macros of an eaten AI meal from its calories
    pub consumed_meal_estimate: MacroDistribution,
}

impl NutritionConfig {
    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` naming the first section that fails validation.
    pub fn validate(&self) -> AppResult<()> {
        self.bmr.validate()?;
        self.activity_factors.validate()?;
        self.goal_adjustments.validate()?;
        self.macro_splits.validate()?;
        self.meal_distribution.validate()?;
        self.consumed_meal_estimate
            .validate("consumed_meal_estimate")
    }
}

/// BMR (Basal Metabolic Rate) calculation configuration
///
/// Reference: Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
/// American Journal of Clinical Nutrition, 51(2), 241-247. DOI: 10.1093/ajcn/51.2.241
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmrConfig {
    /// Mifflin-St Jeor weight coefficient (10.0)
    pub msj_weight_coef: f64,
    /// Mifflin-St Jeor height coefficient (6.25)
    pub msj_height_coef: f64,
    /// Mifflin-St Jeor age coefficient (-5.0)
    pub msj_age_coef: f64,
    /// Mifflin-St Jeor male constant (+5)
    pub msj_male_constant: f64,
    /// Mifflin-St Jeor female constant (-161)
    pub msj_female_constant: f64,
    /// Lowest BMR ever reported (kcal/day)
    pub min_bmr_kcal: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            msj_weight_coef: 10.0,
            msj_height_coef: 6.25,
            msj_age_coef: -5.0,
            msj_male_constant: 5.0,
            msj_female_constant: -161.0,
            min_bmr_kcal: 1000.0,
        }
    }
}

impl BmrConfig {
    fn validate(&self) -> AppResult<()> {
        if self.msj_weight_coef <= 0.0 || self.msj_height_coef <= 0.0 {
            return Err(invalid(
                "bmr weight and height coefficients must be positive",
            ));
        }
        if !self.min_bmr_kcal.is_finite() || self.min_bmr_kcal < 0.0 {
            return Err(invalid(format!(
                "bmr floor must be a non-negative number, got {}",
                self.min_bmr_kcal
            )));
        }
        Ok(())
    }
}

/// Activity factor multipliers for TDEE calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFactorsConfig {
    /// Sedentary (little/no exercise): 1.2
    pub sedentary: f64,
    /// Lightly active (1-3 days/week): 1.375
    pub light: f64,
    /// Moderately active (3-5 days/week): 1.55
    pub moderate: f64,
    /// Active (6-7 days/week): 1.725
    pub active: f64,
    /// Very active (hard training or physical job): 1.9
    pub very_active: f64,
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            light: 1.375,
            moderate: 1.55,
            active: 1.725,
            very_active: 1.9,
        }
    }
}

impl ActivityFactorsConfig {
    /// Multiplier for an activity level
    #[must_use]
    pub const fn factor(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Active => self.active,
            ActivityLevel::VeryActive => self.very_active,
        }
    }

    /// Factors must start at 1.0 or above and strictly increase with activity
    fn validate(&self) -> AppResult<()> {
        let factors = ActivityLevel::ALL.map(|level| self.factor(level));
        if factors[0] < 1.0 {
            return Err(invalid(format!(
                "sedentary activity factor must be at least 1.0, got {}",
                factors[0]
            )));
        }
        if factors.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(invalid(
                "activity factors must strictly increase from sedentary to very active",
            ));
        }
        Ok(())
    }
}

/// Fractional calorie adjustment per goal (-0.20 is a 20% deficit)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalAdjustmentConfig {
    /// Weight loss deficit: -20%
    pub weight_loss: f64,
    /// Weight gain surplus: +15%
    pub weight_gain: f64,
    /// Muscle gain surplus: +10%
    pub muscle_gain: f64,
    /// Maintenance: 0%
    pub maintain_weight: f64,
}

impl Default for GoalAdjustmentConfig {
    fn default() -> Self {
        Self {
            weight_loss: -0.20,
            weight_gain: 0.15,
            muscle_gain: 0.10,
            maintain_weight: 0.0,
        }
    }
}

impl GoalAdjustmentConfig {
    /// Adjustment fraction for a goal
    #[must_use]
    pub const fn adjustment(&self, goal: Goal) -> f64 {
        match goal {
            Goal::WeightLoss => self.weight_loss,
            Goal::WeightGain => self.weight_gain,
            Goal::MuscleGain => self.muscle_gain,
            Goal::MaintainWeight => self.maintain_weight,
        }
    }

    fn validate(&self) -> AppResult<()> {
        for goal in Goal::ALL {
            let value = self.adjustment(goal);
            if !(-0.5..=0.5).contains(&value) {
                return Err(invalid(format!(
                    "{goal} calorie adjustment must be between -0.5 and 0.5, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Macro distribution (protein%, carbs%, fat%)
///
/// All percentages must sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDistribution {
    /// Protein percentage (0-100)
    pub protein_pct: u8,
    /// Carbohydrate percentage (0-100)
    pub carbs_pct: u8,
    /// Fat percentage (0-100)
    pub fat_pct: u8,
}

impl MacroDistribution {
    /// Create a new macro distribution
    #[must_use]
    pub const fn new(protein_pct: u8, carbs_pct: u8, fat_pct: u8) -> Self {
        Self {
            protein_pct,
            carbs_pct,
            fat_pct,
        }
    }

    /// Get as a tuple (protein, carbs, fat)
    #[must_use]
    pub const fn as_tuple(&self) -> (u8, u8, u8) {
        (self.protein_pct, self.carbs_pct, self.fat_pct)
    }

    /// Sum of the three percentages
    #[must_use]
    pub fn total(&self) -> u32 {
        u32::from(self.protein_pct) + u32::from(self.carbs_pct) + u32::from(self.fat_pct)
    }

    fn validate(&self, name: &str) -> AppResult<()> {
        let sum = self.total();
        if sum == 100 {
            Ok(())
        } else {
            Err(invalid(format!(
                "{name} macro percentages must sum to 100, got {sum}"
            )))
        }
    }
}

impl Default for MacroDistribution {
    fn default() -> Self {
        Self::new(25, 45, 30)
    }
}

/// Macro split per goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroSplitConfig {
    /// Weight loss: higher protein to preserve lean mass (30/40/30)
    pub weight_loss: MacroDistribution,
    /// Weight gain: carb-forward surplus (20/50/30)
    pub weight_gain: MacroDistribution,
    /// Muscle gain: protein and carbs for synthesis and training (30/45/25)
    pub muscle_gain: MacroDistribution,
    /// Maintenance: balanced (25/45/30)
    pub maintain_weight: MacroDistribution,
}

impl Default for MacroSplitConfig {
    fn default() -> Self {
        Self {
            weight_loss: MacroDistribution::new(30, 40, 30),
            weight_gain: MacroDistribution::new(20, 50, 30),
            muscle_gain: MacroDistribution::new(30, 45, 25),
            maintain_weight: MacroDistribution::new(25, 45, 30),
        }
    }
}

impl MacroSplitConfig {
    /// Split for a goal
    #[must_use]
    pub const fn for_goal(&self, goal: Goal) -> MacroDistribution {
        match goal {
            Goal::WeightLoss => self.weight_loss,
            Goal::WeightGain => self.weight_gain,
            Goal::MuscleGain => self.muscle_gain,
            Goal::MaintainWeight => self.maintain_weight,
        }
    }

    /// Validate that every goal's split sums to 100%
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` naming the first goal whose percentages do not sum to 100.
    pub fn validate(&self) -> AppResult<()> {
        for goal in Goal::ALL {
            self.for_goal(goal).validate(goal.as_str())?;
        }
        Ok(())
    }
}

/// Share of the daily calorie target per meal slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealDistributionConfig {
    /// Breakfast share: 25%
    pub breakfast: f64,
    /// Lunch share: 35%
    pub lunch: f64,
    /// Dinner share: 30%
    pub dinner: f64,
    /// Snack share: 10%
    pub snacks: f64,
}

impl Default for MealDistributionConfig {
    fn default() -> Self {
        Self {
            breakfast: 0.25,
            lunch: 0.35,
            dinner: 0.30,
            snacks: 0.10,
        }
    }
}

impl MealDistributionConfig {
    /// Share for a slot
    #[must_use]
    pub const fn share(&self, slot: MealSlot) -> f64 {
        match slot {
            MealSlot::Breakfast => self.breakfast,
            MealSlot::Lunch => self.lunch,
            MealSlot::Dinner => self.dinner,
            MealSlot::Snacks => self.snacks,
        }
    }

    fn validate(&self) -> AppResult<()> {
        for slot in MealSlot::ALL {
            let share = self.share(slot);
            if !(0.0..=1.0).contains(&share) {
                return Err(invalid(format!(
                    "{slot} share must be between 0.0 and 1.0, got {share}"
                )));
            }
        }
        let total: f64 = MealSlot::ALL.iter().map(|slot| self.share(*slot)).sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(invalid(format!(
                "meal shares must sum to 1.0, got {total}"
            )));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::new(ErrorCode::ConfigInvalid, message)
}
