// ABOUTME: User profile model with closed enumerations for gender, activity level and goal
// ABOUTME: Parsing rejects unknown values instead of defaulting, and body metrics self-validate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::limits;
use crate::errors::{AppError, AppResult};

/// Gender used by the BMR and ideal-weight formulas.
///
/// Both formulas are defined for two values only, so this enum is binary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male constants (+5 kcal BMR offset, 50 kg Devine base)
    Male,
    /// Female constants (-161 kcal BMR offset, 45.5 kg Devine base)
    Female,
}

impl Gender {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(AppError::invalid_input(format!(
                "Unrecognized gender '{other}' (expected male or female)"
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity level selecting the TDEE multiplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Hard daily training or physical job
    VeryActive,
}

impl ActivityLevel {
    /// Every level, ordered from least to most active
    pub const ALL: [Self; 5] = [
        Self::Sedentary,
        Self::Light,
        Self::Moderate,
        Self::Active,
        Self::VeryActive,
    ];

    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very-active",
        }
    }

    /// Human readable description used in prompts
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary (little or no exercise)",
            Self::Light => "lightly active (exercise 1-3 days per week)",
            Self::Moderate => "moderately active (exercise 3-5 days per week)",
            Self::Active => "active (hard exercise 6-7 days per week)",
            Self::VeryActive => "very active (hard daily training or a physical job)",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "Unrecognized activity level '{s}' (expected one of: sedentary, light, moderate, active, very-active)"
                ))
            })
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fitness goal selecting the calorie adjustment and macro split
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    /// Caloric deficit
    WeightLoss,
    /// Caloric surplus, general weight gain
    WeightGain,
    /// Caloric surplus with higher protein
    MuscleGain,
    /// Caloric balance
    MaintainWeight,
}

impl Goal {
    /// Every goal
    pub const ALL: [Self; 4] = [
        Self::WeightLoss,
        Self::WeightGain,
        Self::MuscleGain,
        Self::MaintainWeight,
    ];

    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WeightLoss => "weight-loss",
            Self::WeightGain => "weight-gain",
            Self::MuscleGain => "muscle-gain",
            Self::MaintainWeight => "maintain-weight",
        }
    }

    /// Human readable description used in prompts
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::WeightLoss => "lose weight",
            Self::WeightGain => "gain weight",
            Self::MuscleGain => "build muscle",
            Self::MaintainWeight => "maintain current weight",
        }
    }
}

impl FromStr for Goal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|goal| goal.as_str() == normalized)
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "Unrecognized goal '{s}' (expected one of: weight-loss, weight-gain, muscle-gain, maintain-weight)"
                ))
            })
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical inputs shared by every derivation formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Age in years
    pub age: u32,
    /// Gender for formula constants
    pub gender: Gender,
}

impl BodyMetrics {
    /// Reject measurements that cannot describe a real person
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when weight or height is non-finite, not positive,
    /// or above the accepted maximum, or when age is outside 10-120 years.
    pub fn validate(&self) -> AppResult<()> {
        if !self.weight_kg.is_finite()
            || self.weight_kg <= 0.0
            || self.weight_kg > limits::MAX_WEIGHT_KG
        {
            return Err(AppError::invalid_input(format!(
                "Weight must be between 0 and {} kg, got {}",
                limits::MAX_WEIGHT_KG,
                self.weight_kg
            )));
        }
        if !self.height_cm.is_finite()
            || self.height_cm <= 0.0
            || self.height_cm > limits::MAX_HEIGHT_CM
        {
            return Err(AppError::invalid_input(format!(
                "Height must be between 0 and {} cm, got {}",
                limits::MAX_HEIGHT_CM,
                self.height_cm
            )));
        }
        if !(limits::MIN_AGE_YEARS..=limits::MAX_AGE_YEARS).contains(&self.age) {
            return Err(AppError::invalid_input(format!(
                "Age must be between {} and {} years, got {}",
                limits::MIN_AGE_YEARS,
                limits::MAX_AGE_YEARS,
                self.age
            )));
        }
        Ok(())
    }
}

/// The single locally stored user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable identifier assigned at onboarding
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Age in years
    pub age: u32,
    /// Gender for formula constants
    pub gender: Gender,
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Fitness goal
    pub goal: Goal,
    /// Derived body mass index
    pub bmi: f64,
    /// Derived ideal weight (kg)
    pub ideal_weight: f64,
    /// Derived daily calorie target (kcal)
    pub daily_calories: u32,
    /// Dietary restrictions (vegetarian, halal, ...)
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<String>,
    /// Food allergies
    #[serde(default)]
    pub allergies: BTreeSet<String>,
    /// Onboarding completion time
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Physical inputs of this profile
    #[must_use]
    pub const fn body_metrics(&self) -> BodyMetrics {
        BodyMetrics {
            weight_kg: self.weight,
            height_cm: self.height,
            age: self.age,
            gender: self.gender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_level_rejects_unknown_values() {
        assert_eq!(
            "very_active".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::VeryActive
        );
        assert!("couch-potato".parse::<ActivityLevel>().is_err());
    }

    #[test]
    fn test_goal_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Goal::MaintainWeight).unwrap();
        assert_eq!(json, "\"maintain-weight\"");
        assert!(serde_json::from_str::<Goal>("\"bulk\"").is_err());
    }

    #[test]
    fn test_body_metrics_validation() {
        let mut metrics = BodyMetrics {
            weight_kg: 70.0,
            height_cm: 170.0,
            age: 25,
            gender: Gender::Male,
        };
        assert!(metrics.validate().is_ok());

        metrics.height_cm = 0.0;
        assert!(metrics.validate().is_err());

        metrics.height_cm = 170.0;
        metrics.weight_kg = f64::NAN;
        assert!(metrics.validate().is_err());

        metrics.weight_kg = 70.0;
        metrics.age = 9;
        assert!(metrics.validate().is_err());
    }
}
