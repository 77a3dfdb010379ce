// ABOUTME: Body progress snapshots appended by the user over time
// ABOUTME: Entries carry weight, optional body fat and circumference measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::limits;
use crate::errors::{AppError, AppResult};

/// Optional body circumferences (cm)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurements {
    /// Chest circumference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    /// Waist circumference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    /// Hip circumference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hips: Option<f64>,
    /// Upper arm circumference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arms: Option<f64>,
    /// Thigh circumference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thighs: Option<f64>,
}

impl BodyMeasurements {
    fn named(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("chest", self.chest),
            ("waist", self.waist),
            ("hips", self.hips),
            ("arms", self.arms),
            ("thighs", self.thighs),
        ]
    }
}

/// A dated body snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    /// Entry identifier
    pub id: Uuid,
    /// Measurement day
    pub date: NaiveDate,
    /// Body weight (kg)
    pub weight: f64,
    /// Body fat percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    /// Circumferences
    #[serde(default)]
    pub measurements: BodyMeasurements,
    /// Free-text note
    #[serde(default)]
    pub notes: String,
}

/// User input for a new progress entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgressEntry {
    /// Measurement day
    pub date: NaiveDate,
    /// Body weight (kg)
    pub weight: f64,
    /// Body fat percentage
    #[serde(default)]
    pub body_fat: Option<f64>,
    /// Circumferences
    #[serde(default)]
    pub measurements: BodyMeasurements,
    /// Free-text note
    #[serde(default)]
    pub notes: String,
}

impl NewProgressEntry {
    /// Validate the snapshot
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-positive or implausible weight, a body
    /// fat percentage outside 0-75, or a non-positive measurement.
    pub fn validate(&self) -> AppResult<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 || self.weight > limits::MAX_WEIGHT_KG {
            return Err(AppError::invalid_input(format!(
                "Weight must be between 0 and {} kg, got {}",
                limits::MAX_WEIGHT_KG,
                self.weight
            )));
        }
        if let Some(body_fat) = self.body_fat {
            if !body_fat.is_finite() || !(0.0..=limits::MAX_BODY_FAT_PERCENT).contains(&body_fat) {
                return Err(AppError::invalid_input(format!(
                    "Body fat must be between 0 and {}%, got {body_fat}",
                    limits::MAX_BODY_FAT_PERCENT
                )));
            }
        }
        for (name, value) in self.measurements.named() {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(AppError::invalid_input(format!(
                        "Measurement '{name}' must be positive, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Assign an identifier, producing the stored entry
    #[must_use]
    pub fn into_entry(self) -> ProgressEntry {
        ProgressEntry {
            id: Uuid::new_v4(),
            date: self.date,
            weight: self.weight,
            body_fat: self.body_fat,
            measurements: self.measurements,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(weight: f64) -> NewProgressEntry {
        NewProgressEntry {
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            weight,
            body_fat: None,
            measurements: BodyMeasurements::default(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_rejects_bad_weight_and_body_fat() {
        assert!(entry(72.5).validate().is_ok());
        assert!(entry(0.0).validate().is_err());

        let mut input = entry(72.5);
        input.body_fat = Some(80.0);
        assert!(input.validate().is_err());

        let mut input = entry(72.5);
        input.measurements.waist = Some(-1.0);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut input = entry(70.0);
        input.body_fat = Some(18.0);
        let json = serde_json::to_value(input.into_entry()).unwrap();
        assert_eq!(json["bodyFat"], 18.0);
        assert_eq!(json["date"], "2025-01-15");
    }
}
