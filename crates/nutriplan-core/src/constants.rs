// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Storage keys, schema version, physiological bounds, and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! Constants grouped by domain.

/// Keys used in the persisted key/value store
pub mod storage_keys {
    /// Current user profile
    pub const USER: &str = "user";
    /// Ordered list of progress entries
    pub const PROGRESS_ENTRIES: &str = "progressEntries";
    /// Last successful AI recommendations, tagged with their date
    pub const AI_RECOMMENDATIONS: &str = "aiRecommendations";
    /// Prefix of the per-date consumption log keys (`consumed-YYYY-MM-DD`)
    pub const CONSUMED_PREFIX: &str = "consumed-";

    /// Prefix of the per-date custom meal plan keys (`customMeals-YYYY-MM-DD`)
    pub const CUSTOM_MEALS_PREFIX: &str = "customMeals-";

    /// Build the consumption log key for an ISO date
    #[must_use]
    pub fn consumed_for(iso_date: &str) -> String {
        format!("{CONSUMED_PREFIX}{iso_date}")
    }

    /// Build the custom meal plan key for an ISO date
    #[must_use]
    pub fn custom_meals_for(iso_date: &str) -> String {
        format!("{CUSTOM_MEALS_PREFIX}{iso_date}")
    }
}

/// Persisted schema versioning
pub mod schema {
    /// Version written into every stored envelope
    pub const CURRENT_VERSION: u32 = 1;
}

/// Accepted ranges for body measurements and age
pub mod limits {
    /// Maximum accepted body weight (kg)
    pub const MAX_WEIGHT_KG: f64 = 300.0;
    /// Maximum accepted height (cm)
    pub const MAX_HEIGHT_CM: f64 = 300.0;
    /// Youngest age the Mifflin-St Jeor equation is validated for
    pub const MIN_AGE_YEARS: u32 = 10;
    /// Oldest accepted age
    pub const MAX_AGE_YEARS: u32 = 120;
    /// Maximum accepted body fat percentage
    pub const MAX_BODY_FAT_PERCENT: f64 = 75.0;
}

/// Unit conversion factors
pub mod units {
    /// Centimeters per inch
    pub const CM_PER_INCH: f64 = 2.54;
    /// kcal per gram of protein
    pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
    /// kcal per gram of carbohydrate
    pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
    /// kcal per gram of fat
    pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
}

/// Service names used in structured logs
pub mod service_names {
    /// Main application service name
    pub const NUTRIPLAN: &str = "nutriplan";
}
