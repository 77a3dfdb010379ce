// ABOUTME: Explicit session context over the key/value store replacing a global current user
// ABOUTME: Onboarding, profile updates, consumption log, custom meals, progress, cached plans, routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # Session
//!
//! A [`Session`] owns the store handle and the nutrition settings and is
//! passed to every operation that needs the current user. Nothing in the
//! crate reads the store behind its back.
//!
//! Stored keys:
//!
//! | key                      | value                         |
//! |--------------------------|-------------------------------|
//! | `user`                   | [`UserProfile`]               |
//! | `consumed-<date>`        | set of consumed ids           |
//! | `customMeals-<date>`     | [`CustomMealPlan`]            |
//! | `progressEntries`        | date-ordered [`ProgressEntry`] list |
//! | `aiRecommendations`      | [`CachedRecommendations`]     |

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::NutritionConfig;
use crate::errors::{AppError, AppResult};
use crate::intelligence::progress::insert_sorted;
use crate::intelligence::{
    build_dashboard, derive_metrics, summarize_day, summarize_progress, DailyNutrition,
    DashboardSummary, DerivedMetrics, FoodCatalog, ProgressSummary,
};
use crate::models::{
    ActivityLevel, BodyMetrics, CachedRecommendations, CustomMealPlan, FoodItem, Gender, Goal,
    MealSlot, NewProgressEntry, PersonalizedRecommendations, PlanSource, ProgressEntry,
    UserProfile,
};
use crate::recommendations::{fallback_meal_plan, RecommendationOutcome, RecommendationService};
use crate::storage::{KeyValueStore, KeyValueStoreExt};
use nutriplan_core::constants::storage_keys;

/// Screens of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    /// Public landing page
    Landing,
    /// Onboarding questionnaire
    Onboarding,
    /// Daily summary
    Dashboard,
    /// Meal plan and custom meals
    Meals,
    /// Weekly workout plan
    Workouts,
    /// Food catalog and food questions
    FoodSearch,
    /// Body progress tracking
    Progress,
    /// Profile view and edit
    Profile,
}

impl Route {
    /// Every route
    pub const ALL: [Self; 8] = [
        Self::Landing,
        Self::Onboarding,
        Self::Dashboard,
        Self::Meals,
        Self::Workouts,
        Self::FoodSearch,
        Self::Progress,
        Self::Profile,
    ];

    /// Whether the route needs a stored profile
    #[must_use]
    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Landing | Self::Onboarding)
    }

    /// URL-style path
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Onboarding => "/onboarding",
            Self::Dashboard => "/dashboard",
            Self::Meals => "/meals",
            Self::Workouts => "/exercises",
            Self::FoodSearch => "/food-search",
            Self::Progress => "/progress",
            Self::Profile => "/profile",
        }
    }

    /// Route for a path; unknown paths land on the landing page
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let normalized = path.trim().trim_end_matches('/');
        let normalized = if normalized.is_empty() { "/" } else { normalized };
        Self::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .unwrap_or(Self::Landing)
    }
}

impl FromStr for Route {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('/');
        match name {
            "" | "landing" => Ok(Self::Landing),
            "onboarding" => Ok(Self::Onboarding),
            "dashboard" => Ok(Self::Dashboard),
            "meals" | "meal-plan" => Ok(Self::Meals),
            "exercises" | "workouts" | "workout-plan" => Ok(Self::Workouts),
            "food-search" | "search" => Ok(Self::FoodSearch),
            "progress" => Ok(Self::Progress),
            "profile" => Ok(Self::Profile),
            _ => Err(AppError::invalid_input(format!("Unknown route '{s}'"))),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Answers to the onboarding questionnaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingInput {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Age in years
    pub age: u32,
    /// Gender for formula constants
    pub gender: Gender,
    /// Height (cm)
    pub height: f64,
    /// Weight (kg)
    pub weight: f64,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Fitness goal
    pub goal: Goal,
    /// Dietary restrictions
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<String>,
    /// Food allergies
    #[serde(default)]
    pub allergies: BTreeSet<String>,
}

/// Fields to change on the stored profile; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New age
    pub age: Option<u32>,
    /// New gender
    pub gender: Option<Gender>,
    /// New height (cm)
    pub height: Option<f64>,
    /// New weight (kg)
    pub weight: Option<f64>,
    /// New activity level
    pub activity_level: Option<ActivityLevel>,
    /// New goal
    pub goal: Option<Goal>,
    /// Replacement set of dietary restrictions
    pub dietary_restrictions: Option<BTreeSet<String>>,
    /// Replacement set of allergies
    pub allergies: Option<BTreeSet<String>>,
}

fn validate_identity(name: &str, email: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::invalid_input("Name must not be empty"));
    }
    let valid_email = email
        .trim()
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(AppError::invalid_input(format!("Invalid email address '{email}'")));
    }
    Ok(())
}

fn clean_set(items: BTreeSet<String>) -> BTreeSet<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Everything one user does against one store
pub struct Session {
    store: Box<dyn KeyValueStore>,
    nutrition: NutritionConfig,
    catalog: FoodCatalog,
}

impl Session {
    /// Session over a store with the built-in food catalog
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>, nutrition: NutritionConfig) -> Self {
        Self {
            store,
            nutrition,
            catalog: FoodCatalog::builtin(),
        }
    }

    /// Replace the food catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: FoodCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Food catalog used for custom meals
    #[must_use]
    pub const fn catalog(&self) -> &FoodCatalog {
        &self.catalog
    }

    /// Nutrition settings
    #[must_use]
    pub const fn nutrition_config(&self) -> &NutritionConfig {
        &self.nutrition
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    /// Stored profile, if onboarding happened
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn current_user(&self) -> AppResult<Option<UserProfile>> {
        self.store.get_json(storage_keys::USER)
    }

    /// Stored profile, or `OnboardingRequired`
    ///
    /// # Errors
    ///
    /// Returns `OnboardingRequired` when no profile is stored.
    pub fn require_user(&self) -> AppResult<UserProfile> {
        self.current_user()?.ok_or_else(AppError::onboarding_required)
    }

    /// Route actually shown: protected routes without a profile go to onboarding
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn resolve_route(&self, requested: Route) -> AppResult<Route> {
        if requested.is_protected() && self.current_user()?.is_none() {
            debug!(requested = %requested, "No profile stored; redirecting to onboarding");
            return Ok(Route::Onboarding);
        }
        Ok(requested)
    }

    /// Create the profile from questionnaire answers, replacing any existing one
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for invalid answers.
    #[instrument(skip(self, input))]
    pub fn onboard(&self, input: OnboardingInput, now: DateTime<Utc>) -> AppResult<UserProfile> {
        validate_identity(&input.name, &input.email)?;
        let metrics = BodyMetrics {
            weight_kg: input.weight,
            height_cm: input.height,
            age: input.age,
            gender: input.gender,
        };
        let derived = derive_metrics(&metrics, input.activity_level, input.goal, &self.nutrition)?;

        let profile = UserProfile {
            id: Uuid::new_v4(),
            name: input.name.trim().to_owned(),
            email: input.email.trim().to_owned(),
            age: input.age,
            gender: input.gender,
            height: input.height,
            weight: input.weight,
            activity_level: input.activity_level,
            goal: input.goal,
            bmi: derived.bmi,
            ideal_weight: derived.ideal_weight,
            daily_calories: derived.daily_calories,
            dietary_restrictions: clean_set(input.dietary_restrictions),
            allergies: clean_set(input.allergies),
            created_at: now,
        };

        if self.current_user()?.is_some() {
            info!("Replacing existing profile");
        }
        self.store.set_json(storage_keys::USER, &profile)?;
        // Plans belong to the replaced profile
        self.invalidate_recommendations()?;
        info!(user_id = %profile.id, daily_calories = profile.daily_calories, "Onboarding complete");
        Ok(profile)
    }

    /// Apply an explicit profile edit and recompute the derived fields
    ///
    /// # Errors
    ///
    /// Returns `OnboardingRequired` without a profile and `InvalidInput` for
    /// invalid values; the stored profile is unchanged on error.
    #[instrument(skip(self, update))]
    pub fn update_profile(&self, update: ProfileUpdate) -> AppResult<UserProfile> {
        let mut profile = self.require_user()?;

        if let Some(name) = update.name {
            profile.name = name.trim().to_owned();
        }
        if let Some(email) = update.email {
            profile.email = email.trim().to_owned();
        }
        validate_identity(&profile.name, &profile.email)?;

        profile.age = update.age.unwrap_or(profile.age);
        profile.gender = update.gender.unwrap_or(profile.gender);
        profile.height = update.height.unwrap_or(profile.height);
        profile.weight = update.weight.unwrap_or(profile.weight);
        profile.activity_level = update.activity_level.unwrap_or(profile.activity_level);
        profile.goal = update.goal.unwrap_or(profile.goal);
        if let Some(restrictions) = update.dietary_restrictions {
            profile.dietary_restrictions = clean_set(restrictions);
        }
        if let Some(allergies) = update.allergies {
            profile.allergies = clean_set(allergies);
        }

        let derived = derive_metrics(
            &profile.body_metrics(),
            profile.activity_level,
            profile.goal,
            &self.nutrition,
        )?;
        profile.bmi = derived.bmi;
        profile.ideal_weight = derived.ideal_weight;
        profile.daily_calories = derived.daily_calories;

        self.store.set_json(storage_keys::USER, &profile)?;
        // Every profile field feeds the prompt or the calorie target
        self.invalidate_recommendations()?;
        info!(user_id = %profile.id, daily_calories = profile.daily_calories, "Profile updated");
        Ok(profile)
    }

    /// Full derivation for the stored profile
    ///
    /// # Errors
    ///
    /// Returns `OnboardingRequired` without a profile.
    pub fn derived_metrics(&self) -> AppResult<DerivedMetrics> {
        let profile = self.require_user()?;
        derive_metrics(
            &profile.body_metrics(),
            profile.activity_level,
            profile.goal,
            &self.nutrition,
        )
    }

    // ------------------------------------------------------------------
    // Consumption log
    // ------------------------------------------------------------------

    /// Ids marked eaten on `date`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn consumed_on(&self, date: NaiveDate) -> AppResult<BTreeSet<String>> {
        Ok(self
            .store
            .get_json(&storage_keys::consumed_for(&date.to_string()))?
            .unwrap_or_default())
    }

    /// Flip the eaten state of `id` on `date`; returns the new state
    ///
    /// Toggling the same id twice restores the original log.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank id.
    pub fn toggle_consumed(&self, date: NaiveDate, id: &str) -> AppResult<bool> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::invalid_input("Consumption id must not be empty"));
        }
        let mut consumed = self.consumed_on(date)?;
        let now_consumed = if consumed.remove(id) {
            false
        } else {
            consumed.insert(id.to_owned());
            true
        };
        self.store
            .set_json(&storage_keys::consumed_for(&date.to_string()), &consumed)?;
        debug!(%date, id, now_consumed, "Toggled consumption");
        Ok(now_consumed)
    }

    // ------------------------------------------------------------------
    // Custom meals
    // ------------------------------------------------------------------

    /// Custom meal plan for `date`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn custom_meals(&self, date: NaiveDate) -> AppResult<CustomMealPlan> {
        Ok(self
            .store
            .get_json(&storage_keys::custom_meals_for(&date.to_string()))?
            .unwrap_or_default())
    }

    /// Add a catalog food to a slot of the custom plan
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the food id is not in the catalog.
    pub fn add_custom_food(
        &self,
        date: NaiveDate,
        slot: MealSlot,
        food_id: &str,
    ) -> AppResult<FoodItem> {
        let food = self
            .catalog
            .get(food_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Food '{food_id}'")))?;
        let mut plan = self.custom_meals(date)?;
        plan.add(slot, food.clone());
        self.store
            .set_json(&storage_keys::custom_meals_for(&date.to_string()), &plan)?;
        Ok(food)
    }

    /// Remove a food from a slot of the custom plan; returns whether it was there
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub fn remove_custom_food(
        &self,
        date: NaiveDate,
        slot: MealSlot,
        food_id: &str,
    ) -> AppResult<bool> {
        let mut plan = self.custom_meals(date)?;
        let removed = plan.remove(slot, food_id);
        if removed {
            self.store
                .set_json(&storage_keys::custom_meals_for(&date.to_string()), &plan)?;
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------

    /// Stored progress entries, oldest first
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn progress_entries(&self) -> AppResult<Vec<ProgressEntry>> {
        Ok(self
            .store
            .get_json(storage_keys::PROGRESS_ENTRIES)?
            .unwrap_or_default())
    }

    /// Append a snapshot, keeping the list ordered by date
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an invalid snapshot.
    pub fn add_progress(&self, entry: NewProgressEntry) -> AppResult<ProgressEntry> {
        entry.validate()?;
        let entry = entry.into_entry();
        let mut entries = self.progress_entries()?;
        insert_sorted(&mut entries, entry.clone());
        self.store.set_json(storage_keys::PROGRESS_ENTRIES, &entries)?;
        info!(entry_id = %entry.id, date = %entry.date, "Progress entry recorded");
        Ok(entry)
    }

    /// Trend, goal progress and achievements
    ///
    /// # Errors
    ///
    /// Returns `OnboardingRequired` without a profile.
    pub fn progress_summary(&self) -> AppResult<ProgressSummary> {
        let profile = self.require_user()?;
        Ok(summarize_progress(&profile, &self.progress_entries()?))
    }

    // ------------------------------------------------------------------
    // Recommendations
    // ------------------------------------------------------------------

    /// Cached plan, if one was generated for the current profile on `date`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn cached_recommendations(
        &self,
        date: NaiveDate,
    ) -> AppResult<Option<PersonalizedRecommendations>> {
        let Some(profile) = self.current_user()? else {
            return Ok(None);
        };
        let cached: Option<CachedRecommendations> =
            self.store.get_json(storage_keys::AI_RECOMMENDATIONS)?;
        Ok(cached
            .filter(|cached| cached.date == date && cached.user_id == Some(profile.id))
            .map(|cached| cached.recommendations))
    }

    /// Remember a plan generated for `profile` on `date`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub fn cache_recommendations(
        &self,
        profile: &UserProfile,
        date: NaiveDate,
        recommendations: &PersonalizedRecommendations,
    ) -> AppResult<()> {
        self.store.set_json(
            storage_keys::AI_RECOMMENDATIONS,
            &CachedRecommendations {
                user_id: Some(profile.id),
                date,
                recommendations: recommendations.clone(),
            },
        )
    }

    fn invalidate_recommendations(&self) -> AppResult<()> {
        if self.store.remove(storage_keys::AI_RECOMMENDATIONS)? {
            debug!("Cached recommendations invalidated");
        }
        Ok(())
    }

    /// Plan for `date`: the cached one unless `refresh`, otherwise a new one
    ///
    /// Generated plans are cached; fallback plans are not, so the next call
    /// tries the service again.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingRequired` without a profile.
    pub async fn recommendations(
        &self,
        service: &RecommendationService,
        date: NaiveDate,
        refresh: bool,
    ) -> AppResult<RecommendationOutcome> {
        let profile = self.require_user()?;
        if !refresh {
            if let Some(recommendations) = self.cached_recommendations(date)? {
                debug!(%date, "Serving cached recommendations");
                return Ok(RecommendationOutcome {
                    recommendations,
                    source: PlanSource::Generated,
                    notice: None,
                    failure: None,
                });
            }
        }

        let outcome = service.get_recommendations(&profile).await;
        if outcome.is_generated() {
            self.cache_recommendations(&profile, date, &outcome.recommendations)?;
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Daily nutrition
    // ------------------------------------------------------------------

    /// Planned and consumed totals for `date`
    ///
    /// Uses the cached AI meal plan for the day, or the standard plan when
    /// none was generated.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingRequired` without a profile.
    pub fn daily_nutrition(&self, date: NaiveDate) -> AppResult<DailyNutrition> {
        let profile = self.require_user()?;
        let meal_plan = self.cached_recommendations(date)?.map_or_else(
            || fallback_meal_plan(&profile, profile.daily_calories, &self.nutrition.meal_distribution),
            |recommendations| recommendations.meals,
        );
        summarize_day(
            date,
            &profile,
            Some(&meal_plan),
            &self.custom_meals(date)?,
            &self.consumed_on(date)?,
            &self.nutrition,
        )
    }

    /// Dashboard for `date`
    ///
    /// # Errors
    ///
    /// Returns `OnboardingRequired` without a profile.
    pub fn dashboard(&self, date: NaiveDate) -> AppResult<DashboardSummary> {
        let profile = self.require_user()?;
        Ok(build_dashboard(&profile, self.daily_nutrition(date)?))
    }

    /// Delete every stored value, returning to the onboarding state
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be cleared.
    pub fn reset(&self) -> AppResult<()> {
        self.store.clear()?;
        info!("All stored data removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::from_path("/nope"), Route::Landing);
        assert_eq!(Route::from_path("/meals/"), Route::Meals);
        assert_eq!("workout-plan".parse::<Route>().unwrap(), Route::Workouts);
    }

    #[test]
    fn test_identity_validation() {
        assert!(validate_identity("Ana", "ana@example.com").is_ok());
        assert!(validate_identity(" ", "ana@example.com").is_err());
        assert!(validate_identity("Ana", "ana.example.com").is_err());
        assert!(validate_identity("Ana", "@example.com").is_err());
    }
}
