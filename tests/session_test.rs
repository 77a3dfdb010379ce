// ABOUTME: Integration tests for the session: onboarding, route guard, logs and cached plans
// ABOUTME: Runs against in-memory and file-backed stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use nutriplan::constants::storage_keys;
use nutriplan::errors::ErrorCode;
use nutriplan::llm::LlmProvider;
use nutriplan::models::{Goal, MealSlot, PlanSource};
use nutriplan::recommendations::{fallback_meal_plan, RecommendationService};
use nutriplan::session::{ProfileUpdate, Route, Session};
use nutriplan::storage::{FileStore, KeyValueStore};
use tempfile::TempDir;

use common::{
    memory_session, nested_completion, onboarded_session, sample_input, sample_profile,
    test_config, ScriptedProvider,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

#[test]
fn test_protected_routes_redirect_until_onboarded() {
    let session = memory_session();
    assert_eq!(session.resolve_route(Route::Dashboard).unwrap(), Route::Onboarding);
    assert_eq!(session.resolve_route(Route::Landing).unwrap(), Route::Landing);
    assert_eq!(
        session.require_user().unwrap_err().code,
        ErrorCode::OnboardingRequired
    );

    session.onboard(sample_input(), Utc::now()).unwrap();
    for route in Route::ALL {
        assert_eq!(session.resolve_route(route).unwrap(), route);
    }
}

#[test]
fn test_onboarding_derives_profile_fields() {
    let session = memory_session();
    let mut input = sample_input();
    input.allergies = BTreeSet::from([" Peanuts ".to_owned(), String::new()]);

    let profile = session.onboard(input, Utc::now()).unwrap();

    assert_eq!(profile.daily_calories, 2546);
    assert!((profile.bmi - 24.22).abs() < 0.01);
    assert_eq!(profile.allergies, BTreeSet::from(["peanuts".to_owned()]));
    assert_eq!(session.current_user().unwrap(), Some(profile));
}

#[test]
fn test_onboarding_rejects_invalid_answers() {
    let session = memory_session();
    let mut input = sample_input();
    input.email = "not-an-email".to_owned();
    assert_eq!(
        session.onboard(input, Utc::now()).unwrap_err().code,
        ErrorCode::InvalidInput
    );

    let mut input = sample_input();
    input.height = 0.0;
    assert!(session.onboard(input, Utc::now()).is_err());
    assert!(session.current_user().unwrap().is_none());
}

#[test]
fn test_profile_update_recomputes_and_invalidates_cache() {
    let session = onboarded_session();
    let profile = session.require_user().unwrap();
    let fallback = RecommendationService::new(None, &test_config()).fallback(&profile);
    session.cache_recommendations(&profile, day(1), &fallback).unwrap();
    assert!(session.cached_recommendations(day(1)).unwrap().is_some());

    let updated = session
        .update_profile(ProfileUpdate {
            goal: Some(Goal::WeightLoss),
            ..ProfileUpdate::default()
        })
        .unwrap();

    assert_eq!(updated.daily_calories, 2037);
    assert!(session.cached_recommendations(day(1)).unwrap().is_none());
}

#[test]
fn test_any_profile_edit_invalidates_cached_plan() {
    let session = onboarded_session();
    let profile = session.require_user().unwrap();
    let plan = RecommendationService::new(None, &test_config()).fallback(&profile);
    session.cache_recommendations(&profile, day(1), &plan).unwrap();

    let updated = session
        .update_profile(ProfileUpdate {
            allergies: Some(BTreeSet::from(["peanut".to_owned()])),
            ..ProfileUpdate::default()
        })
        .unwrap();

    assert_eq!(updated.daily_calories, profile.daily_calories);
    assert!(session.cached_recommendations(day(1)).unwrap().is_none());
}

#[test]
fn test_reonboarding_drops_previous_users_plan() {
    let session = onboarded_session();
    let first = session.require_user().unwrap();
    let plan = RecommendationService::new(None, &test_config()).fallback(&first);
    session.cache_recommendations(&first, day(1), &plan).unwrap();

    let mut input = sample_input();
    input.weight = 110.0;
    input.goal = Goal::WeightLoss;
    let second = session.onboard(input, Utc::now()).unwrap();

    assert_ne!(second.daily_calories, first.daily_calories);
    assert!(session.cached_recommendations(day(1)).unwrap().is_none());
    let totals = session.daily_nutrition(day(1)).unwrap();
    assert_eq!(totals.planned.calories, second.daily_calories);
}

#[test]
fn test_cached_plan_for_another_profile_is_ignored() {
    let session = onboarded_session();
    let plan = RecommendationService::new(None, &test_config()).fallback(&sample_profile());

    // Written for a profile id that is not the stored user
    session.cache_recommendations(&sample_profile(), day(1), &plan).unwrap();

    assert!(session.cached_recommendations(day(1)).unwrap().is_none());
}

#[test]
fn test_toggle_consumed_is_an_involution() {
    let session = onboarded_session();
    let before = session.consumed_on(day(2)).unwrap();

    assert!(session.toggle_consumed(day(2), "meal-lunch").unwrap());
    assert!(session.consumed_on(day(2)).unwrap().contains("meal-lunch"));
    assert!(!session.toggle_consumed(day(2), "meal-lunch").unwrap());

    assert_eq!(session.consumed_on(day(2)).unwrap(), before);
    assert!(session.consumed_on(day(3)).unwrap().is_empty());
    assert!(session.toggle_consumed(day(2), "  ").is_err());
}

#[test]
fn test_custom_meals_and_daily_totals() {
    let session = onboarded_session();
    let profile = session.require_user().unwrap();

    let salmon = session.add_custom_food(day(4), MealSlot::Dinner, "4").unwrap();
    assert_eq!(salmon.calories, 380);
    assert_eq!(
        session
            .add_custom_food(day(4), MealSlot::Dinner, "999")
            .unwrap_err()
            .code,
        ErrorCode::ResourceNotFound
    );

    session.toggle_consumed(day(4), "meal-lunch").unwrap();
    session.toggle_consumed(day(4), "4").unwrap();

    let standard = fallback_meal_plan(
        &profile,
        profile.daily_calories,
        &session.nutrition_config().meal_distribution,
    );
    let totals = session.daily_nutrition(day(4)).unwrap();
    assert_eq!(totals.target_calories, 2546);
    assert_eq!(totals.planned.calories, 2546 + 380);
    assert_eq!(totals.consumed.calories, standard.lunch.calories + 380);
    assert_eq!(
        totals.calories_remaining,
        2546 - i64::from(totals.consumed.calories)
    );

    assert!(session.remove_custom_food(day(4), MealSlot::Dinner, "4").unwrap());
    assert!(!session.remove_custom_food(day(4), MealSlot::Dinner, "4").unwrap());
    assert!(session.custom_meals(day(4)).unwrap().is_empty());
}

#[tokio::test]
async fn test_only_generated_plans_are_cached() {
    let session = onboarded_session();

    let offline = RecommendationService::new(None, &test_config());
    let outcome = session.recommendations(&offline, day(5), false).await.unwrap();
    assert_eq!(outcome.source, PlanSource::Fallback);
    assert!(session.cached_recommendations(day(5)).unwrap().is_none());

    let provider = ScriptedProvider::replying(nested_completion(2546, true));
    let online = RecommendationService::new(
        Some(provider.clone() as Arc<dyn LlmProvider>),
        &test_config(),
    );
    let outcome = session.recommendations(&online, day(5), false).await.unwrap();
    assert!(outcome.is_generated());
    assert_eq!(
        session.cached_recommendations(day(5)).unwrap(),
        Some(outcome.recommendations.clone())
    );

    let again = session.recommendations(&online, day(5), false).await.unwrap();
    assert_eq!(again.recommendations, outcome.recommendations);
    assert_eq!(provider.calls(), 1);

    session.recommendations(&online, day(5), true).await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert!(session.cached_recommendations(day(6)).unwrap().is_none());
}

#[test]
fn test_file_store_persists_across_sessions() {
    let dir = TempDir::new().unwrap();
    let nutrition = test_config().nutrition;

    let first = Session::new(Box::new(FileStore::open(dir.path()).unwrap()), nutrition.clone());
    let profile = first.onboard(sample_input(), Utc::now()).unwrap();
    first.toggle_consumed(day(7), "meal-dinner").unwrap();
    drop(first);

    let store = FileStore::open(dir.path()).unwrap();
    let keys = store.keys().unwrap();
    assert!(keys.contains(&storage_keys::USER.to_owned()));
    assert!(keys.contains(&storage_keys::consumed_for("2025-03-07")));

    let second = Session::new(Box::new(store), nutrition);
    assert_eq!(second.require_user().unwrap(), profile);
    assert!(second.consumed_on(day(7)).unwrap().contains("meal-dinner"));

    second.reset().unwrap();
    assert!(second.current_user().unwrap().is_none());
    assert_eq!(second.resolve_route(Route::Meals).unwrap(), Route::Onboarding);
}
