// ABOUTME: Integration tests for progress tracking through the session
// ABOUTME: Date-ordered insertion, weight trend, progress toward ideal weight and achievements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::NaiveDate;
use nutriplan::errors::ErrorCode;
use nutriplan::intelligence::progress::{CONSISTENT_TRACKER_ENTRIES, PROGRESS_MASTER_ENTRIES};
use nutriplan::intelligence::WeightDirection;
use nutriplan::models::{BodyMeasurements, NewProgressEntry};

use common::onboarded_session;

fn entry(day: u32, weight: f64) -> NewProgressEntry {
    NewProgressEntry {
        date: NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
        weight,
        body_fat: None,
        measurements: BodyMeasurements::default(),
        notes: String::new(),
    }
}

#[test]
fn test_entries_are_kept_in_date_order() {
    let session = onboarded_session();
    for (day, weight) in [(10, 69.0), (5, 70.5), (7, 69.5)] {
        session.add_progress(entry(day, weight)).unwrap();
    }

    let days: Vec<u32> = session
        .progress_entries()
        .unwrap()
        .iter()
        .map(|entry| entry.date.format("%d").to_string().parse().unwrap())
        .collect();
    assert_eq!(days, vec![5, 7, 10]);
}

#[test]
fn test_summary_trend_and_goal_progress() {
    let session = onboarded_session();
    let profile = session.require_user().unwrap();
    for (day, weight) in [(10, 69.0), (5, 70.5), (7, 69.5)] {
        session.add_progress(entry(day, weight)).unwrap();
    }

    let summary = session.progress_summary().unwrap();

    assert_eq!(summary.entry_count, 3);
    assert!((summary.current_weight - 69.0).abs() < f64::EPSILON);
    let trend = summary.trend.unwrap();
    assert_eq!(trend.direction, WeightDirection::Down);
    assert!((trend.change - 0.5).abs() < 1e-9);
    assert!((trend.percentage - 0.5 / 69.5 * 100.0).abs() < 1e-9);

    let expected = 1.0 / (profile.weight - profile.ideal_weight) * 100.0;
    assert!((summary.progress_to_goal - expected).abs() < 1e-9);
    assert_eq!(summary.achievements.len(), 1);
}

#[test]
fn test_goal_progress_counts_distance_in_either_direction() {
    let session = onboarded_session();
    let profile = session.require_user().unwrap();
    assert!(profile.ideal_weight < profile.weight);

    // Gaining while the ideal weight is lower still moves the bar
    session.add_progress(entry(3, 71.0)).unwrap();

    let summary = session.progress_summary().unwrap();
    let expected = 1.0 / (profile.weight - profile.ideal_weight) * 100.0;
    assert!((summary.progress_to_goal - expected).abs() < 1e-9);
}

#[test]
fn test_empty_log_summary() {
    let session = onboarded_session();

    let summary = session.progress_summary().unwrap();

    assert_eq!(summary.entry_count, 0);
    assert!((summary.current_weight - 70.0).abs() < f64::EPSILON);
    assert!(summary.trend.is_none());
    assert!(summary.progress_to_goal.abs() < f64::EPSILON);
    assert!(summary.achievements.is_empty());
}

#[test]
fn test_tracking_milestones_unlock() {
    let session = onboarded_session();
    for day in 1..=u32::try_from(PROGRESS_MASTER_ENTRIES).unwrap() {
        session.add_progress(entry(day, 70.0)).unwrap();
    }

    let titles: Vec<String> = session
        .progress_summary()
        .unwrap()
        .achievements
        .into_iter()
        .map(|achievement| achievement.title)
        .collect();
    assert!(PROGRESS_MASTER_ENTRIES > CONSISTENT_TRACKER_ENTRIES);
    assert_eq!(titles, vec!["Consistent Tracker", "Progress Master"]);
}

#[test]
fn test_invalid_snapshots_are_rejected() {
    let session = onboarded_session();

    assert_eq!(
        session.add_progress(entry(1, 0.0)).unwrap_err().code,
        ErrorCode::InvalidInput
    );
    let mut with_fat = entry(1, 70.0);
    with_fat.body_fat = Some(90.0);
    assert!(session.add_progress(with_fat).is_err());
    let mut with_waist = entry(1, 70.0);
    with_waist.measurements.waist = Some(-3.0);
    assert!(session.add_progress(with_waist).is_err());

    assert!(session.progress_entries().unwrap().is_empty());
}
