// ABOUTME: Progress analytics over the user's body snapshots
// ABOUTME: Date-ordered insertion, weight trend, progress toward ideal weight, and achievements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

use serde::Serialize;

use crate::models::{Goal, ProgressEntry, UserProfile};

/// Entries needed for the consistency achievement
pub const CONSISTENT_TRACKER_ENTRIES: usize = 5;
/// Entries needed for the mastery achievement
pub const PROGRESS_MASTER_ENTRIES: usize = 10;

/// Direction of the latest weight change
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeightDirection {
    /// Weight increased
    Up,
    /// Weight decreased
    Down,
    /// No change
    Stable,
}

/// Change between the two most recent entries
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct WeightTrend {
    /// Absolute change (kg)
    pub change: f64,
    /// Sign of the change
    pub direction: WeightDirection,
    /// Absolute change relative to the previous weight (%)
    pub percentage: f64,
}

/// Milestone unlocked by tracking
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Achievement {
    /// Short title
    pub title: String,
    /// What earned it
    pub description: String,
}

/// Everything the progress view shows
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// Number of stored entries
    pub entry_count: usize,
    /// Weight of the newest entry, or the profile weight when there are none
    pub current_weight: f64,
    /// Change between the two newest entries
    pub trend: Option<WeightTrend>,
    /// Progress from the profile weight toward the ideal weight (0-100)
    pub progress_to_goal: f64,
    /// Unlocked achievements
    pub achievements: Vec<Achievement>,
}

/// Insert an entry keeping the list ordered by date; same-day entries keep insertion order
pub fn insert_sorted(entries: &mut Vec<ProgressEntry>, entry: ProgressEntry) {
    let index = entries.partition_point(|existing| existing.date <= entry.date);
    entries.insert(index, entry);
}

/// Change between the two most recent entries
#[must_use]
pub fn weight_trend(entries: &[ProgressEntry]) -> Option<WeightTrend> {
    let [.., previous, latest] = entries else {
        return None;
    };
    let change = latest.weight - previous.weight;
    let direction = if change > 0.0 {
        WeightDirection::Up
    } else if change < 0.0 {
        WeightDirection::Down
    } else {
        WeightDirection::Stable
    };
    Some(WeightTrend {
        change: change.abs(),
        direction,
        percentage: (change / previous.weight * 100.0).abs(),
    })
}

/// Percentage of the way from the onboarding weight to the ideal weight, capped at 100
///
/// Returns 0 with no entries, and 100 when the onboarding weight already equals the ideal weight.
///
/// Distance is unsigned: moving away from the ideal weight counts the same as
/// moving toward it.
#[must_use]
pub fn progress_to_goal(profile: &UserProfile, entries: &[ProgressEntry]) -> f64 {
    let Some(latest) = entries.last() else {
        return 0.0;
    };
    let total_change = (profile.ideal_weight - profile.weight).abs();
    if total_change < f64::EPSILON {
        return 100.0;
    }
    let current_change = (latest.weight - profile.weight).abs();
    (current_change / total_change * 100.0).min(100.0)
}

/// Achievements unlocked by the stored entries
#[must_use]
pub fn achievements(profile: &UserProfile, entries: &[ProgressEntry]) -> Vec<Achievement> {
    let mut unlocked = Vec::new();

    if entries.len() >= CONSISTENT_TRACKER_ENTRIES {
        unlocked.push(Achievement {
            title: "Consistent Tracker".to_owned(),
            description: format!("{CONSISTENT_TRACKER_ENTRIES}+ progress entries"),
        });
    }

    if let Some(trend) = weight_trend(entries).filter(|trend| trend.change > 0.0) {
        let title = if profile.goal == Goal::WeightLoss {
            "Weight Loss Progress"
        } else {
            "Weight Gain Progress"
        };
        unlocked.push(Achievement {
            title: title.to_owned(),
            description: format!("{:.1}kg change", trend.change),
        });
    }

    if entries.len() >= PROGRESS_MASTER_ENTRIES {
        unlocked.push(Achievement {
            title: "Progress Master".to_owned(),
            description: format!("{PROGRESS_MASTER_ENTRIES}+ progress entries"),
        });
    }

    unlocked
}

/// Build the full progress view
#[must_use]
pub fn summarize_progress(profile: &UserProfile, entries: &[ProgressEntry]) -> ProgressSummary {
    ProgressSummary {
        entry_count: entries.len(),
        current_weight: entries.last().map_or(profile.weight, |entry| entry.weight),
        trend: weight_trend(entries),
        progress_to_goal: progress_to_goal(profile, entries),
        achievements: achievements(profile, entries),
    }
}
