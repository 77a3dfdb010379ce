// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors
// ABOUTME: Progress commands: record body snapshots, list them and summarize the trend
// ABOUTME: Entries are kept in date order regardless of the order they are recorded in

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use nutriplan::intelligence::{ProgressSummary, WeightDirection};
use nutriplan::models::{BodyMeasurements, NewProgressEntry, ProgressEntry};
use nutriplan::session::Session;

use crate::helpers::display::Output;

/// One body snapshot
#[derive(Args)]
pub struct AddArgs {
    /// Body weight in kg
    #[arg(long)]
    weight: f64,

    /// Measurement day (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Body fat percentage
    #[arg(long)]
    body_fat: Option<f64>,

    /// Chest circumference in cm
    #[arg(long)]
    chest: Option<f64>,

    /// Waist circumference in cm
    #[arg(long)]
    waist: Option<f64>,

    /// Hip circumference in cm
    #[arg(long)]
    hips: Option<f64>,

    /// Arm circumference in cm
    #[arg(long)]
    arms: Option<f64>,

    /// Thigh circumference in cm
    #[arg(long)]
    thighs: Option<f64>,

    /// Free-text note
    #[arg(long, default_value = "")]
    notes: String,
}

fn display_entry(entry: &ProgressEntry) {
    let body_fat = entry
        .body_fat
        .map(|fat| format!(", {fat:.1}% body fat"))
        .unwrap_or_default();
    println!("   {}  {:.1} kg{body_fat}  {}", entry.date, entry.weight, entry.notes);
}

fn display_summary(summary: &ProgressSummary) {
    println!("\nProgress ({} entries)", summary.entry_count);
    println!("   Current weight: {:.1} kg", summary.current_weight);
    if let Some(trend) = summary.trend {
        let arrow = match trend.direction {
            WeightDirection::Up => "up",
            WeightDirection::Down => "down",
            WeightDirection::Stable => "stable",
        };
        println!(
            "   Latest change: {:+.1} kg ({arrow}, {:.1}%)",
            trend.change, trend.percentage
        );
    }
    println!("   Progress to ideal weight: {:.0}%", summary.progress_to_goal);
    for achievement in &summary.achievements {
        println!("   * {}: {}", achievement.title, achievement.description);
    }
}

pub fn add(session: &Session, out: &Output, args: AddArgs, today: NaiveDate) -> Result<()> {
    let entry = session.add_progress(NewProgressEntry {
        date: args.date.unwrap_or(today),
        weight: args.weight,
        body_fat: args.body_fat,
        measurements: BodyMeasurements {
            chest: args.chest,
            waist: args.waist,
            hips: args.hips,
            arms: args.arms,
            thighs: args.thighs,
        },
        notes: args.notes,
    })?;
    out.render(&entry, |entry| {
        println!("Recorded:");
        display_entry(entry);
    })
}

pub fn list(session: &Session, out: &Output) -> Result<()> {
    let entries = session.progress_entries()?;
    out.render(&entries, |entries| {
        if entries.is_empty() {
            println!("No progress entries yet");
        }
        entries.iter().for_each(display_entry);
    })
}

pub fn summary(session: &Session, out: &Output) -> Result<()> {
    let summary = session.progress_summary()?;
    out.render(&summary, display_summary)
}
