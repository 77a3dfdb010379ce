// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors
// ABOUTME: Profile commands: onboarding, show, update and derived metrics
// ABOUTME: Derived fields are always recomputed by the session, never taken from input

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use tracing::info;

use nutriplan::models::{ActivityLevel, Gender, Goal};
use nutriplan::session::{OnboardingInput, ProfileUpdate, Session};

use crate::helpers::display::{display_metrics, display_profile, Output};

/// Profile fields to change; omitted flags keep the stored value
#[derive(Args)]
pub struct UpdateArgs {
    /// New display name
    #[arg(long)]
    name: Option<String>,

    /// New email
    #[arg(long)]
    email: Option<String>,

    /// New age
    #[arg(long)]
    age: Option<u32>,

    /// New gender
    #[arg(long)]
    gender: Option<Gender>,

    /// New height in cm
    #[arg(long)]
    height: Option<f64>,

    /// New weight in kg
    #[arg(long)]
    weight: Option<f64>,

    /// New activity level
    #[arg(long)]
    activity: Option<ActivityLevel>,

    /// New goal
    #[arg(long)]
    goal: Option<Goal>,

    /// Replace dietary restrictions (repeatable)
    #[arg(long = "restriction")]
    restrictions: Option<Vec<String>>,

    /// Replace allergies (repeatable)
    #[arg(long = "allergy")]
    allergies: Option<Vec<String>>,
}

impl From<UpdateArgs> for ProfileUpdate {
    fn from(args: UpdateArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            age: args.age,
            gender: args.gender,
            height: args.height,
            weight: args.weight,
            activity_level: args.activity,
            goal: args.goal,
            dietary_restrictions: args.restrictions.map(|items| items.into_iter().collect()),
            allergies: args.allergies.map(|items| items.into_iter().collect()),
        }
    }
}

pub fn onboard(session: &Session, out: &Output, input: OnboardingInput) -> Result<()> {
    let profile = session.onboard(input, Utc::now())?;
    info!(user_id = %profile.id, "Profile created");
    out.render(&profile, |profile| {
        println!("Welcome, {}!", profile.name);
        display_profile(profile);
    })
}

pub fn show(session: &Session, out: &Output) -> Result<()> {
    let profile = session.require_user()?;
    out.render(&profile, display_profile)
}

pub fn update(session: &Session, out: &Output, args: UpdateArgs) -> Result<()> {
    let profile = session.update_profile(args.into())?;
    out.render(&profile, display_profile)
}

pub fn metrics(session: &Session, out: &Output) -> Result<()> {
    let metrics = session.derived_metrics()?;
    out.render(&metrics, display_metrics)
}
