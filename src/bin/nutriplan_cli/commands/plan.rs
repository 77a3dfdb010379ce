// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors
// ABOUTME: Plan commands: daily recommendations, dashboard and free-text food questions
// ABOUTME: The strict mode surfaces generation failures instead of serving the standard plan

use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;
use tracing::debug;

use nutriplan::models::PlanSource;
use nutriplan::recommendations::{RecommendationOutcome, RecommendationService};
use nutriplan::session::Session;

use crate::helpers::display::{
    display_daily_nutrition, display_meal_plan, display_workout_plan, Output,
};

async fn strict_outcome(
    session: &Session,
    service: &RecommendationService,
    date: NaiveDate,
    refresh: bool,
) -> Result<RecommendationOutcome> {
    let cached = if refresh {
        None
    } else {
        session.cached_recommendations(date)?
    };
    let recommendations = if let Some(cached) = cached {
        debug!(%date, "Serving cached recommendations");
        cached
    } else {
        let profile = session.require_user()?;
        let generated = service.try_generate(&profile).await?;
        session.cache_recommendations(&profile, date, &generated)?;
        generated
    };
    Ok(RecommendationOutcome {
        recommendations,
        source: PlanSource::Generated,
        notice: None,
        failure: None,
    })
}

pub async fn recommend(
    session: &Session,
    service: &RecommendationService,
    out: &Output,
    date: NaiveDate,
    refresh: bool,
    strict: bool,
) -> Result<()> {
    let outcome = if strict {
        strict_outcome(session, service, date, refresh).await?
    } else {
        session.recommendations(service, date, refresh).await?
    };
    out.render(&outcome, |outcome| {
        if let Some(notice) = &outcome.notice {
            println!("Note: {notice}");
        }
        display_meal_plan(&outcome.recommendations.meals);
        display_workout_plan(&outcome.recommendations.workout);
    })
}

pub fn dashboard(session: &Session, out: &Output, date: NaiveDate) -> Result<()> {
    let summary = session.dashboard(date)?;
    out.render(&summary, |summary| {
        println!("\nHello, {}!", summary.name);
        println!(
            "BMI {:.1} ({})   Ideal weight {:.1} kg   Target {} kcal",
            summary.bmi, summary.bmi_class.label, summary.ideal_weight, summary.daily_calories
        );
        display_daily_nutrition(&summary.today);
    })
}

pub async fn ask(
    session: &Session,
    service: &RecommendationService,
    out: &Output,
    question: &str,
) -> Result<()> {
    let profile = session.require_user()?;
    let answer = service.answer_food_question(&profile, question).await?;
    out.render(&json!({ "question": question, "answer": answer }), |_| {
        println!("{answer}");
    })
}
