// ABOUTME: NutriPlan CLI - onboarding, plans, meal logging and progress tracking from the terminal
// ABOUTME: Loads configuration from the environment and keeps state in a file-backed store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors
//!
//! Usage:
//! ```bash
//! # Answer the onboarding questionnaire
//! nutriplan onboard --name Ana --email ana@example.com --age 25 --gender male \
//!     --height 170 --weight 70 --activity moderate --goal maintain-weight
//!
//! # Show BMI, BMR, calorie and macro targets
//! nutriplan metrics
//!
//! # Get today's meal and workout plan (GEMINI_API_KEY enables AI plans)
//! nutriplan recommend --refresh
//!
//! # Mark lunch eaten and add a catalog food to dinner
//! nutriplan meals toggle meal-lunch
//! nutriplan meals add dinner 4
//!
//! # Record a weigh-in and view progress
//! nutriplan progress add --weight 69.2
//! nutriplan progress summary
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use nutriplan::config::AppConfig;
use nutriplan::logging::LoggingConfig;
use nutriplan::models::{ActivityLevel, Gender, Goal, MealSlot};
use nutriplan::recommendations::RecommendationService;
use nutriplan::session::{OnboardingInput, Route, Session};
use nutriplan::storage::FileStore;

#[derive(Parser)]
#[command(
    name = "nutriplan",
    about = "Personal nutrition and training planner",
    long_about = "Derives calorie and macro targets from your body metrics, generates meal and workout plans, and tracks meals and progress."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Data directory override (defaults to NUTRIPLAN_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create the profile from questionnaire answers (replaces any existing profile)
    Onboard(OnboardArgs),

    /// Show or edit the stored profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Show BMI, BMR, TDEE, calorie target and macro targets
    Metrics,

    /// Show the meal and workout plan for a day
    Recommend {
        /// Ignore the cached plan and ask again
        #[arg(long)]
        refresh: bool,

        /// Fail instead of serving the standard plan when generation fails
        #[arg(long)]
        strict: bool,

        /// Day of the plan (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Log meals and build a custom meal plan
    Meals {
        #[command(subcommand)]
        action: MealsCommand,
    },

    /// Planned and consumed calories and macros for a day
    Nutrition {
        /// Day to summarize (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Headline numbers for today
    Dashboard,

    /// Record and review body progress
    Progress {
        #[command(subcommand)]
        action: ProgressCommand,
    },

    /// Search the food catalog
    Foods {
        /// Case-insensitive name fragment; omit to list everything
        query: Option<String>,
    },

    /// Ask a free-text nutrition question
    Ask {
        /// The question
        question: String,
    },

    /// Show which screen a path resolves to for the current state
    Route {
        /// Requested path, e.g. /dashboard
        path: String,
    },

    /// Delete all stored data
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct OnboardArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Age in years
    #[arg(long)]
    age: u32,

    /// male or female
    #[arg(long)]
    gender: Gender,

    /// Height in cm
    #[arg(long)]
    height: f64,

    /// Weight in kg
    #[arg(long)]
    weight: f64,

    /// sedentary, light, moderate, active or very-active
    #[arg(long)]
    activity: ActivityLevel,

    /// weight-loss, weight-gain, muscle-gain or maintain-weight
    #[arg(long)]
    goal: Goal,

    /// Dietary restriction (repeatable)
    #[arg(long = "restriction")]
    restrictions: Vec<String>,

    /// Food allergy (repeatable)
    #[arg(long = "allergy")]
    allergies: Vec<String>,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ProfileCommand {
    /// Print the stored profile
    Show,

    /// Change profile fields; derived values are recomputed
    Update(commands::profile::UpdateArgs),
}

#[non_exhaustive]
#[derive(Subcommand)]
enum MealsCommand {
    /// Flip the eaten state of a meal (meal-breakfast, meal-lunch, ...) or catalog food id
    Toggle {
        /// Consumption id
        id: String,

        /// Day of the log (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Add a catalog food to a slot of the custom plan
    Add {
        /// breakfast, lunch, dinner or snacks
        slot: MealSlot,

        /// Catalog food id
        food_id: String,

        /// Day of the plan (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Remove a food from a slot of the custom plan
    Remove {
        /// breakfast, lunch, dinner or snacks
        slot: MealSlot,

        /// Catalog food id
        food_id: String,

        /// Day of the plan (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the custom plan and consumption log
    Show {
        /// Day to show (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ProgressCommand {
    /// Record a body snapshot
    Add(commands::progress::AddArgs),

    /// List recorded snapshots, oldest first
    List,

    /// Trend, progress toward ideal weight and achievements
    Summary,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.with_level("debug")
    } else {
        logging
    };
    logging.init()?;

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    debug!("{}", config.summary());

    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("cannot open data directory {}", config.data_dir.display()))?;
    let session = Session::new(Box::new(store), config.nutrition.clone());
    let out = helpers::display::Output::new(cli.json);

    match cli.command {
        Command::Onboard(args) => commands::profile::onboard(&session, &out, args.into())?,
        Command::Profile { action } => match action {
            ProfileCommand::Show => commands::profile::show(&session, &out)?,
            ProfileCommand::Update(args) => commands::profile::update(&session, &out, args)?,
        },
        Command::Metrics => commands::profile::metrics(&session, &out)?,
        Command::Recommend {
            refresh,
            strict,
            date,
        } => {
            let service = RecommendationService::from_config(&config);
            commands::plan::recommend(
                &session,
                &service,
                &out,
                date.unwrap_or_else(today),
                refresh,
                strict,
            )
            .await?;
        }
        Command::Meals { action } => match action {
            MealsCommand::Toggle { id, date } => {
                commands::meals::toggle(&session, &out, date.unwrap_or_else(today), &id)?;
            }
            MealsCommand::Add {
                slot,
                food_id,
                date,
            } => commands::meals::add(&session, &out, date.unwrap_or_else(today), slot, &food_id)?,
            MealsCommand::Remove {
                slot,
                food_id,
                date,
            } => commands::meals::remove(
                &session,
                &out,
                date.unwrap_or_else(today),
                slot,
                &food_id,
            )?,
            MealsCommand::Show { date } => {
                commands::meals::show(&session, &out, date.unwrap_or_else(today))?;
            }
        },
        Command::Nutrition { date } => {
            commands::meals::nutrition(&session, &out, date.unwrap_or_else(today))?;
        }
        Command::Dashboard => commands::plan::dashboard(&session, &out, today())?,
        Command::Progress { action } => match action {
            ProgressCommand::Add(args) => commands::progress::add(&session, &out, args, today())?,
            ProgressCommand::List => commands::progress::list(&session, &out)?,
            ProgressCommand::Summary => commands::progress::summary(&session, &out)?,
        },
        Command::Foods { query } => {
            commands::meals::search_foods(&session, &out, query.as_deref().unwrap_or_default())?;
        }
        Command::Ask { question } => {
            let service = RecommendationService::from_config(&config);
            commands::plan::ask(&session, &service, &out, &question).await?;
        }
        Command::Route { path } => {
            let resolved = session.resolve_route(Route::from_path(&path))?;
            out.line(resolved.path());
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("refusing to delete all data without --yes");
            }
            session.reset()?;
            out.line("All NutriPlan data deleted");
        }
    }

    Ok(())
}

impl From<OnboardArgs> for OnboardingInput {
    fn from(args: OnboardArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            age: args.age,
            gender: args.gender,
            height: args.height,
            weight: args.weight,
            activity_level: args.activity,
            goal: args.goal,
            dietary_restrictions: args.restrictions.into_iter().collect(),
            allergies: args.allergies.into_iter().collect(),
        }
    }
}
