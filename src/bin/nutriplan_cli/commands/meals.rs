// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors
// ABOUTME: Meal commands: consumption toggles, custom meal plan edits, daily totals and food search
// ABOUTME: Consumption ids are meal-<slot> for plan meals and catalog ids for custom foods

use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use nutriplan::models::{FoodItem, MealSlot};
use nutriplan::session::Session;

use crate::helpers::display::{display_daily_nutrition, Output};

fn display_food(food: &FoodItem) {
    println!(
        "   [{}] {} - {} kcal ({}), P {:.0} g / C {:.0} g / F {:.0} g",
        food.id, food.name, food.calories, food.serving_size, food.protein, food.carbs, food.fat
    );
}

pub fn toggle(session: &Session, out: &Output, date: NaiveDate, id: &str) -> Result<()> {
    let consumed = session.toggle_consumed(date, id)?;
    out.render(&json!({ "date": date, "id": id, "consumed": consumed }), |_| {
        if consumed {
            println!("Marked {id} as eaten on {date}");
        } else {
            println!("Unmarked {id} on {date}");
        }
    })
}

pub fn add(
    session: &Session,
    out: &Output,
    date: NaiveDate,
    slot: MealSlot,
    food_id: &str,
) -> Result<()> {
    let food = session.add_custom_food(date, slot, food_id)?;
    out.render(&food, |food| {
        println!("Added to {slot} on {date}:");
        display_food(food);
    })
}

pub fn remove(
    session: &Session,
    out: &Output,
    date: NaiveDate,
    slot: MealSlot,
    food_id: &str,
) -> Result<()> {
    let removed = session.remove_custom_food(date, slot, food_id)?;
    out.render(&json!({ "removed": removed }), |_| {
        if removed {
            println!("Removed food {food_id} from {slot} on {date}");
        } else {
            println!("Food {food_id} is not in {slot} on {date}");
        }
    })
}

pub fn show(session: &Session, out: &Output, date: NaiveDate) -> Result<()> {
    let plan = session.custom_meals(date)?;
    let consumed = session.consumed_on(date)?;
    out.render(
        &json!({ "date": date, "customMeals": plan, "consumed": consumed }),
        |_| {
            println!("\nCustom meals for {date}");
            for slot in MealSlot::ALL {
                let foods = plan.foods(slot);
                if !foods.is_empty() {
                    println!("{slot}:");
                    foods.iter().for_each(display_food);
                }
            }
            if plan.is_empty() {
                println!("   (none)");
            }
            let eaten = consumed.iter().cloned().collect::<Vec<_>>().join(", ");
            println!("Eaten: {}", if eaten.is_empty() { "nothing yet" } else { eaten.as_str() });
        },
    )
}

pub fn nutrition(session: &Session, out: &Output, date: NaiveDate) -> Result<()> {
    let day = session.daily_nutrition(date)?;
    out.render(&day, display_daily_nutrition)
}

pub fn search_foods(session: &Session, out: &Output, query: &str) -> Result<()> {
    let foods = session.catalog().search(query);
    out.render(&foods, |foods| {
        if foods.is_empty() {
            println!("No foods match '{query}'");
        }
        foods.iter().copied().for_each(display_food);
    })
}
