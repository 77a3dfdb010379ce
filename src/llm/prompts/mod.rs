// ABOUTME: Prompt templates for plan generation and free-text food questions
// ABOUTME: Markdown templates compiled into the binary and filled from the user profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # Prompts
//!
//! Templates live next to this module as markdown and are loaded at compile
//! time. Placeholders use `{{name}}`; any placeholder without a value is left
//! in place so a missing field is visible in the rendered prompt.

use std::collections::BTreeSet;

use crate::config::ContentConfig;
use crate::models::UserProfile;

/// Template asking for a JSON meal and workout plan
pub const RECOMMENDATION_TEMPLATE: &str = include_str!("recommendation.md");

/// Template answering a free-text nutrition question
pub const FOOD_QUESTION_TEMPLATE: &str = include_str!("food_question.md");

/// Replace every `{{key}}` with its value
#[must_use]
pub fn render(template: &str, values: &[(&str, String)]) -> String {
    values
        .iter()
        .fold(template.to_owned(), |rendered, (key, value)| {
            rendered.replace(&format!("{{{{{key}}}}}"), value)
        })
}

fn describe_set(items: &BTreeSet<String>) -> String {
    if items.is_empty() {
        "none".to_owned()
    } else {
        items.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn profile_values(profile: &UserProfile, content: &ContentConfig) -> Vec<(&'static str, String)> {
    vec![
        ("weight", profile.weight.to_string()),
        ("height", profile.height.to_string()),
        ("age", profile.age.to_string()),
        ("gender", profile.gender.as_str().to_owned()),
        ("goal", profile.goal.description().to_owned()),
        ("activity_level", profile.activity_level.description().to_owned()),
        ("dietary_restrictions", describe_set(&profile.dietary_restrictions)),
        ("allergies", describe_set(&profile.allergies)),
        ("language", content.language.clone()),
        ("cuisine", content.cuisine.clone()),
    ]
}

/// Prompt for a personalized plan targeting `daily_calories`
#[must_use]
pub fn recommendation_prompt(
    profile: &UserProfile,
    daily_calories: u32,
    content: &ContentConfig,
) -> String {
    let mut values = profile_values(profile, content);
    values.push(("daily_calories", daily_calories.to_string()));
    render(RECOMMENDATION_TEMPLATE, &values)
}

/// Prompt answering `question` for this user
#[must_use]
pub fn food_question_prompt(profile: &UserProfile, question: &str, content: &ContentConfig) -> String {
    let mut values = profile_values(profile, content);
    values.push(("question", question.trim().to_owned()));
    render(FOOD_QUESTION_TEMPLATE, &values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_known_keys_only() {
        let rendered = render("{{a}} and {{b}}", &[("a", "one".to_owned())]);
        assert_eq!(rendered, "one and {{b}}");
    }

    #[test]
    fn test_templates_have_no_unknown_placeholders() {
        let keys = [
            "weight",
            "height",
            "age",
            "gender",
            "goal",
            "activity_level",
            "dietary_restrictions",
            "allergies",
            "language",
            "cuisine",
            "daily_calories",
            "question",
        ];
        let values: Vec<_> = keys.iter().map(|key| (*key, "x".to_owned())).collect();
        for template in [RECOMMENDATION_TEMPLATE, FOOD_QUESTION_TEMPLATE] {
            assert!(!render(template, &values).contains("{{"));
        }
    }
}
