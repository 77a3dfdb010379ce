// ABOUTME: Built-in food catalog with per-serving nutrition facts
// ABOUTME: Supports id lookup and case-insensitive name search for custom meal planning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

use crate::models::FoodItem;

/// Searchable collection of foods
#[derive(Debug, Clone)]
pub struct FoodCatalog {
    foods: Vec<FoodItem>,
}

impl FoodCatalog {
    /// Catalog over the given foods
    #[must_use]
    pub const fn new(foods: Vec<FoodItem>) -> Self {
        Self { foods }
    }

    /// The foods shipped with NutriPlan
    #[must_use]
    pub fn builtin() -> Self {
        let food = |id: &str, name: &str, calories, protein, carbs, fat, serving: &str| FoodItem {
            id: id.to_owned(),
            name: name.to_owned(),
            calories,
            protein,
            carbs,
            fat,
            serving_size: serving.to_owned(),
        };
        Self::new(vec![
            food("1", "Brown rice with grilled chicken", 450, 35.0, 45.0, 12.0, "1 serving"),
            food("2", "Vegetable salad with tofu", 280, 15.0, 25.0, 8.0, "1 bowl"),
            food("3", "Banana protein smoothie", 320, 25.0, 35.0, 8.0, "1 glass"),
            food("4", "Grilled salmon", 380, 40.0, 5.0, 18.0, "150g"),
            food("5", "Oatmeal with fruit", 300, 12.0, 45.0, 8.0, "1 bowl"),
        ])
    }

    /// Every food in catalog order
    #[must_use]
    pub fn all(&self) -> &[FoodItem] {
        &self.foods
    }

    /// Food with the given id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FoodItem> {
        self.foods.iter().find(|food| food.id == id)
    }

    /// Foods whose name contains the query, ignoring case; a blank query matches everything
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&FoodItem> {
        let needle = query.trim().to_lowercase();
        self.foods
            .iter()
            .filter(|food| needle.is_empty() || food.name.to_lowercase().contains(&needle))
            .collect()
    }
}

impl Default for FoodCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = FoodCatalog::builtin();
        let hits = catalog.search("SALMON");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "4");
        assert_eq!(catalog.search("  ").len(), catalog.all().len());
        assert!(catalog.search("pizza").is_empty());
    }
}
