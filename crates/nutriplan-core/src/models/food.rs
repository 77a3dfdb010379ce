// ABOUTME: Food catalog item and user-assembled custom meal plan
// ABOUTME: Custom plans group catalog foods by meal slot for a single day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::plan::MealSlot;

/// A food with its nutrition facts per serving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    /// Catalog identifier, also used as the consumption id
    pub id: String,
    /// Display name
    pub name: String,
    /// Energy per serving (kcal)
    pub calories: u32,
    /// Protein per serving (g)
    pub protein: f64,
    /// Carbohydrates per serving (g)
    pub carbs: f64,
    /// Fat per serving (g)
    pub fat: f64,
    /// Serving description, e.g. "1 bowl" or "150g"
    pub serving_size: String,
}

/// Foods picked by the user for each meal slot of one day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomMealPlan {
    /// Foods per slot, in the order they were added
    #[serde(default)]
    pub slots: BTreeMap<MealSlot, Vec<FoodItem>>,
}

impl CustomMealPlan {
    /// Append a food to a slot
    pub fn add(&mut self, slot: MealSlot, food: FoodItem) {
        self.slots.entry(slot).or_default().push(food);
    }

    /// Remove every occurrence of a food from a slot, returning whether anything was removed
    pub fn remove(&mut self, slot: MealSlot, food_id: &str) -> bool {
        let Some(foods) = self.slots.get_mut(&slot) else {
            return false;
        };
        let before = foods.len();
        foods.retain(|food| food.id != food_id);
        let removed = foods.len() != before;
        if foods.is_empty() {
            self.slots.remove(&slot);
        }
        removed
    }

    /// Foods of one slot
    #[must_use]
    pub fn foods(&self, slot: MealSlot) -> &[FoodItem] {
        self.slots.get(&slot).map_or(&[], Vec::as_slice)
    }

    /// Every food across all slots
    pub fn all_foods(&self) -> impl Iterator<Item = &FoodItem> {
        self.slots.values().flatten()
    }

    /// Whether no food has been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.values().all(Vec::is_empty)
    }
}
