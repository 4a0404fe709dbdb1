use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::foods::Food;

/// The four meal slots of a plan day, in their fixed distribution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];
}

/// One item in a plan day. Macro fields are a snapshot copied from the food
/// catalog at add time, so later catalog edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub food_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub serving_amount: f64,
    pub serving_unit: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MealItem {
    pub fn snapshot(food: &Food, quantity: f64) -> Self {
        Self {
            food_id: food.id,
            name: food.name.clone(),
            quantity,
            serving_amount: food.serving_amount,
            serving_unit: food.serving_unit.clone(),
            calories: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
        }
    }
}

/// Per-day meal document, stored as one JSONB column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meals {
    pub breakfast: Vec<MealItem>,
    pub lunch: Vec<MealItem>,
    pub dinner: Vec<MealItem>,
    pub snacks: Vec<MealItem>,
}

/// Derived macro totals, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl Meals {
    pub fn slot(&self, slot: MealSlot) -> &Vec<MealItem> {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snacks => &self.snacks,
        }
    }

    pub fn slot_mut(&mut self, slot: MealSlot) -> &mut Vec<MealItem> {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Snacks => &mut self.snacks,
        }
    }

    pub fn iter_items(&self) -> impl Iterator<Item = &MealItem> {
        MealSlot::ALL.iter().flat_map(|s| self.slot(*s).iter())
    }

    pub fn item_count(&self) -> usize {
        self.iter_items().count()
    }

    pub fn clear(&mut self) {
        for slot in MealSlot::ALL {
            self.slot_mut(slot).clear();
        }
    }

    /// Totals are always the sum over all slots of quantity x per-unit macro.
    pub fn totals(&self) -> Totals {
        let mut t = Totals::default();
        for item in self.iter_items() {
            t.calories += item.quantity * item.calories;
            t.protein += item.quantity * item.protein;
            t.carbs += item.quantity * item.carbs;
            t.fat += item.quantity * item.fat;
        }
        Totals {
            calories: round2(t.calories),
            protein: round2(t.protein),
            carbs: round2(t.carbs),
            fat: round2(t.fat),
        }
    }
}
