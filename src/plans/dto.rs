use serde::{Deserialize, Serialize};
use time::{format_description::FormatItem, macros::format_description, Date};
use uuid::Uuid;

use crate::error::ApiError;

use super::repo::PlanDay;
use super::repo_types::{MealSlot, Meals};

pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_date(s: &str) -> Result<Date, ApiError> {
    Date::parse(s, DATE_FORMAT).map_err(|_| ApiError::Invalid(format!("invalid date: {s}")))
}

pub fn format_date(d: Date) -> String {
    // Formatting a valid Date with this description cannot fail
    d.format(DATE_FORMAT).unwrap_or_default()
}

/// Request body for adding one item to a plan day.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub food_id: Uuid,
    pub quantity: f64,
    pub meal: MealSlot,
}

/// A plan day as returned to clients.
#[derive(Debug, Serialize)]
pub struct PlanDayResponse {
    pub id: Uuid,
    pub date: String,
    pub meals: Meals,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

impl From<PlanDay> for PlanDayResponse {
    fn from(p: PlanDay) -> Self {
        Self {
            id: p.id,
            date: format_date(p.date),
            meals: p.meals.0,
            total_calories: p.total_calories,
            total_protein: p.total_protein,
            total_carbs: p.total_carbs,
            total_fat: p.total_fat,
        }
    }
}
