pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

use axum::Router;

use crate::state::AppState;

pub use repo::PlanDay;
pub use repo_types::{MealItem, MealSlot};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
