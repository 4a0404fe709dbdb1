use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::ApiError,
    foods::Food,
    state::AppState,
};

use super::dto::{parse_date, AddItemRequest, PlanDayResponse};
use super::repo::PlanDay;
use super::repo_types::MealItem;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans/:date", get(get_plan))
        .route("/plans/:date/items", post(add_item).delete(clear_day))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<PlanDayResponse>, ApiError> {
    let date = parse_date(&date)?;
    let plan = PlanDay::get_or_create(&state.db, user_id, date).await?;
    Ok(Json(plan.into()))
}

#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<PlanDayResponse>, ApiError> {
    let date = parse_date(&date)?;
    if !payload.quantity.is_finite() || payload.quantity < 0.1 {
        return Err(ApiError::Invalid("quantity must be at least 0.1".into()));
    }

    let food = Food::find_by_id(&state.db, payload.food_id)
        .await?
        .ok_or(ApiError::NotFound("food"))?;

    let mut plan = PlanDay::get_or_create(&state.db, user_id, date).await?;
    plan.meals
        .slot_mut(payload.meal)
        .push(MealItem::snapshot(&food, payload.quantity));
    plan.save(&state.db).await?;

    info!(user_id = %user_id, food_id = %food.id, meal = ?payload.meal, "item added");
    Ok(Json(plan.into()))
}

#[instrument(skip(state))]
pub async fn clear_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<PlanDayResponse>, ApiError> {
    let date = parse_date(&date)?;
    let mut plan = PlanDay::get_or_create(&state.db, user_id, date).await?;
    plan.meals.clear();
    plan.save(&state.db).await?;

    info!(user_id = %user_id, %date, "plan day cleared");
    Ok(Json(plan.into()))
}
