use serde::Serialize;
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::Meals;

/// One plan day per (user, date). The meal document lives in a JSONB column;
/// totals are derived columns recomputed from the document on every save.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlanDay {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub meals: Json<Meals>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const PLAN_COLUMNS: &str = "id, user_id, date, meals, total_calories, total_protein, \
     total_carbs, total_fat, created_at, updated_at";

impl PlanDay {
    /// Idempotent read-or-insert for a (user, date) pair. Two calls without
    /// an intervening write return the same row.
    ///
    /// Not atomic against concurrent writers for the same key: two requests
    /// can both read pre-mutation state and the later save wins. Known
    /// lost-update window, see DESIGN.md.
    pub async fn get_or_create(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<PlanDay> {
        sqlx::query(
            "INSERT INTO plans (user_id, date) VALUES ($1, $2) \
             ON CONFLICT (user_id, date) DO NOTHING",
        )
        .bind(user_id)
        .bind(date)
        .execute(db)
        .await?;

        let plan = sqlx::query_as::<_, PlanDay>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE user_id = $1 AND date = $2"
        ))
        .bind(user_id)
        .bind(date)
        .fetch_one(db)
        .await?;
        Ok(plan)
    }

    /// Persists the meal document and recomputes the derived totals from it.
    /// Stale totals after a save are a bug, so totals are never written
    /// independently of the document.
    pub async fn save(&mut self, db: &PgPool) -> anyhow::Result<()> {
        let totals = self.meals.totals();
        self.total_calories = totals.calories;
        self.total_protein = totals.protein;
        self.total_carbs = totals.carbs;
        self.total_fat = totals.fat;

        let updated_at: OffsetDateTime = sqlx::query_scalar(
            "UPDATE plans SET meals = $2, total_calories = $3, total_protein = $4, \
             total_carbs = $5, total_fat = $6, updated_at = now() \
             WHERE id = $1 RETURNING updated_at",
        )
        .bind(self.id)
        .bind(&self.meals)
        .bind(self.total_calories)
        .bind(self.total_protein)
        .bind(self.total_carbs)
        .bind(self.total_fat)
        .fetch_one(db)
        .await?;
        self.updated_at = updated_at;
        Ok(())
    }
}
