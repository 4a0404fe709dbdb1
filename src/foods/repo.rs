use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A catalog food. Read-only for the recommendation engine; macro fields are
/// copied into plan items at add time rather than referenced live.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving_amount: f64,
    pub serving_unit: String,
    pub category: Option<String>,
    pub meal_type: Option<String>,
    pub source: String,
    pub verified: bool,
}

/// Filters for the candidate pool query.
#[derive(Debug, Clone, Default)]
pub struct PoolFilter {
    pub sources: Option<Vec<String>>,
    pub verified_only: bool,
    pub meal_type: Option<String>,
}

impl Food {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Food>> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            SELECT id, name, calories, protein, carbs, fat,
                   serving_amount, serving_unit, category, meal_type, source, verified
            FROM foods
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(food)
    }

    /// Randomized sample of eligible foods. Not deterministic across calls;
    /// `ORDER BY random()` is fine at catalog scale and keeps repeated
    /// recommendations from going stale.
    pub async fn sample_pool(
        db: &PgPool,
        filter: &PoolFilter,
        sample_size: i64,
    ) -> anyhow::Result<Vec<Food>> {
        let rows = sqlx::query_as::<_, Food>(
            r#"
            SELECT id, name, calories, protein, carbs, fat,
                   serving_amount, serving_unit, category, meal_type, source, verified
            FROM foods
            WHERE ($1::text[] IS NULL OR source = ANY($1))
              AND (NOT $2 OR verified)
              AND ($3::text IS NULL OR meal_type IS NULL OR meal_type = $3)
            ORDER BY random()
            LIMIT $4
            "#,
        )
        .bind(filter.sources.as_deref())
        .bind(filter.verified_only)
        .bind(filter.meal_type.as_deref())
        .bind(sample_size)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Food;
    use uuid::Uuid;

    /// A food with the given macros, for exercising the pure core.
    pub fn food(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> Food {
        Food {
            id: Uuid::new_v4(),
            name: name.to_string(),
            calories,
            protein,
            carbs,
            fat,
            serving_amount: 100.0,
            serving_unit: "g".into(),
            category: None,
            meal_type: None,
            source: "custom".into(),
            verified: true,
        }
    }

    pub fn food_in_category(name: &str, calories: f64, category: &str) -> Food {
        Food {
            category: Some(category.to_string()),
            ..food(name, calories, 10.0, 10.0, 5.0)
        }
    }
}
