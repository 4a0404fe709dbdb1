use std::str::FromStr;

use rand::Rng;
use sqlx::PgPool;
use tracing::debug;

use crate::auth::repo::User;
use crate::error::ApiError;
use crate::foods::{Food, PoolFilter};
use crate::plans::PlanDay;

use super::budget::{remaining_budget, MacroBudget};
use super::diversity::diversify;
use super::scorer::{score_pool, Goal};

/// A recommendation for one user/day: the selected foods plus the budget
/// they were scored against, returned for transparency.
#[derive(Debug)]
pub struct Recommendation {
    pub budget: MacroBudget,
    pub foods: Vec<Food>,
}

/// Budget -> fetch -> score -> diversify, as one direct call chain. The plan
/// generator and the recommendations endpoint both come through here.
pub async fn recommend_for_day(
    db: &PgPool,
    user: &User,
    plan: &PlanDay,
    limit: usize,
    filter: &PoolFilter,
    rng: &mut impl Rng,
) -> Result<Recommendation, ApiError> {
    let budget = remaining_budget(user, plan);
    let goal = Goal::from_str(&user.goal).unwrap_or(Goal::Maintain);

    // Oversample so the scorer's calorie pre-filter and the diversity pass
    // still have enough candidates left to fill the request.
    let sample_size = (limit * 3).max(30) as i64;
    let pool = Food::sample_pool(db, filter, sample_size).await?;
    debug!(
        user_id = %user.id,
        pool = pool.len(),
        remaining_calories = budget.calories,
        "scoring candidate pool"
    );

    let scored = score_pool(pool, &budget, goal, rng);
    let foods = diversify(scored, limit);

    Ok(Recommendation { budget, foods })
}
