use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::{Date, Duration};
use tracing::info;

use crate::auth::repo::User;
use crate::error::ApiError;
use crate::foods::{Food, PoolFilter};
use crate::plans::{MealItem, MealSlot, PlanDay};

use super::dto::{DaySummary, GenerateSummary};
use super::service::recommend_for_day;

/// How far ahead one generation call plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Span {
    Daily,
    Weekly,
    Monthly,
}

impl Span {
    pub fn days(self) -> i64 {
        match self {
            Span::Daily => 1,
            Span::Weekly => 7,
            Span::Monthly => 30,
        }
    }
}

/// Per-day item cap for the packing loop.
const MAX_ITEMS_PER_DAY: usize = 8;
/// Acceptance floor: even with no calories left, items at or under this
/// still qualify, and packing stops once the remainder drops this low.
const PACK_FLOOR: f64 = 120.0;
/// Pool size requested from the recommender per day.
const POOL_LIMIT: usize = 30;

/// Ascending-calorie greedy fill. Deliberately not a subset-sum optimizer:
/// preferring many small items over few large ones keeps the day varied.
/// Terminates within min(cap, pool size) acceptances.
pub(crate) fn greedy_pack(mut pool: Vec<Food>, mut remaining: f64) -> Vec<Food> {
    pool.sort_by(|a, b| a.calories.total_cmp(&b.calories));

    let mut accepted = Vec::new();
    for food in pool {
        if accepted.len() >= MAX_ITEMS_PER_DAY {
            break;
        }
        if food.calories <= remaining.max(PACK_FLOOR) {
            remaining -= food.calories;
            accepted.push(food);
        }
        if remaining <= PACK_FLOOR {
            break;
        }
    }
    accepted
}

/// Spreads packed items over the four slots in fixed order, appending to
/// whatever each slot already holds.
pub(crate) fn distribute(items: Vec<Food>) -> Vec<(MealSlot, Food)> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, food)| (MealSlot::ALL[i % MealSlot::ALL.len()], food))
        .collect()
}

/// The run of dates one generation call covers. `Date` addition panics at
/// the calendar limit, so overflow is checked up front and rejected as
/// invalid input before any day is generated.
pub(crate) fn span_dates(start: Date, span: Span) -> Result<Vec<Date>, ApiError> {
    (0..span.days())
        .map(|offset| {
            start.checked_add(Duration::days(offset)).ok_or_else(|| {
                ApiError::Invalid("start_date leaves no room for the requested span".into())
            })
        })
        .collect()
}

/// Generates meal plans for `[start, start + span)`, one day at a time in
/// ascending date order. Each day's budget depends on that day's freshly
/// fetched plan state, so days are strictly sequential. An error aborts the
/// remaining days; days already saved stay saved.
pub async fn generate_plan(
    db: &PgPool,
    user: &User,
    start: Date,
    span: Span,
    filter: &PoolFilter,
    rng: &mut impl Rng,
) -> Result<GenerateSummary, ApiError> {
    let mut days = Vec::with_capacity(span.days() as usize);

    for date in span_dates(start, span)? {
        let mut plan = PlanDay::get_or_create(db, user.id, date).await?;

        // Packing only tracks calories; full macro fit already shaped the
        // pool inside the scorer.
        let remaining = (user.daily_calorie_goal.unwrap_or(0.0) - plan.total_calories).max(0.0);

        let rec = recommend_for_day(db, user, &plan, POOL_LIMIT, filter, rng).await?;
        let picked = greedy_pack(rec.foods, remaining);
        let items_added = picked.len();

        for (slot, food) in distribute(picked) {
            plan.meals.slot_mut(slot).push(MealItem::snapshot(&food, 1.0));
        }
        plan.save(db).await?;

        info!(user_id = %user.id, %date, items_added, "plan day generated");
        days.push(DaySummary {
            date: crate::plans::dto::format_date(date),
            items_added,
        });
    }

    Ok(GenerateSummary {
        days_generated: days.len(),
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foods::repo::test_support::food;

    fn pool_of(calories: &[f64]) -> Vec<Food> {
        calories
            .iter()
            .enumerate()
            .map(|(i, &c)| food(&format!("food-{i}"), c, 10.0, 10.0, 5.0))
            .collect()
    }

    #[test]
    fn span_day_counts() {
        assert_eq!(Span::Daily.days(), 1);
        assert_eq!(Span::Weekly.days(), 7);
        assert_eq!(Span::Monthly.days(), 30);
    }

    #[test]
    fn span_dates_run_sequentially_ascending() {
        let dates = span_dates(time::macros::date!(2024 - 01 - 01), Span::Weekly).unwrap();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], time::macros::date!(2024 - 01 - 01));
        assert_eq!(dates[6], time::macros::date!(2024 - 01 - 07));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn span_past_calendar_limit_is_invalid_input_not_a_panic() {
        // The last representable date still supports a one-day span
        let limit = time::macros::date!(9999 - 12 - 31);
        assert!(span_dates(limit, Span::Daily).is_ok());

        // Anything longer would overflow Date arithmetic; refuse up front
        for span in [Span::Weekly, Span::Monthly] {
            let err = span_dates(limit, span).unwrap_err();
            assert!(matches!(err, crate::error::ApiError::Invalid(_)));
        }
    }

    #[test]
    fn packs_up_to_eight_items_within_budget() {
        // Scenario: 2000 kcal goal, empty day, ten 200-kcal candidates.
        let picked = greedy_pack(pool_of(&[200.0; 10]), 2000.0);
        assert_eq!(picked.len(), 8);
        let consumed: f64 = picked.iter().map(|f| f.calories).sum();
        assert_eq!(consumed, 1600.0);
    }

    #[test]
    fn stops_once_remaining_drops_to_floor() {
        // 500 remaining: accept 200 (300 left), 200 (100 left <= 120, stop)
        let picked = greedy_pack(pool_of(&[200.0; 10]), 500.0);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn exhausted_budget_rejects_everything_above_the_floor() {
        // Scenario: zero remaining; 200-kcal items exceed max(120, 0).
        let picked = greedy_pack(pool_of(&[200.0; 10]), 0.0);
        assert!(picked.is_empty());
    }

    #[test]
    fn floor_is_not_a_hard_zero_cutoff() {
        // Zero remaining still admits an item at or under 120 kcal
        let picked = greedy_pack(pool_of(&[100.0, 200.0, 300.0]), 0.0);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].calories, 100.0);
    }

    #[test]
    fn prefers_many_small_items_over_few_large() {
        let picked = greedy_pack(pool_of(&[800.0, 100.0, 150.0, 900.0, 120.0]), 1000.0);
        let calories: Vec<f64> = picked.iter().map(|f| f.calories).collect();
        // Ascending greedy takes the small ones first; the large items no
        // longer fit the decremented remainder and are skipped
        assert_eq!(calories, [100.0, 120.0, 150.0]);
    }

    #[test]
    fn termination_is_bounded_by_pool_size() {
        let picked = greedy_pack(pool_of(&[50.0, 60.0]), 10_000.0);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn distributes_round_robin_across_fixed_slot_order() {
        let placed = distribute(pool_of(&[100.0; 8]));
        let slots: Vec<MealSlot> = placed.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            slots,
            [
                MealSlot::Breakfast,
                MealSlot::Lunch,
                MealSlot::Dinner,
                MealSlot::Snacks,
                MealSlot::Breakfast,
                MealSlot::Lunch,
                MealSlot::Dinner,
                MealSlot::Snacks,
            ]
        );
        // Scenario: eight accepted items land two per slot
        for slot in MealSlot::ALL {
            assert_eq!(placed.iter().filter(|(s, _)| *s == slot).count(), 2);
        }
    }

    #[test]
    fn distribute_keeps_item_order_within_the_cycle() {
        let placed = distribute(pool_of(&[1.0, 2.0, 3.0]));
        assert_eq!(placed[0].1.calories, 1.0);
        assert_eq!(placed[1].1.calories, 2.0);
        assert_eq!(placed[2].1.calories, 3.0);
    }
}
