use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::foods::Food;

use super::budget::MacroBudget;

/// The user's weight goal. Only fat scoring depends on it: fat is rewarded
/// under `gain` and penalized under `lose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    fn fat_weight(self) -> f64 {
        match self {
            Goal::Gain => 0.6,
            Goal::Maintain => 0.4,
            Goal::Lose => 0.2,
        }
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lose" => Ok(Goal::Lose),
            "maintain" => Ok(Goal::Maintain),
            "gain" => Ok(Goal::Gain),
            other => Err(format!("unknown goal mode: {other}")),
        }
    }
}

/// A candidate with its fit score. Higher is better; the score is unbounded
/// and carries a random jitter term, so ordering is not stable across calls.
#[derive(Debug, Clone)]
pub struct ScoredFood {
    pub food: Food,
    pub score: f64,
}

/// Grams of a macro per 100 kcal. Zero-calorie foods have zero density.
fn density(grams: f64, calories: f64) -> f64 {
    if calories <= 0.0 {
        return 0.0;
    }
    grams / (calories / 100.0)
}

/// 1.0 while the candidate fits within 20% slack of the remaining calories,
/// then a linear decay toward zero as the overshoot grows. The `+ 1`
/// keeps the decay defined when the remaining budget is exhausted.
fn calorie_fit(calories: f64, remaining: f64) -> f64 {
    let ceiling = remaining * 1.2;
    if calories <= ceiling {
        return 1.0;
    }
    (1.0 - (calories - ceiling) / (remaining + 1.0)).max(0.0)
}

/// How much of the remaining budget for one macro this candidate covers,
/// capped at 1. The denominator floor keeps tiny remainders from inflating
/// the component; with no remaining budget the component is a flat 0.3.
fn macro_fit(grams: f64, remaining: f64, floor: f64) -> f64 {
    if remaining <= 0.0 {
        return 0.3;
    }
    (grams / remaining.max(floor)).min(1.0)
}

/// Oversized single items relative to the remaining budget are dropped
/// before scoring.
fn calorie_cutoff(remaining: f64) -> f64 {
    150.0_f64.max(remaining + 250.0)
}

/// Scores a candidate pool against the remaining budget. Protein dominates
/// the weighting; fat is only rewarded under a gain goal; the jitter term
/// diversifies repeated calls over an identical pool.
pub fn score_pool(
    pool: Vec<Food>,
    budget: &MacroBudget,
    goal: Goal,
    rng: &mut impl Rng,
) -> Vec<ScoredFood> {
    let cutoff = calorie_cutoff(budget.calories);
    let fat_weight = goal.fat_weight();

    pool.into_iter()
        .filter(|food| food.calories <= cutoff)
        .map(|food| {
            let protein_density = density(food.protein, food.calories);
            let carb_density = density(food.carbs, food.calories);
            let fat_density = density(food.fat, food.calories);

            let cal_fit = calorie_fit(food.calories, budget.calories);
            let protein_fit = macro_fit(food.protein, budget.protein, 10.0);
            let carb_fit = macro_fit(food.carbs, budget.carbs, 20.0);
            let fat_fit = macro_fit(food.fat, budget.fat, 10.0);

            let jitter = rng.gen_range(0.0..0.25);
            let score = protein_density * 1.5
                + protein_fit
                + carb_density * 0.6
                + carb_fit * 0.5
                + (1.0 - fat_density) * fat_weight
                + fat_fit * (fat_weight / 2.0)
                + cal_fit
                + jitter;

            ScoredFood { food, score }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foods::repo::test_support::food;
    use crate::recommend::budget::test_support::budget;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn zero_calorie_food_has_zero_densities_and_finite_score() {
        assert_eq!(density(10.0, 0.0), 0.0);

        let scored = score_pool(
            vec![food("water", 0.0, 0.0, 0.0, 0.0)],
            &budget(2000.0, 150.0, 250.0, 70.0),
            Goal::Maintain,
            &mut rng(),
        );
        assert_eq!(scored.len(), 1);
        assert!(scored[0].score.is_finite());
    }

    #[test]
    fn oversized_candidates_are_dropped_before_scoring() {
        let b = budget(100.0, 50.0, 50.0, 20.0);
        // cutoff = max(150, 100 + 250) = 350
        let scored = score_pool(
            vec![
                food("ok", 350.0, 20.0, 30.0, 10.0),
                food("too big", 351.0, 20.0, 30.0, 10.0),
            ],
            &b,
            Goal::Maintain,
            &mut rng(),
        );
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].food.name, "ok");
    }

    #[test]
    fn cutoff_floor_applies_when_budget_is_exhausted() {
        // remaining 0 -> cutoff = max(150, 250) = 250
        let scored = score_pool(
            vec![food("small", 150.0, 5.0, 20.0, 2.0), food("big", 300.0, 5.0, 20.0, 2.0)],
            &budget(0.0, 0.0, 0.0, 0.0),
            Goal::Maintain,
            &mut rng(),
        );
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].food.name, "small");
    }

    #[test]
    fn calorie_fit_is_one_within_slack_and_decays_beyond() {
        assert_eq!(calorie_fit(1000.0, 1000.0), 1.0);
        assert_eq!(calorie_fit(1200.0, 1000.0), 1.0);
        let just_over = calorie_fit(1300.0, 1000.0);
        assert!(just_over < 1.0 && just_over > 0.0);
        let far_over = calorie_fit(3000.0, 1000.0);
        assert!(far_over < just_over);
        // Fully decayed overshoots clamp at zero
        assert_eq!(calorie_fit(10_000.0, 100.0), 0.0);
        // Exhausted budget does not divide by zero
        assert!(calorie_fit(200.0, 0.0).is_finite());
    }

    #[test]
    fn macro_fit_uses_floor_and_exhausted_fallback() {
        // Tiny remainder: denominator floors at 10, so 5g covers half
        assert_eq!(macro_fit(5.0, 2.0, 10.0), 0.5);
        // Normal case caps at 1
        assert_eq!(macro_fit(80.0, 40.0, 10.0), 1.0);
        // No remaining budget: flat 0.3
        assert_eq!(macro_fit(30.0, 0.0, 10.0), 0.3);
    }

    #[test]
    fn identical_seed_gives_identical_scores() {
        let pool = vec![
            food("a", 200.0, 20.0, 10.0, 5.0),
            food("b", 300.0, 10.0, 40.0, 8.0),
        ];
        let b = budget(1800.0, 120.0, 200.0, 60.0);
        let first = score_pool(pool.clone(), &b, Goal::Maintain, &mut rng());
        let second = score_pool(pool, &b, Goal::Maintain, &mut rng());
        for (x, y) in first.iter().zip(&second) {
            assert_eq!(x.score, y.score);
        }
    }

    #[test]
    fn lose_and_gain_rank_fatty_foods_differently() {
        // Same calories; one lean and protein-heavy, one fat-heavy.
        let lean = food("chicken breast", 200.0, 40.0, 0.0, 4.0);
        let fatty = food("cheese", 200.0, 12.0, 2.0, 17.0);
        let b = budget(1500.0, 100.0, 180.0, 50.0);

        // Strip jitter out of the comparison by averaging over seeds
        let mean_gap = |goal: Goal| -> f64 {
            (0..32)
                .map(|seed| {
                    let mut r = StdRng::seed_from_u64(seed);
                    let scored =
                        score_pool(vec![lean.clone(), fatty.clone()], &b, goal, &mut r);
                    scored[0].score - scored[1].score
                })
                .sum::<f64>()
                / 32.0
        };

        let lose_gap = mean_gap(Goal::Lose);
        let gain_gap = mean_gap(Goal::Gain);
        // Both foods sit above 1g fat per 100 kcal, so (1 - fatDensity) is
        // negative for each and a larger fatWeight widens the lean food's
        // lead. The margin must move with the goal mode.
        assert!((gain_gap - lose_gap).abs() > 0.5);
        assert!(gain_gap > lose_gap);
    }
}
