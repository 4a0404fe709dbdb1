use serde::Serialize;

use crate::auth::repo::User;
use crate::plans::PlanDay;

/// What is left of the user's daily goals after the day's logged meals.
/// Computed fresh per request, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroBudget {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

fn floor_zero(goal: Option<f64>, logged: f64) -> f64 {
    (goal.unwrap_or(0.0) - logged).max(0.0)
}

/// Remaining budget for a day. Unset goals count as zero, and every field is
/// floored at zero even when logged totals exceed the goal.
pub fn remaining_budget(user: &User, plan: &PlanDay) -> MacroBudget {
    MacroBudget {
        calories: floor_zero(user.daily_calorie_goal, plan.total_calories),
        protein: floor_zero(user.daily_protein_goal, plan.total_protein),
        carbs: floor_zero(user.daily_carbs_goal, plan.total_carbs),
        fat: floor_zero(user.daily_fat_goal, plan.total_fat),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::MacroBudget;

    pub fn budget(calories: f64, protein: f64, carbs: f64, fat: f64) -> MacroBudget {
        MacroBudget {
            calories,
            protein,
            carbs,
            fat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_goal_minus_logged() {
        assert_eq!(floor_zero(Some(2000.0), 450.0), 1550.0);
        assert_eq!(floor_zero(Some(150.0), 30.5), 119.5);
    }

    #[test]
    fn budget_never_goes_negative() {
        // Logged totals above the goal floor at zero
        assert_eq!(floor_zero(Some(2000.0), 2600.0), 0.0);
        assert_eq!(floor_zero(Some(0.0), 100.0), 0.0);
    }

    #[test]
    fn unset_goals_resolve_to_zero_budget() {
        assert_eq!(floor_zero(None, 0.0), 0.0);
        assert_eq!(floor_zero(None, 500.0), 0.0);
    }
}
