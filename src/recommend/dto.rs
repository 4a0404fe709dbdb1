use serde::{Deserialize, Serialize};

use crate::foods::Food;

use super::budget::MacroBudget;
use super::generator::Span;

/// Query parameters for GET /users/:user_id/recommendations.
#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    /// Target day, `YYYY-MM-DD`. Defaults to today (UTC).
    pub date: Option<String>,
    pub limit: Option<usize>,
    /// Comma-separated source allowlist, e.g. `usda,custom`.
    pub sources: Option<String>,
    pub meal_type: Option<String>,
    pub verified_only: Option<bool>,
}

/// Selected foods plus the budget they were scored against.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub budget: MacroBudget,
    pub foods: Vec<Food>,
}

/// Request body for POST /users/:user_id/plans/generate.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub start_date: Option<String>,
    pub span: Option<Span>,
    pub sources: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub items_added: usize,
}

#[derive(Debug, Serialize)]
pub struct GenerateSummary {
    pub days_generated: usize,
    pub days: Vec<DaySummary>,
}
