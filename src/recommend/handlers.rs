use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use rand::{rngs::StdRng, SeedableRng};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{repo::User, AuthUser},
    error::ApiError,
    foods::PoolFilter,
    plans::{dto::parse_date, PlanDay},
    state::AppState,
};

use super::dto::{GenerateRequest, GenerateSummary, RecommendQuery, RecommendResponse};
use super::generator::{generate_plan, Span};
use super::service::recommend_for_day;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/recommendations", get(recommendations))
        .route("/users/:user_id/plans/generate", post(generate))
}

/// Both endpoints act on the target user's own data: a caller may only
/// request for their own id.
async fn authorize_target(
    state: &AppState,
    caller: Uuid,
    target: Uuid,
) -> Result<User, ApiError> {
    if caller != target {
        return Err(ApiError::Forbidden);
    }
    User::find_by_id(&state.db, target)
        .await?
        .ok_or(ApiError::NotFound("user"))
}

fn parse_sources(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?;
    let sources: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!sources.is_empty()).then_some(sources)
}

#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let user = authorize_target(&state, caller, user_id).await?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ApiError::Invalid(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    if let Some(meal_type) = query.meal_type.as_deref() {
        if !matches!(meal_type, "breakfast" | "lunch" | "dinner" | "snacks") {
            return Err(ApiError::Invalid(format!("unknown meal type: {meal_type}")));
        }
    }

    let date = match query.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => OffsetDateTime::now_utc().date(),
    };

    let filter = PoolFilter {
        sources: parse_sources(query.sources.as_deref()),
        verified_only: query.verified_only.unwrap_or(false),
        meal_type: query.meal_type.clone(),
    };

    // StdRng rather than thread_rng: the rng is held across awaits and the
    // handler future must stay Send
    let mut rng = StdRng::from_entropy();
    let plan = PlanDay::get_or_create(&state.db, user.id, date).await?;
    let rec = recommend_for_day(&state.db, &user, &plan, limit, &filter, &mut rng).await?;

    Ok(Json(RecommendResponse {
        budget: rec.budget,
        foods: rec.foods,
    }))
}

#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateSummary>, ApiError> {
    let user = authorize_target(&state, caller, user_id).await?;

    let start = payload
        .start_date
        .as_deref()
        .ok_or_else(|| ApiError::Invalid("start_date is required".into()))
        .and_then(parse_date)?;
    let span = payload.span.unwrap_or(Span::Daily);

    let filter = PoolFilter {
        sources: payload.sources.clone(),
        verified_only: false,
        meal_type: None,
    };

    let mut rng = StdRng::from_entropy();
    let summary = generate_plan(&state.db, &user, start, span, &filter, &mut rng).await?;

    Ok(Json(summary))
}
