//! Recommendation result endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    #[serde(alias = "primary_interest")]
    pub interest1: Option<String>,
    #[serde(alias = "secondary_interest")]
    pub interest2: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Suggestions {
    pub suggested_field: String,
    pub degree_options: String,
    pub career_paths: String,
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub interest1: String,
    pub interest2: String,
    pub suggestions: Suggestions,
    pub degraded: bool,
}

/// GET /api/result?interest1=..&interest2=..
///
/// `primary_interest`/`secondary_interest` are accepted as the same inputs.
/// Invalid pairs are rejected with 400; prediction failures come back as the
/// placeholder suggestions with `degraded: true`.
pub async fn get_result(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> Result<Json<ResultResponse>, ApiError> {
    let (Some(interest1), Some(interest2)) = (query.interest1, query.interest2) else {
        return Err(ApiError::BadRequest("Both interests are required.".to_string()));
    };

    let recommendation = state.service.recommend(&interest1, &interest2)?;

    Ok(Json(ResultResponse {
        interest1,
        interest2,
        suggestions: Suggestions {
            suggested_field: recommendation.suggested_field,
            degree_options: recommendation.degree_options,
            career_paths: recommendation.career_paths,
        },
        degraded: recommendation.degraded,
    }))
}
