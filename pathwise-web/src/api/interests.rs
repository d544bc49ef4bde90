//! Interest selection and validation

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct InterestsResponse {
    pub primary_interests: Vec<String>,
}

/// GET /api/interests
///
/// Primary interests in table order.
pub async fn list_interests(State(state): State<AppState>) -> Json<InterestsResponse> {
    Json(InterestsResponse {
        primary_interests: state.service.table().primaries().map(str::to_string).collect(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SelectInterestRequest {
    #[serde(alias = "primary_interest")]
    pub interest1: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectInterestResponse {
    pub interest1: String,
    pub second_interests: Vec<String>,
}

/// POST /api/select-interest
///
/// Returns the allowed second interests in a fresh random order.
pub async fn select_interest(
    State(state): State<AppState>,
    Json(request): Json<SelectInterestRequest>,
) -> Result<Json<SelectInterestResponse>, ApiError> {
    let interest1 = request
        .interest1
        .filter(|i| state.service.table().contains_primary(i))
        .ok_or_else(|| ApiError::BadRequest("Unknown first interest.".to_string()))?;

    let second_interests = state.service.candidates(&interest1, &mut rand::thread_rng());
    debug!("Offering {:?} for {}", second_interests, interest1);

    Ok(Json(SelectInterestResponse {
        interest1,
        second_interests,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ValidateInterestRequest {
    #[serde(alias = "primary_interest")]
    pub interest1: Option<String>,
    #[serde(alias = "secondary_interest")]
    pub interest2: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateInterestResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidateInterestResponse {
    fn invalid(message: &str) -> (StatusCode, Json<Self>) {
        (
            StatusCode::BAD_REQUEST,
            Json(Self {
                valid: false,
                message: Some(message.to_string()),
            }),
        )
    }
}

/// POST /api/validate-interest
pub async fn validate_interest(
    State(state): State<AppState>,
    Json(request): Json<ValidateInterestRequest>,
) -> (StatusCode, Json<ValidateInterestResponse>) {
    let (Some(interest1), Some(interest2)) = (
        request.interest1.filter(|s| !s.is_empty()),
        request.interest2.filter(|s| !s.is_empty()),
    ) else {
        return ValidateInterestResponse::invalid("Both interests are required.");
    };

    if !state.service.table().is_allowed(&interest1, &interest2) {
        return ValidateInterestResponse::invalid("Invalid second interest selected.");
    }

    (
        StatusCode::OK,
        Json(ValidateInterestResponse {
            valid: true,
            message: None,
        }),
    )
}
