//! Registration and login

use axum::{extract::State, http::StatusCode, Json};
use pathwise_common::db::{self, NewUser};
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = db::register(&state.db, &new_user).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            username: user.username,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = db::verify_credentials(&state.db, &request.username, &request.password).await?;
    Ok(Json(UserResponse {
        username: user.username,
    }))
}
