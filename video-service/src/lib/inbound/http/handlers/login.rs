use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use super::USER_HANDLER;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::request_id::RequestId;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::Username;

pub async fn login(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::from_json_rejection(e, &request_id, USER_HANDLER))?;

    // A username that could never have been registered is just a failed login.
    let username = Username::new(body.username).map_err(|_| {
        ApiError::from_user_error(UserError::InvalidCredentials, &request_id, USER_HANDLER)
    })?;

    let user = state
        .user_service
        .authenticate(&username, &body.password)
        .await
        .map_err(|e| ApiError::from_user_error(e, &request_id, USER_HANDLER))?;

    let principal = auth::Principal::from(&user);
    let tokens = state
        .token_issuer
        .issue_pair(&principal, Utc::now())
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Token issuance failed");
            ApiError::internal(&request_id, USER_HANDLER)
        })?;

    tracing::info!(request_id = %request_id, user_id = %user.id, "User logged in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            user: (&user).into(),
            token: tokens.into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}
