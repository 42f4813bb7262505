use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use super::USER_HANDLER;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::request_id::RequestId;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UsernameError;

pub async fn signup(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::from_json_rejection(e, &request_id, USER_HANDLER))?;

    let command = body.try_into_command().map_err(|e| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            &request_id,
            USER_HANDLER,
            e.to_string(),
        )
    })?;

    let user = state
        .user_service
        .create_user(command)
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

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        SessionResponseData {
            user: (&user).into(),
            token: tokens.into(),
        },
    ))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseSignupRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl SignupRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseSignupRequestError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(CreateUserCommand::new(username, email, password))
    }
}
