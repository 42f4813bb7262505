use auth::IssuedToken;
use auth::JwtError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::USER_HANDLER;
use crate::inbound::http::request_id::RequestId;
use crate::inbound::http::router::AppState;

/// Exchange a refresh token for a new access token.
///
/// The user store is not consulted; the new token copies the refresh
/// token's subject and admin flag.
pub async fn refresh(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::from_json_rejection(e, &request_id, USER_HANDLER))?;

    state
        .token_issuer
        .refresh_access_token(&body.refresh_token, Utc::now())
        .map(|token| ApiSuccess::new(StatusCode::OK, token.into()))
        .map_err(|e| match e {
            JwtError::EncodingFailed(_) | JwtError::SigningKeyMisconfigured(_) => {
                tracing::error!(request_id = %request_id, error = %e, "Token issuance failed");
                ApiError::internal(&request_id, USER_HANDLER)
            }
            _ => {
                if e.is_expired() {
                    tracing::debug!(request_id = %request_id, "Refresh token expired");
                } else {
                    tracing::warn!(request_id = %request_id, reason = %e, "Refresh token rejected");
                }
                ApiError::new(
                    StatusCode::UNAUTHORIZED,
                    &request_id,
                    USER_HANDLER,
                    "refresh token is invalid/expired",
                )
            }
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshRequest {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub access_token: String,
    pub access_token_expiry: DateTime<Utc>,
}

impl From<IssuedToken> for RefreshResponseData {
    fn from(token: IssuedToken) -> Self {
        Self {
            access_token: token.token,
            access_token_expiry: token.expires_at,
        }
    }
}
