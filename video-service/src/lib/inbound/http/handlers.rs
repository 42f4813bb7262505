use auth::TokenPair;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::request_id::RequestId;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod get_user;
pub mod list_users;
pub mod login;
pub mod me;
pub mod refresh;
pub mod signup;

/// Handler name reported in error bodies of the user routes.
pub const USER_HANDLER: &str = "user";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

/// Error response: a status plus the `{id, handler, publicMessage}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    data: ApiErrorData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorData {
    pub id: String,
    pub handler: String,
    pub public_message: String,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        request_id: &RequestId,
        handler: &str,
        public_message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            data: ApiErrorData {
                id: request_id.to_string(),
                handler: handler.to_string(),
                public_message: public_message.into(),
            },
        }
    }

    /// Map a user domain error, hiding infrastructure details from the caller.
    pub fn from_user_error(err: UserError, request_id: &RequestId, handler: &str) -> Self {
        let status = match &err {
            UserError::InvalidUserId(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_) => StatusCode::BAD_REQUEST,
            UserError::NotFound(_) => StatusCode::NOT_FOUND,
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                StatusCode::CONFLICT
            }
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::Password(_) | UserError::DatabaseError(_) => {
                tracing::error!(request_id = %request_id, error = %err, "User operation failed");
                return Self::internal(request_id, handler);
            }
        };

        Self::new(status, request_id, handler, err.to_string())
    }

    pub fn from_json_rejection(
        rejection: JsonRejection,
        request_id: &RequestId,
        handler: &str,
    ) -> Self {
        tracing::debug!(request_id = %request_id, error = %rejection, "Unreadable request body");
        Self::new(
            StatusCode::BAD_REQUEST,
            request_id,
            handler,
            "Invalid request body",
        )
    }

    pub fn internal(request_id: &RequestId, handler: &str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            request_id,
            handler,
            "Internal server error",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.data)).into_response()
    }
}

/// Public view of a user; never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expiry: DateTime<Utc>,
    pub refresh_token_expiry: DateTime<Utc>,
}

impl From<TokenPair> for TokenData {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access.token,
            refresh_token: pair.refresh.token,
            access_token_expiry: pair.access.expires_at,
            refresh_token_expiry: pair.refresh.expires_at,
        }
    }
}

/// Body returned by signup and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub user: UserData,
    pub token: TokenData,
}
