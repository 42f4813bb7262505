use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use super::USER_HANDLER;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::request_id::RequestId;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn get_user(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&user_id)
        .map_err(|e| ApiError::from_user_error(UserError::from(e), &request_id, USER_HANDLER))?;

    state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(|e| ApiError::from_user_error(e, &request_id, USER_HANDLER))
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
