use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use super::USER_HANDLER;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::request_id::RequestId;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    request_id: RequestId,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    state
        .user_service
        .list_users()
        .await
        .map_err(|e| ApiError::from_user_error(e, &request_id, USER_HANDLER))
        .map(|users| ApiSuccess::new(StatusCode::OK, users.iter().map(UserData::from).collect()))
}
