use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use super::USER_HANDLER;
use crate::domain::access::models::AuthContext;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::request_id::RequestId;
use crate::inbound::http::router::AppState;

pub async fn me(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    request_id: RequestId,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .get_user(&context.principal_id)
        .await
        .map_err(|e| ApiError::from_user_error(e, &request_id, USER_HANDLER))
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
