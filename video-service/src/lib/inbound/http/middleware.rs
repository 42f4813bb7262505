use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use chrono::Utc;

use super::handlers::ApiError;
use super::request_id::RequestId;
use crate::domain::access::errors::GateRejection;
use crate::domain::access::models::Access;
use crate::inbound::http::router::AppState;

/// Handler name reported in error bodies produced by the auth gate.
pub const GATE_HANDLER: &str = "middleware";

/// Response header echoing the token's admin snapshot.
pub const IS_ADMIN_HEADER: &str = "is_admin";

/// Admit any caller holding a valid access token for an existing user.
pub async fn authenticate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    guard(state, req, next, Access::Authenticated).await
}

/// Like [`authenticate`], and the user must currently be an admin.
pub async fn authenticate_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    guard(state, req, next, Access::AdminOnly).await
}

async fn guard(state: AppState, mut req: Request, next: Next, access: Access) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .cloned()
        .unwrap_or_else(RequestId::generate);

    let authorization = match req.headers().get(AUTHORIZATION).map(HeaderValue::to_str) {
        None => None,
        Some(Ok(value)) => Some(value.to_string()),
        Some(Err(_)) => return reject(&request_id, GateRejection::MalformedHeader),
    };

    let context = match state
        .auth_gate
        .admit(authorization.as_deref(), access, Utc::now())
        .await
    {
        Ok(context) => context,
        Err(rejection) => return reject(&request_id, rejection),
    };

    tracing::debug!(
        request_id = %request_id,
        user_id = %context.principal_id,
        is_admin = context.is_admin,
        "Request admitted"
    );

    req.extensions_mut().insert(context);
    let mut response = next.run(req).await;
    response.headers_mut().insert(
        HeaderName::from_static(IS_ADMIN_HEADER),
        HeaderValue::from_static(if context.is_admin { "true" } else { "false" }),
    );
    response
}

fn reject(request_id: &RequestId, rejection: GateRejection) -> Response {
    let status = rejection_status(&rejection);

    tracing::warn!(
        request_id = %request_id,
        status = status.as_u16(),
        reason = %rejection,
        "Request rejected by auth gate"
    );

    ApiError::new(status, request_id, GATE_HANDLER, rejection.public_message()).into_response()
}

fn rejection_status(rejection: &GateRejection) -> StatusCode {
    match rejection {
        GateRejection::TokenMissing
        | GateRejection::MalformedHeader
        | GateRejection::InvalidToken(_) => StatusCode::UNAUTHORIZED,
        GateRejection::InvalidSubject(_) => StatusCode::BAD_REQUEST,
        GateRejection::PrincipalNotFound { .. } => StatusCode::NOT_FOUND,
        GateRejection::InsufficientPrivilege(_) => StatusCode::FORBIDDEN,
    }
}
