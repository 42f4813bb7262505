use std::sync::Arc;
use std::time::Duration;

use auth::TokenIssuer;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::signup::signup;
use super::middleware::authenticate;
use super::middleware::authenticate_admin;
use super::request_id::request_id;
use super::request_id::RequestId;
use crate::domain::access::gate::AuthGate;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub token_issuer: Arc<TokenIssuer>,
    pub auth_gate: Arc<AuthGate>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    token_issuer: Arc<TokenIssuer>,
    auth_gate: Arc<AuthGate>,
) -> Router {
    let state = AppState {
        user_service,
        token_issuer,
        auth_gate,
    };

    let public_routes = Router::new()
        .route("/api/user/signup", post(signup))
        .route("/api/user/login", post(login))
        .route("/api/user/refresh", post(refresh));

    let user_routes = Router::new()
        .route("/api/user/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let admin_routes = Router::new()
        .route("/api/user/all", get(list_users))
        .route("/api/user/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_admin,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .extensions()
                .get::<RequestId>()
                .map(ToString::to_string)
                .unwrap_or_default();
            tracing::info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(middleware::from_fn(request_id))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
