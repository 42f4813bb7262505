use std::sync::Arc;

use auth::TokenCodec;
use auth::TokenIssuer;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use video_service::config::Config;
use video_service::domain::access::gate::AuthGate;
use video_service::domain::user::service::UserService;
use video_service::inbound::http::router::create_router;
use video_service::outbound::repositories::PostgresUserRepository;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "video-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        access_token_expiry_minutes = config.jwt.access_token_expiry_minutes,
        refresh_token_expiry_hours = config.jwt.refresh_token_expiry_hours,
        "Configuration loaded"
    );

    let signing = config.jwt.signing_config().map_err(|e| {
        tracing::error!(error = %e, "Invalid JWT configuration");
        e
    })?;
    let lifetimes = config.jwt.token_lifetimes()?;

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let codec = Arc::new(TokenCodec::new(signing));
    let token_issuer = Arc::new(TokenIssuer::new(Arc::clone(&codec), lifetimes));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(UserService::new(user_repository));
    let auth_gate = Arc::new(AuthGate::new(codec, user_service.clone()));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, token_issuer, auth_gate);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
