use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Principal;
use auth::SigningConfig;
use auth::TokenCodec;
use auth::TokenIssuer;
use auth::TokenKind;
use auth::TokenLifetimes;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use video_service::domain::access::gate::AuthGate;
use video_service::domain::user::models::EmailAddress;
use video_service::domain::user::models::User;
use video_service::domain::user::models::UserId;
use video_service::domain::user::models::Username;
use video_service::domain::user::ports::UserRepository;
use video_service::domain::user::service::UserService;
use video_service::inbound::http::router::create_router;
use video_service::user::errors::UserError;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "pass_word!";

/// Test application that spawns a real server over an in-memory user store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub users: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub codec: Arc<TokenCodec>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let signing = SigningConfig::new("HS256", TEST_SECRET).expect("Invalid signing config");
        let codec = Arc::new(TokenCodec::new(signing));
        let lifetimes = TokenLifetimes::new(Duration::minutes(10), Duration::hours(24))
            .expect("Invalid token lifetimes");
        let token_issuer = Arc::new(TokenIssuer::new(Arc::clone(&codec), lifetimes));

        let users = Arc::new(InMemoryUserRepository::default());
        let user_service = Arc::new(UserService::new(Arc::clone(&users)));
        let auth_gate = Arc::new(AuthGate::new(Arc::clone(&codec), user_service.clone()));

        let router = create_router(user_service, token_issuer, auth_gate);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            users,
            api_client: reqwest::Client::new(),
            codec,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register through the API and return the response body
    pub async fn signup(&self, username: &str, email: &str) -> serde_json::Value {
        let response = self
            .post("/api/user/signup")
            .json(&json!({
                "username": username,
                "email": email,
                "password": TEST_PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        response.json().await.expect("Failed to parse response")
    }

    /// Register through the API and return the access token
    pub async fn signup_access_token(&self, username: &str, email: &str) -> String {
        let body = self.signup(username, email).await;
        body["data"]["token"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }

    /// Insert an admin directly into the store; signup never grants the role
    pub fn seed_admin(&self, username: &str, email: &str) -> User {
        self.users.seed(username, email, TEST_PASSWORD, true)
    }

    /// Sign an access token for an arbitrary subject
    pub fn access_token_for(&self, subject: &str, is_admin: bool) -> String {
        self.codec
            .encode(
                &Principal::new(subject, is_admin),
                TokenKind::Access,
                Duration::minutes(10),
                Utc::now(),
            )
            .expect("Failed to encode token")
    }

    pub fn access_token_for_user(&self, user: &User) -> String {
        self.access_token_for(&user.id.to_string(), user.is_admin)
    }
}

/// User store kept in memory so the HTTP tests need no database
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn seed(&self, username: &str, email: &str, password: &str, is_admin: bool) -> User {
        let user = User {
            id: UserId::new(),
            username: Username::new(username.to_string()).expect("Invalid username"),
            email: EmailAddress::new(email.to_string()).expect("Invalid email"),
            password_hash: auth::PasswordHasher::new()
                .hash(password)
                .expect("Failed to hash password"),
            is_admin,
            created_at: Utc::now(),
        };

        self.users.lock().unwrap().insert(user.id, user.clone());
        user
    }

    pub fn set_admin(&self, id: &UserId, is_admin: bool) {
        if let Some(user) = self.users.lock().unwrap().get_mut(id) {
            user.is_admin = is_admin;
        }
    }

    pub fn remove(&self, id: &UserId) {
        self.users.lock().unwrap().remove(id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }
}
