use std::sync::Arc;

use auth::TokenCodec;
use auth::TokenKind;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::access::errors::GateRejection;
use crate::domain::access::models::Access;
use crate::domain::access::models::AuthContext;
use crate::domain::user::models::UserId;
use crate::user::ports::UserLookup;

const BEARER_PREFIX: &str = "Bearer ";

/// Per-request gatekeeper for protected routes.
///
/// Holds only the codec and the user lookup, both shared read-only, so one
/// gate serves every request concurrently.
pub struct AuthGate {
    codec: Arc<TokenCodec>,
    lookup: Arc<dyn UserLookup>,
}

impl AuthGate {
    pub fn new(codec: Arc<TokenCodec>, lookup: Arc<dyn UserLookup>) -> Self {
        Self { codec, lookup }
    }

    /// Decide whether a request may proceed.
    ///
    /// # Arguments
    /// * `authorization` - Raw `Authorization` header value, if any
    /// * `access` - What the route requires
    /// * `now` - Instant the token expiry is checked against
    ///
    /// # Returns
    /// The admitted identity
    ///
    /// # Errors
    /// * `TokenMissing` - No header, or an empty one
    /// * `MalformedHeader` - Not of the form `Bearer <token>`
    /// * `InvalidToken` - Token malformed, badly signed, expired or not an access token
    /// * `InvalidSubject` - Token subject is not a user ID
    /// * `PrincipalNotFound` - No such user, or the lookup failed
    /// * `InsufficientPrivilege` - Route is admin-only and the user is not an admin
    pub async fn admit(
        &self,
        authorization: Option<&str>,
        access: Access,
        now: DateTime<Utc>,
    ) -> Result<AuthContext, GateRejection> {
        let token = extract_bearer_token(authorization)?;

        let claims = self
            .codec
            .decode_expecting(token, TokenKind::Access, now)?;

        let user_id = UserId::from_string(&claims.sub)?;

        let user = match self.lookup.lookup_user(&user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return Err(GateRejection::PrincipalNotFound {
                    subject: claims.sub,
                    cause: None,
                })
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "User lookup failed");
                return Err(GateRejection::PrincipalNotFound {
                    subject: claims.sub,
                    cause: Some(e),
                });
            }
        };

        // Checked against the store, not the token, so a demoted admin is
        // refused here even while holding an admin token.
        if access.requires_admin() && !user.is_admin {
            return Err(GateRejection::InsufficientPrivilege(user_id.to_string()));
        }

        Ok(AuthContext {
            principal_id: user_id,
            is_admin: claims.is_admin,
        })
    }
}

fn extract_bearer_token(authorization: Option<&str>) -> Result<&str, GateRejection> {
    let header = match authorization {
        None | Some("") => return Err(GateRejection::TokenMissing),
        Some(header) => header,
    };

    header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(GateRejection::MalformedHeader)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth::JwtError;
    use auth::Principal;
    use auth::SigningConfig;
    use chrono::Duration;
    use chrono::TimeZone;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::User;
    use crate::domain::user::models::Username;
    use crate::user::errors::UserError;

    mock! {
        pub TestUserLookup {}

        #[async_trait]
        impl UserLookup for TestUserLookup {
            async fn lookup_user(&self, id: &UserId) -> Result<Option<User>, UserError>;
        }
    }

    fn codec() -> Arc<TokenCodec> {
        let signing = SigningConfig::new("HS256", b"test_secret_key_at_least_32_bytes!").unwrap();
        Arc::new(TokenCodec::new(signing))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn user(id: UserId, is_admin: bool) -> User {
        User {
            id,
            username: Username::new("nicola".to_string()).unwrap(),
            email: EmailAddress::new("nicola@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$unused".to_string(),
            is_admin,
            created_at: now(),
        }
    }

    fn bearer(codec: &TokenCodec, subject: &str, is_admin: bool, kind: TokenKind) -> String {
        let token = codec
            .encode(&Principal::new(subject, is_admin), kind, Duration::minutes(10), now())
            .unwrap();
        format!("Bearer {}", token)
    }

    fn lookup_returning(user: Option<User>) -> MockTestUserLookup {
        let mut lookup = MockTestUserLookup::new();
        lookup
            .expect_lookup_user()
            .times(1)
            .returning(move |_| Ok(user.clone()));
        lookup
    }

    fn untouched_lookup() -> MockTestUserLookup {
        let mut lookup = MockTestUserLookup::new();
        lookup.expect_lookup_user().times(0);
        lookup
    }

    #[tokio::test]
    async fn test_admits_existing_user() {
        let codec = codec();
        let id = UserId::new();
        let header = bearer(&codec, &id.to_string(), false, TokenKind::Access);

        let mut lookup = MockTestUserLookup::new();
        let stored = user(id, false);
        lookup
            .expect_lookup_user()
            .with(eq(id))
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let gate = AuthGate::new(codec, Arc::new(lookup));
        let context = gate
            .admit(Some(&header), Access::Authenticated, now())
            .await
            .unwrap();

        assert_eq!(
            context,
            AuthContext {
                principal_id: id,
                is_admin: false
            }
        );
    }

    #[tokio::test]
    async fn test_missing_header() {
        let gate = AuthGate::new(codec(), Arc::new(untouched_lookup()));

        for header in [None, Some("")] {
            let result = gate.admit(header, Access::Authenticated, now()).await;
            assert!(matches!(result, Err(GateRejection::TokenMissing)));
        }
    }

    #[tokio::test]
    async fn test_header_without_bearer_prefix() {
        let codec = codec();
        let header = bearer(&codec, &UserId::new().to_string(), false, TokenKind::Access);
        let raw_token = header.trim_start_matches("Bearer ").to_string();
        let gate = AuthGate::new(codec, Arc::new(untouched_lookup()));

        for header in [raw_token.clone(), format!("Basic {}", raw_token), format!("bearer {}", raw_token)] {
            let result = gate.admit(Some(&header), Access::Authenticated, now()).await;
            assert!(matches!(result, Err(GateRejection::MalformedHeader)));
        }
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let gate = AuthGate::new(codec(), Arc::new(untouched_lookup()));

        let result = gate
            .admit(Some("Bearer garbage"), Access::Authenticated, now())
            .await;
        assert!(matches!(
            result,
            Err(GateRejection::InvalidToken(JwtError::Malformed(_)))
        ));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let codec = codec();
        let header = bearer(&codec, &UserId::new().to_string(), false, TokenKind::Access);
        let gate = AuthGate::new(codec, Arc::new(untouched_lookup()));

        let result = gate
            .admit(Some(&header), Access::Authenticated, now() + Duration::minutes(11))
            .await;
        assert!(matches!(
            result,
            Err(GateRejection::InvalidToken(JwtError::Expired))
        ));
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let codec = codec();
        let header = bearer(&codec, &UserId::new().to_string(), false, TokenKind::Refresh);
        let gate = AuthGate::new(codec, Arc::new(untouched_lookup()));

        let result = gate.admit(Some(&header), Access::Authenticated, now()).await;
        assert!(matches!(
            result,
            Err(GateRejection::InvalidToken(JwtError::WrongKind { .. }))
        ));
    }

    #[tokio::test]
    async fn test_subject_must_be_user_id() {
        let codec = codec();
        let header = bearer(&codec, "u1", false, TokenKind::Access);
        let gate = AuthGate::new(codec, Arc::new(untouched_lookup()));

        let result = gate.admit(Some(&header), Access::Authenticated, now()).await;
        assert!(matches!(result, Err(GateRejection::InvalidSubject(_))));
    }

    #[tokio::test]
    async fn test_unknown_subject() {
        let codec = codec();
        let header = bearer(&codec, &UserId::new().to_string(), false, TokenKind::Access);
        let gate = AuthGate::new(codec, Arc::new(lookup_returning(None)));

        let result = gate.admit(Some(&header), Access::Authenticated, now()).await;
        assert!(matches!(
            result,
            Err(GateRejection::PrincipalNotFound { cause: None, .. })
        ));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_found() {
        let codec = codec();
        let header = bearer(&codec, &UserId::new().to_string(), false, TokenKind::Access);

        let mut lookup = MockTestUserLookup::new();
        lookup
            .expect_lookup_user()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let gate = AuthGate::new(codec, Arc::new(lookup));

        let result = gate.admit(Some(&header), Access::Authenticated, now()).await;
        assert!(matches!(
            result,
            Err(GateRejection::PrincipalNotFound { cause: Some(_), .. })
        ));
    }

    #[tokio::test]
    async fn test_non_admin_on_admin_route() {
        let codec = codec();
        let id = UserId::new();
        let header = bearer(&codec, &id.to_string(), false, TokenKind::Access);
        let gate = AuthGate::new(codec, Arc::new(lookup_returning(Some(user(id, false)))));

        let result = gate.admit(Some(&header), Access::AdminOnly, now()).await;
        assert!(matches!(result, Err(GateRejection::InsufficientPrivilege(_))));
    }

    #[tokio::test]
    async fn test_admin_on_admin_route() {
        let codec = codec();
        let id = UserId::new();
        let header = bearer(&codec, &id.to_string(), true, TokenKind::Access);
        let gate = AuthGate::new(codec, Arc::new(lookup_returning(Some(user(id, true)))));

        let context = gate
            .admit(Some(&header), Access::AdminOnly, now())
            .await
            .unwrap();
        assert!(context.is_admin);
    }

    #[tokio::test]
    async fn test_demoted_admin_refused_on_admin_route() {
        let codec = codec();
        let id = UserId::new();
        // Token still claims admin, the store no longer does.
        let header = bearer(&codec, &id.to_string(), true, TokenKind::Access);
        let gate = AuthGate::new(codec, Arc::new(lookup_returning(Some(user(id, false)))));

        let result = gate.admit(Some(&header), Access::AdminOnly, now()).await;
        assert!(matches!(result, Err(GateRejection::InsufficientPrivilege(_))));
    }

    #[tokio::test]
    async fn test_context_carries_token_role_snapshot() {
        let codec = codec();
        let id = UserId::new();
        let header = bearer(&codec, &id.to_string(), true, TokenKind::Access);
        let gate = AuthGate::new(codec, Arc::new(lookup_returning(Some(user(id, false)))));

        let context = gate
            .admit(Some(&header), Access::Authenticated, now())
            .await
            .unwrap();
        assert!(context.is_admin);
    }
}
