use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use tracing::{debug, error, info, instrument, warn};

use models::{JsonDocument, ID_FIELD};

use super::domain::{Claims, LoginInput, LoginOutput, RegisterInput};
use super::errors::AuthError;
use crate::errors::ServiceError;
use crate::storage::DocumentStore;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self { jwt_secret: cfg.jwt_secret.clone(), token_ttl: Duration::hours(cfg.token_ttl_hours) }
    }
}

/// Auth business service independent of web framework.
///
/// Credential records are ordinary documents in the shared collection and
/// passwords are compared as stored.
pub struct AuthService {
    store: Arc<dyn DocumentStore>,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn DocumentStore>, cfg: AuthConfig) -> Self { Self { store, cfg } }

    /// Authenticate against a stored `{username, password}` pair and issue a token.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{domain::{LoginInput, RegisterInput}, service::{AuthConfig, AuthService}};
    /// use service::storage::MemoryStore;
    ///
    /// let svc = AuthService::new(
    ///     Arc::new(MemoryStore::new()),
    ///     AuthConfig { jwt_secret: "secret".into(), token_ttl: chrono::Duration::hours(24) },
    /// );
    /// let body = serde_json::json!({ "username": "ada", "password": "pw" });
    /// let input = RegisterInput::try_from(body.as_object().cloned().unwrap()).unwrap();
    /// tokio_test::block_on(svc.register(input)).unwrap();
    ///
    /// let login = LoginInput { username: "ada".into(), password: "pw".into() };
    /// let out = tokio_test::block_on(svc.login(login)).unwrap();
    /// assert_eq!(svc.verify_token(&out.token).unwrap().username, "ada");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutput, AuthError> {
        let found = self
            .store
            .find_one_by_fields(&[("username", input.username.as_str()), ("password", input.password.as_str())])
            .await?;
        if found.is_none() {
            warn!("login_rejected");
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&input.username)?;
        info!("login_succeeded");
        Ok(LoginOutput { token })
    }

    /// Sign a token for `username`, expiring after the configured TTL.
    pub fn issue_token(&self, username: &str) -> Result<String, AuthError> {
        let exp = (Utc::now() + self.cfg.token_ttl).timestamp();
        let claims = Claims { username: username.to_string(), exp };
        encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| {
                error!(err = %e, "token signing failed");
                AuthError::TokenError(e.to_string())
            })
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Store the submitted document as a credential record unless the
    /// username is taken; returns the stored document.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<JsonDocument, AuthError> {
        if let Some(existing) = self.store.find_one_by_fields(&[("username", input.username.as_str())]).await? {
            debug!(existing_id = ?existing.get(ID_FIELD), "username taken");
            warn!("Username already exists");
            return Err(AuthError::Conflict);
        }

        let mut document = input.document;
        document.remove(ID_FIELD);
        let id = self.store.insert_one(document).await.map_err(|e| {
            error!(err = %e, "Error inserting user into database");
            e
        })?;

        let stored = self.store.find_by_id(id).await?.ok_or_else(|| {
            error!(%id, "Error finding new user in database");
            ServiceError::Unreadable(format!("inserted document {id} could not be read back"))
        })?;
        info!(%id, "user_registered");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::{json, Value};

    fn obj(v: Value) -> JsonDocument {
        v.as_object().cloned().unwrap()
    }

    fn service(store: Arc<MemoryStore>) -> AuthService {
        AuthService::new(store, AuthConfig { jwt_secret: "test-secret".into(), token_ttl: Duration::hours(24) })
    }

    async fn registered(svc: &AuthService, username: &str, password: &str) -> JsonDocument {
        let input = RegisterInput::try_from(obj(json!({ "username": username, "password": password }))).unwrap();
        svc.register(input).await.unwrap()
    }

    #[tokio::test]
    async fn login_issues_token_with_username_and_24h_expiry() -> anyhow::Result<()> {
        let svc = service(Arc::new(MemoryStore::new()));
        registered(&svc, "ada", "lovelace").await;

        let out = svc.login(LoginInput { username: "ada".into(), password: "lovelace".into() }).await?;
        let claims = svc.verify_token(&out.token)?;
        assert_eq!(claims.username, "ada");
        let expected = (Utc::now() + Duration::hours(24)).timestamp();
        assert!((claims.exp - expected).abs() <= 5, "exp {} vs {}", claims.exp, expected);
        Ok(())
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let svc = service(Arc::new(MemoryStore::new()));
        registered(&svc, "ada", "lovelace").await;

        let err = svc.login(LoginInput { username: "ada".into(), password: "lovelac".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        let err = svc.login(LoginInput { username: "Ada".into(), password: "lovelace".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected_and_original_kept() -> anyhow::Result<()> {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        let first = registered(&svc, "ada", "one").await;

        let again = RegisterInput::try_from(obj(json!({ "username": "ada", "password": "two" })))?;
        let err = svc.register(again).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(err.to_string(), "Username already exists");

        let all = store.find_all().await?;
        assert_eq!(all, vec![first]);
        Ok(())
    }

    #[tokio::test]
    async fn register_stores_extra_fields_verbatim() -> anyhow::Result<()> {
        let svc = service(Arc::new(MemoryStore::new()));
        let input = RegisterInput::try_from(obj(json!({ "username": "ada", "password": "pw", "role": "admin" })))?;
        let stored = svc.register(input).await?;
        assert_eq!(stored["role"], "admin");
        assert!(stored[ID_FIELD].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn register_that_cannot_be_read_back_is_unreadable_but_persisted() -> anyhow::Result<()> {
        let store = Arc::new(MemoryStore::unreadable());
        let svc = service(store.clone());
        let input = RegisterInput::try_from(obj(json!({ "username": "ada", "password": "pw" })))?;
        let err = svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Store(ServiceError::Unreadable(_))));
        assert_eq!(store.find_all().await?.len(), 1);
        Ok(())
    }

    #[test]
    fn tampered_or_foreign_tokens_fail_verification() {
        let svc = service(Arc::new(MemoryStore::new()));
        let token = svc.issue_token("ada").unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(svc.verify_token(&tampered), Err(AuthError::InvalidToken(_))));

        let other = AuthService::new(
            Arc::new(MemoryStore::new()),
            AuthConfig { jwt_secret: "other".into(), token_ttl: Duration::hours(24) },
        );
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn expired_tokens_fail_verification() {
        let svc = AuthService::new(
            Arc::new(MemoryStore::new()),
            AuthConfig { jwt_secret: "test-secret".into(), token_ttl: Duration::hours(-1) },
        );
        let token = svc.issue_token("ada").unwrap();
        assert!(matches!(svc.verify_token(&token), Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn store_failures_are_not_reported_as_bad_credentials() {
        let svc = service(Arc::new(MemoryStore::failing("connection reset")));
        let err = svc.login(LoginInput { username: "a".into(), password: "b".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Store(_)));
    }
}
