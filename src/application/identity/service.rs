//! Authentication service — application-layer orchestration
//!
//! Register, login and profile lookup live here. HTTP handlers are thin
//! wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    CredentialStore, DomainError, DomainResult, IdentityId, NewIdentity, PublicIdentity,
};
use crate::infrastructure::crypto::{PasswordHasher, TokenIssuer};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub identity: PublicIdentity,
}

/// Orchestrates the credential store, password hasher and token issuer.
///
/// Holds no mutable state; every call is independent. Generic over
/// `S: CredentialStore` so it stays decoupled from the persistence layer.
pub struct AuthService<S: CredentialStore + ?Sized> {
    store: Arc<S>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
}

impl<S: CredentialStore + ?Sized> AuthService<S> {
    pub fn new(store: Arc<S>, hasher: PasswordHasher, issuer: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            issuer,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new identity.
    ///
    /// The email pre-check only gives an early answer; the store decides
    /// uniqueness, and its `DuplicateEmail` is reported the same way.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        secret: &str,
    ) -> DomainResult<PublicIdentity> {
        if self.store.find_by_email(email).await?.is_some() {
            metrics::counter!("auth_register_total", "outcome" => "conflict").increment(1);
            return Err(DomainError::EmailAlreadyRegistered);
        }

        let secret_hash = self.hash_secret(secret).await?;

        let created = self
            .store
            .create(NewIdentity {
                name: name.to_string(),
                email: email.to_string(),
                secret_hash,
            })
            .await;

        let identity = match created {
            Ok(identity) => identity,
            Err(DomainError::DuplicateEmail) => {
                debug!("Registration lost a uniqueness race in the store");
                metrics::counter!("auth_register_total", "outcome" => "conflict").increment(1);
                return Err(DomainError::EmailAlreadyRegistered);
            }
            Err(e) => return Err(e),
        };

        metrics::counter!("auth_register_total", "outcome" => "created").increment(1);
        info!(identity_id = identity.id, "New identity registered");
        Ok(identity.into_public())
    }

    // ── Authentication ──────────────────────────────────────────

    /// Verify credentials and issue a bearer token.
    ///
    /// Unknown email and wrong secret produce the same error, and both pay
    /// for one bcrypt verification.
    pub async fn login(&self, email: &str, secret: &str) -> DomainResult<AuthResult> {
        let Some(identity) = self.store.find_by_email(email).await? else {
            self.verify_dummy(secret).await?;
            return Err(self.reject_login());
        };

        if !self.verify_secret(secret, &identity.secret_hash).await? {
            return Err(self.reject_login());
        }

        let issued = self.issuer.issue(&identity)?;

        metrics::counter!("auth_login_total", "outcome" => "success").increment(1);
        info!(identity_id = identity.id, "Identity logged in");

        Ok(AuthResult {
            token: issued.token,
            token_type: issued.token_type.to_string(),
            expires_in: issued.expires_in,
            identity: identity.into_public(),
        })
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Public profile of an already-authenticated identity.
    pub async fn get_profile(&self, id: IdentityId) -> DomainResult<PublicIdentity> {
        self.store
            .find_by_id(id)
            .await?
            .map(|identity| identity.into_public())
            .ok_or(DomainError::IdentityNotFound)
    }

    /// Resolve a bearer token to the profile of its subject.
    pub async fn authenticate(&self, token: &str) -> DomainResult<PublicIdentity> {
        let claims = self.issuer.parse(token)?;
        self.get_profile(claims.identity_id()?).await
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn reject_login(&self) -> DomainError {
        metrics::counter!("auth_login_total", "outcome" => "rejected").increment(1);
        warn!("Login rejected: invalid credentials");
        DomainError::InvalidCredentials
    }

    async fn hash_secret(&self, secret: &str) -> DomainResult<String> {
        let hasher = self.hasher.clone();
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(DomainError::internal)?
    }

    async fn verify_secret(&self, secret: &str, hashed: &str) -> DomainResult<bool> {
        let hasher = self.hasher.clone();
        let secret = secret.to_owned();
        let hashed = hashed.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &hashed))
            .await
            .map_err(DomainError::internal)
    }

    async fn verify_dummy(&self, secret: &str) -> DomainResult<()> {
        let hasher = self.hasher.clone();
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify_dummy(&secret))
            .await
            .map_err(DomainError::internal)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::Identity;
    use crate::infrastructure::crypto::JwtConfig;
    use crate::infrastructure::storage::InMemoryCredentialStore;

    fn service_with<S: CredentialStore>(store: Arc<S>) -> AuthService<S> {
        AuthService::new(
            store,
            PasswordHasher::new(4).unwrap(),
            TokenIssuer::new(JwtConfig::new("service-test-secret")),
        )
    }

    fn service() -> (Arc<InMemoryCredentialStore>, AuthService<InMemoryCredentialStore>) {
        let store = Arc::new(InMemoryCredentialStore::new());
        (store.clone(), service_with(store))
    }

    #[tokio::test]
    async fn full_scenario() {
        let (store, service) = service();

        let ana = service.register("Ana", "ana@x.com", "pw123").await.unwrap();
        assert_eq!(ana.name, "Ana");
        assert_eq!(ana.email, "ana@x.com");

        let again = service.register("Ana", "ana@x.com", "pw123").await;
        assert!(matches!(again, Err(DomainError::EmailAlreadyRegistered)));
        assert_eq!(store.len(), 1);

        let wrong = service.login("ana@x.com", "wrong").await;
        assert!(matches!(wrong, Err(DomainError::InvalidCredentials)));

        let result = service.login("ana@x.com", "pw123").await.unwrap();
        assert_eq!(result.token_type, "Bearer");
        assert_eq!(result.identity, ana);

        let claims = service.issuer().parse(&result.token).unwrap();
        assert_eq!(claims.identity_id().unwrap(), ana.id);
        assert_eq!(claims.email, "ana@x.com");
        assert_eq!(claims.name, "Ana");

        assert_eq!(service.get_profile(ana.id).await.unwrap(), ana);
        assert!(matches!(
            service.get_profile(9999).await,
            Err(DomainError::IdentityNotFound)
        ));
    }

    #[tokio::test]
    async fn stored_secret_is_hashed() {
        let (store, service) = service();
        service.register("Ana", "ana@x.com", "pw123").await.unwrap();

        let stored = store.find_by_email("ana@x.com").await.unwrap().unwrap();
        assert_ne!(stored.secret_hash, "pw123");
        assert!(stored.secret_hash.starts_with("$2b$04$"));
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_secret_are_indistinguishable() {
        let (_, service) = service();
        service.register("Ana", "ana@x.com", "pw123").await.unwrap();

        let unknown = service.login("nobody@x.com", "pw123").await.unwrap_err();
        let wrong = service.login("ana@x.com", "nope").await.unwrap_err();

        assert!(matches!(unknown, DomainError::InvalidCredentials));
        assert!(matches!(wrong, DomainError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.code(), wrong.code());
    }

    #[tokio::test]
    async fn successes_never_serialize_a_secret() {
        let (_, service) = service();
        let registered = service.register("Ana", "ana@x.com", "pw123").await.unwrap();
        let logged_in = service.login("ana@x.com", "pw123").await.unwrap();
        let profile = service.get_profile(registered.id).await.unwrap();

        for public in [&registered, &logged_in.identity, &profile] {
            let json = serde_json::to_value(public).unwrap();
            let obj = json.as_object().unwrap();
            assert!(!obj.keys().any(|k| k.to_lowercase().contains("secret")));
            assert!(!obj.keys().any(|k| k.to_lowercase().contains("password")));
            assert!(!json.to_string().contains("$2b$"));
        }
    }

    #[tokio::test]
    async fn authenticate_resolves_token_subject() {
        let (_, service) = service();
        let ana = service.register("Ana", "ana@x.com", "pw123").await.unwrap();
        let token = service.login("ana@x.com", "pw123").await.unwrap().token;

        assert_eq!(service.authenticate(&token).await.unwrap(), ana);
        assert!(matches!(
            service.authenticate("garbage").await,
            Err(DomainError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn authenticate_with_unknown_subject_is_not_found() {
        let (_, service) = service();
        let ghost = Identity {
            id: 9999,
            name: "Ghost".into(),
            email: "ghost@x.com".into(),
            secret_hash: String::new(),
            created_at: chrono::Utc::now(),
        };
        let token = service.issuer().issue(&ghost).unwrap().token;

        assert!(matches!(
            service.authenticate(&token).await,
            Err(DomainError::IdentityNotFound)
        ));
    }

    /// Store whose lookups never see existing rows, so the service's pre-check
    /// always passes and uniqueness falls to `create`.
    struct BlindLookupStore(InMemoryCredentialStore);

    #[async_trait]
    impl CredentialStore for BlindLookupStore {
        async fn find_by_email(&self, _email: &str) -> DomainResult<Option<Identity>> {
            Ok(None)
        }

        async fn find_by_id(&self, id: IdentityId) -> DomainResult<Option<Identity>> {
            self.0.find_by_id(id).await
        }

        async fn create(&self, new_identity: NewIdentity) -> DomainResult<Identity> {
            self.0.create(new_identity).await
        }
    }

    #[tokio::test]
    async fn store_rejection_after_precheck_reports_email_registered() {
        let store = Arc::new(BlindLookupStore(InMemoryCredentialStore::new()));
        let service = service_with(store.clone());

        service.register("Ana", "ana@x.com", "pw123").await.unwrap();
        let err = service.register("Ana", "ana@x.com", "pw123").await.unwrap_err();

        assert!(matches!(err, DomainError::EmailAlreadyRegistered));
        assert_eq!(store.0.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_create_exactly_one_identity() {
        let (store, service) = service();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .register(&format!("Ana {i}"), "ana@x.com", "pw123")
                        .await
                })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(DomainError::EmailAlreadyRegistered) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(store.len(), 1);
    }

    /// Store that fails every call, as a lost database connection would.
    struct BrokenStore;

    #[async_trait]
    impl CredentialStore for BrokenStore {
        async fn find_by_email(&self, _email: &str) -> DomainResult<Option<Identity>> {
            Err(DomainError::internal("connection refused"))
        }

        async fn find_by_id(&self, _id: IdentityId) -> DomainResult<Option<Identity>> {
            Err(DomainError::internal("connection refused"))
        }

        async fn create(&self, _new_identity: NewIdentity) -> DomainResult<Identity> {
            Err(DomainError::internal("connection refused"))
        }
    }

    #[tokio::test]
    async fn store_failures_surface_as_internal() {
        let service = service_with(Arc::new(BrokenStore));

        assert!(matches!(
            service.register("Ana", "ana@x.com", "pw123").await,
            Err(DomainError::Internal(_))
        ));
        assert!(matches!(
            service.login("ana@x.com", "pw123").await,
            Err(DomainError::Internal(_))
        ));
        assert!(matches!(
            service.get_profile(1).await,
            Err(DomainError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn over_long_secret_is_not_truncated() {
        let (store, service) = service();
        let prefix = "a".repeat(72);

        let err = service
            .register("Ana", "ana@x.com", &format!("{prefix}Y"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SecretTooLong));
        assert!(store.is_empty());

        service.register("Ana", "ana@x.com", &prefix).await.unwrap();
        let err = service
            .login("ana@x.com", &format!("{prefix}X"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
        assert!(service.login("ana@x.com", &prefix).await.is_ok());
    }
}
