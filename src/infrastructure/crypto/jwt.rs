//! JWT token handling

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, Identity, IdentityId};

/// Default token lifetime in seconds.
pub const DEFAULT_EXPIRATION_SECS: i64 = 3600;

/// Default `iss` claim.
pub const DEFAULT_ISSUER: &str = "credauth";

/// JWT configuration
///
/// There is no `Default`: the signing secret always comes from configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// Symmetric key shared by issuer and verifier
    pub secret: String,
    /// Token lifetime in seconds
    pub expiration_secs: i64,
    /// Issuer claim
    pub issuer: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    pub fn with_expiration_secs(mut self, secs: i64) -> Self {
        self.expiration_secs = secs;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_secs", &self.expiration_secs)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Claims carried by an access token. All fields are required when parsing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (identity ID, decimal)
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    /// Project an identity into claims valid from now for the configured lifetime.
    pub fn for_identity(identity: &Identity, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(config.expiration_secs);

        Self {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    /// Identity ID encoded in `sub`.
    pub fn identity_id(&self) -> DomainResult<IdentityId> {
        self.sub.parse().map_err(|_| DomainError::InvalidToken)
    }
}

/// A freshly signed bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: &'static str,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Signs and validates HS256 access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Issue a token for an identity.
    pub fn issue(&self, identity: &Identity) -> DomainResult<IssuedToken> {
        let claims = TokenClaims::for_identity(identity, &self.config);
        let token = self.sign(&claims)?;

        Ok(IssuedToken {
            token,
            token_type: "Bearer",
            expires_in: self.config.expiration_secs,
        })
    }

    /// Sign prepared claims as-is.
    pub fn sign(&self, claims: &TokenClaims) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(DomainError::internal)
    }

    /// Verify signature, issuer and expiry, and decode the claims.
    pub fn parse(&self, token: &str) -> DomainResult<TokenClaims> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::ExpiredToken,
                _ => DomainError::InvalidToken,
            })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
