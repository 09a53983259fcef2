//! # Credential Auth
//!
//! Credential-based authentication service: registers identities, verifies
//! login credentials, issues bearer tokens and resolves the caller's profile.
//!
//! ## Architecture
//!
//! - **domain**: Identity types and the credential store interface
//! - **application**: `AuthService` use cases (register, login, profile)
//! - **infrastructure**: bcrypt hashing, JWT signing, in-memory and SQLite stores
//! - **interfaces**: REST API (axum) with bearer-token middleware
//! - **config**: TOML configuration with environment overrides

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::{AuthResult, AuthService};
pub use domain::{CredentialStore, DomainError, DomainResult, Identity, PublicIdentity};
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryCredentialStore, JwtConfig, PasswordHasher,
    SeaOrmCredentialStore, TokenIssuer,
};
pub use interfaces::http::create_api_router;
