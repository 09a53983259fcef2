//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod storage;

pub use crypto::{JwtConfig, PasswordHasher, TokenIssuer};
pub use database::{init_database, DatabaseConfig, SeaOrmCredentialStore};
pub use storage::InMemoryCredentialStore;
