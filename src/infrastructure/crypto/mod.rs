//! Hashing and token signing primitives

pub mod jwt;
pub mod password;

pub use jwt::{extract_bearer, IssuedToken, JwtConfig, TokenClaims, TokenIssuer};
pub use password::PasswordHasher;
