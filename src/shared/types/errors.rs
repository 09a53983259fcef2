use thiserror::Error;

/// Caller-visible outcomes of the authentication use-cases.
///
/// `Internal` carries a cause for logging only; its `Display` output is what
/// callers see and never includes that cause.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Email is already registered")]
    EmailAlreadyRegistered,

    /// Unknown email and wrong password both map here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Secret exceeds what the hashing primitive reads in full.
    #[error("Password must be at most 72 bytes")]
    SecretTooLong,

    #[error("Identity not found")]
    IdentityNotFound,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// Raised by a store when an insert loses a uniqueness race.
    #[error("Duplicate email")]
    DuplicateEmail,

    #[error("Internal error")]
    Internal(String),
}

impl DomainError {
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        Self::Internal(cause.to_string())
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmailAlreadyRegistered | Self::DuplicateEmail => "EMAIL_ALREADY_REGISTERED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::SecretTooLong => "SECRET_TOO_LONG",
            Self::IdentityNotFound => "IDENTITY_NOT_FOUND",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ExpiredToken => "EXPIRED_TOKEN",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("security.jwt_secret is not set (use the config file or CREDAUTH_JWT_SECRET)")]
    MissingJwtSecret,

    #[error("security.bcrypt_cost must be between {min} and {max}, got {value}")]
    InvalidBcryptCost { value: u32, min: u32, max: u32 },

    #[error("security.jwt_expiration_secs must be positive")]
    InvalidExpiration,
}
