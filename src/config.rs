//! Configuration module
//!
//! Reads `AppConfig` from a TOML file and applies environment overrides.
//! A missing file yields defaults; a missing signing secret does not, and
//! `validate` rejects it before anything is started.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::infrastructure::crypto::jwt::{DEFAULT_EXPIRATION_SECS, DEFAULT_ISSUER};
use crate::infrastructure::crypto::password::DEFAULT_COST;
use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::DatabaseConfig;
use crate::shared::ConfigError;

/// Environment variable pointing at the config file.
pub const CONFIG_PATH_ENV: &str = "CREDAUTH_CONFIG";
/// Environment variable carrying the token signing secret.
pub const JWT_SECRET_ENV: &str = "CREDAUTH_JWT_SECRET";
/// Environment variable overriding the database URL.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// `~/.config/credauth/config.toml`, or `./config.toml` without a config dir.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("credauth").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    /// Keep identities in process memory instead of the database.
    pub in_memory: bool,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DatabaseConfig::default().url,
            in_memory: false,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_secs: i64,
    pub jwt_issuer: String,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiration_secs: DEFAULT_EXPIRATION_SECS,
            jwt_issuer: DEFAULT_ISSUER.to_string(),
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_secs", &self.jwt_expiration_secs)
            .field("jwt_issuer", &self.jwt_issuer)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (defaults when the file does not exist), then apply
    /// environment overrides. Does not validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = lookup(JWT_SECRET_ENV).filter(|s| !s.is_empty()) {
            self.security.jwt_secret = secret;
        }
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|s| !s.is_empty()) {
            self.database.url = url;
        }
    }

    /// Reject configurations the service must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost {
                value: self.security.bcrypt_cost,
                min: MIN_BCRYPT_COST,
                max: MAX_BCRYPT_COST,
            });
        }
        if self.security.jwt_expiration_secs <= 0 {
            return Err(ConfigError::InvalidExpiration);
        }
        Ok(())
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(self.security.jwt_secret.clone())
            .with_expiration_secs(self.security.jwt_expiration_secs)
            .with_issuer(self.security.jwt_issuer.clone())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
        }
    }
}
