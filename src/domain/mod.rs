pub mod identity;

pub use identity::{CredentialStore, Identity, IdentityId, NewIdentity, PublicIdentity};

pub use crate::shared::types::errors::{DomainError, DomainResult};
