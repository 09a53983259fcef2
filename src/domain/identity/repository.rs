use async_trait::async_trait;

use super::{Identity, IdentityId, NewIdentity};
use crate::domain::DomainResult;

/// Persistence port for identities.
///
/// Absence is `Ok(None)`, not an error. `create` is the authority on email
/// uniqueness and returns `DomainError::DuplicateEmail` when another identity
/// already holds the address, even if the caller checked beforehand.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Identity>>;
    async fn find_by_id(&self, id: IdentityId) -> DomainResult<Option<Identity>>;
    async fn create(&self, new_identity: NewIdentity) -> DomainResult<Identity>;
}
