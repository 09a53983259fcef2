//! In-memory credential store

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    CredentialStore, DomainError, DomainResult, Identity, IdentityId, NewIdentity,
};

/// In-memory store for development and testing.
///
/// Emails are compared exactly as given. Uniqueness is enforced through the
/// email map's entry lock, so concurrent creates for one email serialize and
/// only the first succeeds.
pub struct InMemoryCredentialStore {
    by_email: DashMap<String, Identity>,
    email_by_id: DashMap<IdentityId, String>,
    id_counter: AtomicI64,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            by_email: DashMap::new(),
            email_by_id: DashMap::new(),
            id_counter: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Identity>> {
        Ok(self.by_email.get(email).map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: IdentityId) -> DomainResult<Option<Identity>> {
        let Some(email) = self.email_by_id.get(&id).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        self.find_by_email(&email).await
    }

    async fn create(&self, new_identity: NewIdentity) -> DomainResult<Identity> {
        match self.by_email.entry(new_identity.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
                let identity = Identity {
                    id,
                    name: new_identity.name,
                    email: new_identity.email,
                    secret_hash: new_identity.secret_hash,
                    created_at: Utc::now(),
                };
                self.email_by_id.insert(id, identity.email.clone());
                slot.insert(identity.clone());
                Ok(identity)
            }
        }
    }
}
