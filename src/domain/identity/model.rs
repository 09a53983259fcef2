use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store-assigned identifier of an identity.
pub type IdentityId = i64;

/// Persisted identity record, as owned by the credential store.
///
/// Deliberately not `Serialize`: the only way to hand an identity to a caller
/// is through [`PublicIdentity`], which has no hash field at all.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    pub email: String,
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn into_public(self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("secret_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Identity as returned across the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdentity {
    pub id: IdentityId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Identity> for PublicIdentity {
    fn from(identity: Identity) -> Self {
        identity.into_public()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Identity {
        Identity {
            id: 7,
            name: "Ana".into(),
            email: "ana@x.com".into(),
            secret_hash: "$2b$04$abcdefghijklmnopqrstuv".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn public_projection_has_no_secret_field() {
        let public = sample().into_public();
        let json = serde_json::to_value(&public).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 4);
        assert!(obj.contains_key("id"));
        assert!(obj.contains_key("name"));
        assert!(obj.contains_key("email"));
        assert!(obj.contains_key("createdAt"));
        assert!(!json.to_string().contains("$2b$"));
    }

    #[test]
    fn debug_output_redacts_hash() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("$2b$"));
    }
}
