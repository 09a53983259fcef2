//! Identity aggregate
//!
//! Contains the Identity entity, its public projection, and the store interface.

pub mod model;
pub mod repository;

mod dto_create;

pub use model::{Identity, IdentityId, PublicIdentity};

pub use dto_create::NewIdentity;

pub use repository::CredentialStore;
