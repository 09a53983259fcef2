use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    Set, SqlErr,
};

use crate::domain::{
    CredentialStore, DomainError, DomainResult, Identity, IdentityId, NewIdentity,
};
use crate::infrastructure::database::entities::identity;

pub struct SeaOrmCredentialStore {
    db: DatabaseConnection,
}

impl SeaOrmCredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn identity_model_to_domain(model: identity::Model) -> Identity {
    Identity {
        id: model.id,
        name: model.name,
        email: model.email,
        secret_hash: model.secret_hash,
        created_at: model.created_at,
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::internal(format!("Database error: {}", e))
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl CredentialStore for SeaOrmCredentialStore {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Identity>> {
        let model = identity::Entity::find()
            .filter(identity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(identity_model_to_domain))
    }

    async fn find_by_id(&self, id: IdentityId) -> DomainResult<Option<Identity>> {
        let model = identity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(identity_model_to_domain))
    }

    async fn create(&self, new_identity: NewIdentity) -> DomainResult<Identity> {
        let model = identity::ActiveModel {
            id: NotSet,
            name: Set(new_identity.name),
            email: Set(new_identity.email),
            secret_hash: Set(new_identity.secret_hash),
            created_at: Set(Utc::now()),
        };

        let inserted = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateEmail
            } else {
                db_err(e)
            }
        })?;

        Ok(identity_model_to_domain(inserted))
    }
}
