/// Fields a store needs to create an identity; `id` and `created_at` are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub name: String,
    pub email: String,
    pub secret_hash: String,
}
