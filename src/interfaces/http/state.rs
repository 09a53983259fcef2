use std::sync::Arc;

use crate::application::AuthService;
use crate::domain::CredentialStore;

/// Auth service over whichever store the process was configured with.
pub type SharedAuthService = Arc<AuthService<dyn CredentialStore>>;

/// State shared by the auth routes and the auth middleware.
#[derive(Clone)]
pub struct AppState {
    pub auth: SharedAuthService,
}
