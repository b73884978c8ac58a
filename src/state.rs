use std::sync::Arc;

use crate::config::firebase::FirebaseConfig;
use crate::config::jwt::JwtConfig;
use crate::providers::docstore::DocumentStore;
use crate::providers::firebase::init_providers;
use crate::providers::identity::IdentityProvider;

/// Shared application state.
///
/// The provider handles are constructed once at startup and live for the
/// whole process; every invocation borrows them through the state rather
/// than re-initializing clients per request.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub documents: Arc<dyn DocumentStore>,
    pub jwt_config: JwtConfig,
}

pub fn init_app_state() -> anyhow::Result<AppState> {
    let firebase_config = FirebaseConfig::from_env();
    let (identity, documents) = init_providers(&firebase_config)?;

    Ok(AppState {
        identity,
        documents,
        jwt_config: JwtConfig::from_env(),
    })
}
