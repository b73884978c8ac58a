//! Firebase-backed implementations of the provider contracts.
//!
//! Both adapters authenticate with a Google service account so writes run
//! with service privileges rather than the caller's, and share one
//! process-lifetime HTTP client and token source.
//!
//! - [`token`]: service-account token source (RS256 assertion + exchange)
//! - [`identity`]: Identity Toolkit REST adapter
//! - [`firestore`]: Firestore REST adapter

use std::sync::Arc;

use anyhow::Context;

use crate::config::firebase::FirebaseConfig;
use crate::providers::docstore::DocumentStore;
use crate::providers::identity::IdentityProvider;

pub mod firestore;
pub mod identity;
pub mod token;

pub use firestore::FirestoreDocumentStore;
pub use identity::FirebaseIdentityProvider;
pub use token::{ServiceAccountKey, TokenSource};

/// Build the production provider pair from configuration.
///
/// Called once at startup; the returned handles are shared for the
/// lifetime of the process.
pub fn init_providers(
    config: &FirebaseConfig,
) -> anyhow::Result<(Arc<dyn IdentityProvider>, Arc<dyn DocumentStore>)> {
    let key = ServiceAccountKey::from_file(&config.service_account_path).with_context(|| {
        format!(
            "Failed to load service account key from {}",
            config.service_account_path
        )
    })?;

    let http = reqwest::Client::new();
    let token = Arc::new(TokenSource::new(key, http.clone()));

    let identity = FirebaseIdentityProvider::new(
        http.clone(),
        token.clone(),
        config.identity_api_base.clone(),
        config.project_id.clone(),
    );
    let documents = FirestoreDocumentStore::new(
        http,
        token,
        config.firestore_api_base.clone(),
        config.project_id.clone(),
    );

    Ok((Arc::new(identity), Arc::new(documents)))
}
