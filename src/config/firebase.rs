use std::env;

/// Endpoints and credentials for the upstream Firebase project.
///
/// The API bases are overridable so the service can point at the local
/// emulator suite during development.
#[derive(Clone, Debug)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub service_account_path: String,
    pub identity_api_base: String,
    pub firestore_api_base: String,
}

impl FirebaseConfig {
    pub fn from_env() -> Self {
        Self {
            project_id: env::var("FIREBASE_PROJECT_ID").unwrap_or_else(|_| "demo-project".to_string()),
            service_account_path: env::var("GOOGLE_APPLICATION_CREDENTIALS")
                .unwrap_or_else(|_| "service-account.json".to_string()),
            identity_api_base: env::var("IDENTITY_API_BASE")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com/v1".to_string()),
            firestore_api_base: env::var("FIRESTORE_API_BASE")
                .unwrap_or_else(|_| "https://firestore.googleapis.com/v1".to_string()),
        }
    }
}
