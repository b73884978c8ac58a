use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use slateboard::config::jwt::JwtConfig;
use slateboard::providers::memory::{MemoryDocumentStore, MemoryIdentityProvider};
use slateboard::router::init_router;
use slateboard::state::AppState;
use slateboard::utils::jwt::create_access_token;

pub struct TestEnv {
    pub app: axum::Router,
    pub identity: Arc<MemoryIdentityProvider>,
    pub documents: Arc<MemoryDocumentStore>,
    pub jwt_config: JwtConfig,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_env() -> TestEnv {
    let identity = Arc::new(MemoryIdentityProvider::new());
    let documents = Arc::new(MemoryDocumentStore::new());
    let jwt_config = test_jwt_config();

    let state = AppState {
        identity: identity.clone(),
        documents: documents.clone(),
        jwt_config: jwt_config.clone(),
    };

    TestEnv {
        app: init_router(state),
        identity,
        documents,
        jwt_config,
    }
}

impl TestEnv {
    pub fn token(&self, uid: &str, role: Option<&str>, superadmin: Option<bool>) -> String {
        create_access_token(uid, role, superadmin, &self.jwt_config).unwrap()
    }

    pub fn superadmin_token(&self) -> String {
        self.token("superadmin-uid", Some("superadmin"), None)
    }

    /// Invoke the callable and return the response status and JSON body.
    pub async fn call_upsert(
        &self,
        token: Option<&str>,
        payload: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/rpc/upsertSchoolAdmin")
            .header("content-type", "application/json");

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = builder
            .body(Body::from(serde_json::to_string(&payload).unwrap()))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        (status, body)
    }
}
