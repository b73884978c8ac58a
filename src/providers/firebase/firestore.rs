//! Firestore REST adapter.
//!
//! Reads documents with a plain GET and performs merge-writes through the
//! `documents:commit` endpoint so `ServerTimestamp` fields resolve to the
//! backend's clock via a `REQUEST_TIME` transform.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use super::token::TokenSource;
use crate::providers::BoxFuture;
use crate::providers::docstore::{DocStoreError, Document, DocumentStore, FieldValue, WriteFields};

pub struct FirestoreDocumentStore {
    http: reqwest::Client,
    token: Arc<TokenSource>,
    api_base: String,
    project_id: String,
}

impl FirestoreDocumentStore {
    pub fn new(
        http: reqwest::Client,
        token: Arc<TokenSource>,
        api_base: String,
        project_id: String,
    ) -> Self {
        Self {
            http,
            token,
            api_base,
            project_id,
        }
    }

    fn document_name(&self, path: &str) -> String {
        format!(
            "projects/{}/databases/(default)/documents/{}",
            self.project_id, path
        )
    }

    fn document_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.document_name(path)
        )
    }

    fn commit_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents:commit",
            self.api_base.trim_end_matches('/'),
            self.project_id
        )
    }

    async fn bearer(&self) -> Result<String, DocStoreError> {
        self.token
            .bearer()
            .await
            .map_err(|e| DocStoreError::Transport(e.to_string()))
    }
}

fn provider_error(status: u16, payload: &Value) -> DocStoreError {
    let code = payload["error"]["status"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP_{}", status));
    let message = payload["error"]["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| "Document store request failed".to_string());
    DocStoreError::Provider { code, message }
}

/// Decode a Firestore typed value into loose JSON.
fn decode_value(value: &Value) -> Value {
    if let Some(s) = value["stringValue"].as_str() {
        return Value::String(s.to_string());
    }
    if let Some(b) = value["booleanValue"].as_bool() {
        return Value::Bool(b);
    }
    if let Some(i) = value["integerValue"].as_str() {
        if let Ok(n) = i.parse::<i64>() {
            return json!(n);
        }
    }
    if let Some(d) = value["doubleValue"].as_f64() {
        return json!(d);
    }
    if let Some(t) = value["timestampValue"].as_str() {
        return Value::String(t.to_string());
    }
    if let Some(map) = value["mapValue"]["fields"].as_object() {
        return Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), decode_value(v)))
                .collect(),
        );
    }
    Value::Null
}

fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Boolean(b) => json!({ "booleanValue": b }),
        // Resolved through an updateTransform, never written directly.
        FieldValue::ServerTimestamp => Value::Null,
    }
}

impl DocumentStore for FirestoreDocumentStore {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Document>, DocStoreError>> {
        Box::pin(async move {
            let bearer = self.bearer().await?;

            let response = self
                .http
                .get(self.document_url(path))
                .bearer_auth(bearer)
                .send()
                .await
                .map_err(|e| DocStoreError::Transport(e.to_string()))?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }

            let payload: Value = response
                .json()
                .await
                .map_err(|e| DocStoreError::Transport(e.to_string()))?;

            if !status.is_success() {
                return Err(provider_error(status.as_u16(), &payload));
            }

            let document = payload["fields"]
                .as_object()
                .map(|fields| {
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), decode_value(v)))
                        .collect()
                })
                .unwrap_or_default();

            debug!(path = %path, "Fetched document");

            Ok(Some(document))
        })
    }

    fn merge_set<'a>(
        &'a self,
        path: &'a str,
        fields: WriteFields,
    ) -> BoxFuture<'a, Result<(), DocStoreError>> {
        Box::pin(async move {
            let bearer = self.bearer().await?;

            let mut field_paths = Vec::new();
            let mut encoded = serde_json::Map::new();
            let mut transforms = Vec::new();

            for (name, value) in &fields {
                if matches!(value, FieldValue::ServerTimestamp) {
                    transforms.push(json!({
                        "fieldPath": name,
                        "setToServerValue": "REQUEST_TIME",
                    }));
                } else {
                    field_paths.push(name.clone());
                    encoded.insert(name.clone(), encode_value(value));
                }
            }

            let body = json!({
                "writes": [{
                    "update": {
                        "name": self.document_name(path),
                        "fields": encoded,
                    },
                    "updateMask": { "fieldPaths": field_paths },
                    "updateTransforms": transforms,
                }],
            });

            let response = self
                .http
                .post(self.commit_url())
                .bearer_auth(bearer)
                .json(&body)
                .send()
                .await
                .map_err(|e| DocStoreError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let payload: Value = response.json().await.unwrap_or_default();
                return Err(provider_error(status.as_u16(), &payload));
            }

            debug!(path = %path, fields = fields.len(), "Merged document fields");

            Ok(())
        })
    }
}
