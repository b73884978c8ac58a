//! Document store contract.
//!
//! Documents are addressed by slash-separated paths ("schools/{id}",
//! "users/{uid}"). Reads return the document's fields as loosely-typed
//! JSON; writes are merge-sets that leave unrelated fields untouched.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use super::BoxFuture;

/// Fields of a stored document, as read back from the store.
pub type Document = Map<String, Value>;

/// A value written by a merge-set.
///
/// `ServerTimestamp` is resolved to the store's own clock at commit time,
/// never the caller's.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Boolean(bool),
    ServerTimestamp,
}

/// Fields of a single merge-set, keyed by field name.
pub type WriteFields = BTreeMap<String, FieldValue>;

/// Error type for document store operations.
#[derive(Debug)]
pub enum DocStoreError {
    /// The backend rejected the operation, with the upstream status code
    /// when known.
    Provider { code: String, message: String },

    /// Transport-level failure reaching the backend.
    Transport(String),
}

impl DocStoreError {
    pub fn provider_code(&self) -> &str {
        match self {
            Self::Provider { code, .. } => code,
            Self::Transport(_) => "transport",
        }
    }
}

impl fmt::Display for DocStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider { code, message } => write!(f, "{} ({})", message, code),
            Self::Transport(message) => write!(f, "Transport error: {}", message),
        }
    }
}

impl std::error::Error for DocStoreError {}

/// Abstract contract for the managed document database.
///
/// Implementations can be swapped without changing business logic.
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by path. `Ok(None)` when the document is missing.
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Document>, DocStoreError>>;

    /// Merge the given fields into the document at `path`, creating it if
    /// absent. Existing fields not named in `fields` are preserved.
    fn merge_set<'a>(
        &'a self,
        path: &'a str,
        fields: WriteFields,
    ) -> BoxFuture<'a, Result<(), DocStoreError>>;
}
