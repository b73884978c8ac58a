//! In-memory provider fakes for tests.
//!
//! Both fakes are cheap, fully synchronous behind a mutex, and expose a
//! few counters and failure knobs so tests can assert on side effects
//! (or the absence of them) without a live backend.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::BoxFuture;
use super::docstore::{DocStoreError, Document, DocumentStore, FieldValue, WriteFields};
use super::identity::{IdentityAccount, IdentityError, IdentityProvider};

/// In-memory identity provider keyed by normalized email.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: Mutex<HashMap<String, IdentityAccount>>,
    password_updates: Mutex<Vec<(String, String)>>,
    stale_lookups: AtomicBool,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing account, returning its uid.
    pub fn insert_account(&self, email: &str) -> String {
        let uid = Uuid::new_v4().simple().to_string();
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            IdentityAccount {
                uid: uid.clone(),
                email: email.to_string(),
            },
        );
        uid
    }

    /// When enabled, `find_by_email` behaves as if recently created
    /// accounts are not yet visible, while `create_user` still enforces
    /// email uniqueness. This reproduces the lookup/create race where two
    /// callers both observe a missing account.
    pub fn set_stale_lookups(&self, stale: bool) {
        self.stale_lookups.store(stale, Ordering::SeqCst);
    }

    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn account_for(&self, email: &str) -> Option<IdentityAccount> {
        self.accounts.lock().unwrap().get(email).cloned()
    }

    /// `(uid, password)` pairs recorded by `update_password`, oldest first.
    pub fn password_updates(&self) -> Vec<(String, String)> {
        self.password_updates.lock().unwrap().clone()
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<IdentityAccount, IdentityError>> {
        Box::pin(async move {
            if self.stale_lookups.load(Ordering::SeqCst) {
                return Err(IdentityError::UserNotFound);
            }

            self.accounts
                .lock()
                .unwrap()
                .get(email)
                .cloned()
                .ok_or(IdentityError::UserNotFound)
        })
    }

    fn create_user<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<IdentityAccount, IdentityError>> {
        Box::pin(async move {
            if password.len() < 6 {
                return Err(IdentityError::InvalidPassword);
            }

            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(IdentityError::EmailExists);
            }

            let account = IdentityAccount {
                uid: Uuid::new_v4().simple().to_string(),
                email: email.to_string(),
            };
            accounts.insert(email.to_string(), account.clone());
            Ok(account)
        })
    }

    fn update_password<'a>(
        &'a self,
        uid: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<(), IdentityError>> {
        Box::pin(async move {
            if password.len() < 6 {
                return Err(IdentityError::InvalidPassword);
            }

            let accounts = self.accounts.lock().unwrap();
            if !accounts.values().any(|a| a.uid == uid) {
                return Err(IdentityError::UserNotFound);
            }
            drop(accounts);

            self.password_updates
                .lock()
                .unwrap()
                .push((uid.to_string(), password.to_string()));
            Ok(())
        })
    }
}

/// In-memory document store keyed by document path.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<String, Document>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document with the given JSON fields.
    pub fn insert_document(&self, path: &str, fields: Document) {
        self.documents
            .lock()
            .unwrap()
            .insert(path.to_string(), fields);
    }

    /// When enabled, every `merge_set` fails with a provider error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn document(&self, path: &str) -> Option<Document> {
        self.documents.lock().unwrap().get(path).cloned()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Document>, DocStoreError>> {
        Box::pin(async move {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.documents.lock().unwrap().get(path).cloned())
        })
    }

    fn merge_set<'a>(
        &'a self,
        path: &'a str,
        fields: WriteFields,
    ) -> BoxFuture<'a, Result<(), DocStoreError>> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(DocStoreError::Provider {
                    code: "unavailable".to_string(),
                    message: "Simulated write failure".to_string(),
                });
            }

            let mut documents = self.documents.lock().unwrap();
            let doc = documents.entry(path.to_string()).or_default();
            for (name, value) in fields {
                let json = match value {
                    FieldValue::String(s) => Value::String(s),
                    FieldValue::Boolean(b) => Value::Bool(b),
                    FieldValue::ServerTimestamp => Value::String(Utc::now().to_rfc3339()),
                };
                doc.insert(name, json);
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_email_misses_until_seeded() {
        let provider = MemoryIdentityProvider::new();
        assert!(matches!(
            provider.find_by_email("admin@school.test").await,
            Err(IdentityError::UserNotFound)
        ));

        let uid = provider.insert_account("admin@school.test");
        let account = provider.find_by_email("admin@school.test").await.unwrap();
        assert_eq!(account.uid, uid);
    }

    #[tokio::test]
    async fn test_create_user_enforces_email_uniqueness() {
        let provider = MemoryIdentityProvider::new();
        provider.create_user("admin@school.test", "abc123").await.unwrap();

        assert!(matches!(
            provider.create_user("admin@school.test", "abc123").await,
            Err(IdentityError::EmailExists)
        ));
    }

    #[tokio::test]
    async fn test_merge_set_preserves_unrelated_fields() {
        let store = MemoryDocumentStore::new();
        store.insert_document(
            "schools/s1",
            serde_json::json!({"name": "Northside"}).as_object().unwrap().clone(),
        );

        let mut fields = WriteFields::new();
        fields.insert("adminUid".to_string(), FieldValue::String("u1".to_string()));
        store.merge_set("schools/s1", fields).await.unwrap();

        let doc = store.document("schools/s1").unwrap();
        assert_eq!(doc["name"], "Northside");
        assert_eq!(doc["adminUid"], "u1");
    }
}
