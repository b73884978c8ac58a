//! External collaborator contracts and their implementations.
//!
//! The upsert flow talks to two managed services: an identity provider
//! that owns account credentials, and a document store that holds the
//! per-school records. Both are consumed through dyn-safe traits so the
//! business logic never depends on a concrete backend.
//!
//! - [`identity`]: [`identity::IdentityProvider`] contract and error kinds
//! - [`docstore`]: [`docstore::DocumentStore`] contract, merge-write field values
//! - [`firebase`]: production adapters speaking the Identity Toolkit and
//!   Firestore REST APIs with service-account credentials
//! - [`memory`]: in-memory fakes for tests (`test-utils` feature)

use std::future::Future;
use std::pin::Pin;

pub mod docstore;
pub mod firebase;
pub mod identity;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

/// Boxed future type used by the dyn-safe provider traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
