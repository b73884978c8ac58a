//! Middleware and extractors for request processing.
//!
//! - [`auth`]: bearer-token caller context extraction
//! - [`guard`]: superadmin authorization guard
//!
//! # Authentication Flow
//!
//! 1. Client sends a request with `Authorization: Bearer <token>`
//! 2. [`auth::CallerContext`] decodes the JWT claims; a missing or invalid
//!    token yields an anonymous context rather than an immediate rejection
//! 3. [`guard::assert_superadmin`] classifies anonymous callers as
//!    `unauthenticated` and non-superadmins as `permission-denied`
//! 4. The handler runs only after the guard passes

pub mod auth;
pub mod guard;
