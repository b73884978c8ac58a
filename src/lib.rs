//! # Slateboard Admin API
//!
//! A small callable API built with Rust and Axum that provisions school
//! administrator accounts: given a school identifier, an email, and an
//! optional password, it ensures an identity-provider account exists for
//! that email (creating it or resetting its password), then records the
//! resulting uid and email on the school's document.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── config/           # Configuration modules (JWT, upstream endpoints)
//! ├── middleware/       # Caller-context extraction and the superadmin guard
//! ├── modules/          # Feature modules
//! │   └── school_admins/  # The upsertSchoolAdmin callable
//! ├── providers/        # Identity-provider and document-store contracts
//! │   └── firebase/     # Production REST adapters
//! └── utils/            # Shared utilities (errors, JWT)
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: DTOs and payload normalization
//! - `router.rs`: Axum router configuration
//!
//! ## Authorization
//!
//! Every callable is gated on the superadmin role. The guard checks the
//! caller's token claims first (`role: "superadmin"` or
//! `superadmin: true`) and falls back to the caller's admin profile
//! document for roles assigned outside the token-issuance flow.
//!
//! ## Error surface
//!
//! Failures are returned as `{code, error}` JSON where `code` is one of
//! `unauthenticated`, `permission-denied`, `invalid-argument`,
//! `failed-precondition`, `already-exists`, or `internal`. Internal
//! failures also carry the upstream provider code for diagnostics.
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_SECRET=your-secure-secret-key
//! FIREBASE_PROJECT_ID=my-project
//! GOOGLE_APPLICATION_CREDENTIALS=service-account.json
//! ```

pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod providers;
pub mod router;
pub mod state;
pub mod utils;
