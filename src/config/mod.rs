//! Configuration modules for the Slateboard admin API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables at startup.
//!
//! # Modules
//!
//! - [`firebase`]: Upstream identity-provider and document-store endpoints
//! - [`jwt`]: JWT authentication configuration

pub mod firebase;
pub mod jwt;
