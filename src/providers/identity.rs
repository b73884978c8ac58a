//! Identity provider contract.
//!
//! The provider owns account credentials; this service only looks accounts
//! up by email, creates them, and resets passwords. Accounts are never
//! deleted from here.

use std::fmt;

use super::BoxFuture;

/// An account held by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAccount {
    pub uid: String,
    pub email: String,
}

/// Error kinds raised by identity-provider operations.
///
/// The first three variants are the provider codes the upsert flow
/// special-cases; everything else arrives as [`IdentityError::Provider`]
/// with the raw upstream code preserved for diagnostics.
#[derive(Debug)]
pub enum IdentityError {
    /// No account exists for the requested email.
    UserNotFound,

    /// An account already exists for the email (creation race or
    /// inconsistent lookup).
    EmailExists,

    /// The provider rejected the password format.
    InvalidPassword,

    /// Any other provider failure, with the upstream code when known.
    Provider { code: String, message: String },
}

impl IdentityError {
    /// The upstream code associated with this error, for diagnostics.
    pub fn provider_code(&self) -> &str {
        match self {
            Self::UserNotFound => "auth/user-not-found",
            Self::EmailExists => "auth/email-already-exists",
            Self::InvalidPassword => "auth/invalid-password",
            Self::Provider { code, .. } => code,
        }
    }
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserNotFound => write!(f, "No account exists for that email"),
            Self::EmailExists => write!(f, "An account already exists for that email"),
            Self::InvalidPassword => write!(f, "Password rejected by provider policy"),
            Self::Provider { code, message } => write!(f, "{} ({})", message, code),
        }
    }
}

impl std::error::Error for IdentityError {}

/// Abstract contract for the managed identity service.
///
/// Implementations can be swapped without changing business logic.
pub trait IdentityProvider: Send + Sync {
    /// Resolve an existing account by email.
    ///
    /// Fails with [`IdentityError::UserNotFound`] when no account exists.
    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<IdentityAccount, IdentityError>>;

    /// Create an account with the given email and password, returning the
    /// provider-assigned uid.
    fn create_user<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<IdentityAccount, IdentityError>>;

    /// Reset an existing account's password.
    fn update_password<'a>(
        &'a self,
        uid: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<(), IdentityError>>;
}
