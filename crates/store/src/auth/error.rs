//! Authentication error types.

use thiserror::Error;

use crate::persist::StorageError;

/// Errors that can occur during authentication operations.
///
/// These are ordinary result values, not faults: the caller is expected to
/// match on them and render an inline message.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] farine_core::EmailError),

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// No account matches this email.
    #[error("no account exists with this email")]
    NoSuchAccount,

    /// The password does not match the account.
    #[error("wrong password")]
    WrongPassword,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Persistence error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
