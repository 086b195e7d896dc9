use thiserror::Error;

use crate::user::errors::UserError;

/// Closed set of outcomes an authentication operation can fail with.
///
/// The display strings are the client-facing messages and must stay stable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Account already exists")]
    AlreadyExists,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Email not confirmed")]
    EmailNotConfirmed,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Verification error")]
    VerificationError,

    // Infrastructure errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(_) => AuthError::AlreadyExists,
            other => AuthError::Internal(other.to_string()),
        }
    }
}

/// Error raised by a session cache backend.
///
/// Never surfaced to clients: the auth service logs it and falls back to the
/// user store.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Cache command failed: {0}")]
    CommandFailed(String),
}
