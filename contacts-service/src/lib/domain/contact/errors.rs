use thiserror::Error;

/// Error for ContactId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContactIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for contact field validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContactFieldError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
}

/// Top-level error for all contact-related operations
#[derive(Debug, Clone, Error)]
pub enum ContactError {
    #[error("Invalid contact ID: {0}")]
    InvalidContactId(#[from] ContactIdError),

    #[error("Invalid contact: {0}")]
    InvalidField(#[from] ContactFieldError),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Contact not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
