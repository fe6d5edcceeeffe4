use thiserror::Error;

/// Errors that can occur when constructing an entity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntityError {
    #[error("Username must be at least 1 character long")]
    EmptyUsername,
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error("Password hash is not a hex encoded SHA-256 digest")]
    MalformedPasswordHash,
}
