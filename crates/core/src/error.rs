//! Domain error model.

use thiserror::Error;

/// Result type used across the policy layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every error produced by validation, authorization, pagination or a
/// repository collaborator ends up here so handlers can render it in one place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A candidate record failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Malformed or contradictory request input (pagination, claims, ids).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authorization denial with a resource/action specific reason.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The target record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage failure not attributable to caller input.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`DomainError`], used by transports to pick a status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Forbidden,
    NotFound,
    Internal,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) | DomainError::BadRequest(_) => ErrorKind::BadRequest,
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The bare message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            DomainError::Validation(m)
            | DomainError::BadRequest(m)
            | DomainError::Forbidden(m)
            | DomainError::NotFound(m)
            | DomainError::Internal(m) => m,
        }
    }
}
