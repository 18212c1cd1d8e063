//! Errors reported by the store and auth collaborators.
//!
//! Both are recoverable: the caller reports them once and the user retries.
use sea_orm::DbErr;
use thiserror::Error;

/// Failures of the registration store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not authorized")]
    Unauthorized,
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Failures of the auth collaborator.
///
/// `Rejected` carries the backend's own message; it is inspected later to
/// pick the message shown to the admin.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for StoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unauthorized, Self::Unauthorized) => true,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Backend(a), Self::Backend(b)) => a == b,
            (Self::Transport(a), Self::Transport(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl PartialEq for AuthError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rejected(a), Self::Rejected(b)) => a == b,
            (Self::Transport(a), Self::Transport(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
