use thiserror::Error;

use crate::db::dao::DaoLayerError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("{0}")]
    NotAuthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Failed to fetch {resource} count: {message}")]
    CountFailed {
        resource: &'static str,
        message: String,
    },
    #[error("Failed to fetch {resource}: {message}")]
    RangeFailed {
        resource: &'static str,
        message: String,
    },
    #[error("{context}: {message}")]
    Store { context: String, message: String },
}

impl ResourceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn store(context: impl Into<String>, err: StoreError) -> Self {
        Self::Store {
            context: context.into(),
            message: err.message(),
        }
    }
}

/// Failure reported by a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Dao(#[from] DaoLayerError),
    #[error("{0}")]
    Unavailable(String),
}

impl StoreError {
    /// The store's own message, without any layer prefix.
    pub fn message(&self) -> String {
        match self {
            StoreError::Dao(err) => err.detail(),
            StoreError::Unavailable(message) => message.clone(),
        }
    }
}
