use thiserror::Error;
use uuid::Uuid;

/// Failures reported by a [`Directory`](crate::Directory) backend.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("record not found")]
    NotFound,

    #[error("conflicting record: {0}")]
    Conflict(String),

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),

    #[error("not permitted")]
    Permission,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("temporarily unavailable: {0}")]
    Transient(String),

    /// The first half of a swap landed, the second did not. Nothing is rolled
    /// back; the list may hold a duplicate `order_index` until re-ordered.
    #[error("reorder of link {moved} is incomplete: link {neighbor} was not updated, re-fetch the list")]
    ReorderIncomplete { moved: Uuid, neighbor: Uuid },
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<DirectoryError> for CoreError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound => CoreError::NotFound,
            DirectoryError::Conflict(msg) => CoreError::Conflict(msg),
            DirectoryError::Unavailable(msg) => CoreError::Transient(msg),
        }
    }
}
