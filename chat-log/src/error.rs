//! Chat-log error types.
//!
//! Used by the repository and callers of chat-log APIs.

use thiserror::Error;

/// Errors that can occur when using chat-log operations.
#[derive(Error, Debug)]
pub enum ChatLogError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
