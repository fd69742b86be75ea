//! # chat-log
//!
//! Persistent audit log of conversation turns. An independent consumer of
//! [`Turn`](assistant_core::Turn) data: the orchestration core never reads
//! from it; callers write the final user/assistant pair here after the core
//! has returned its answer, for audit and history display.

mod error;
mod pool;
mod repo;

pub use error::ChatLogError;
pub use pool::SqlitePoolManager;
pub use repo::{ChatLogRepository, LoggedTurn};
