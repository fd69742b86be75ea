//! Request error taxonomy for the reasoning loop.
//!
//! Tool execution failures are deliberately absent: they are rendered as
//! observation text inside the loop and never surface as errors.

use thiserror::Error;

/// Errors that end a chat request. None of these leave a partial turn pair in
/// session memory.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The message was empty or whitespace-only; rejected before the loop.
    #[error("message is empty")]
    EmptyMessage,

    /// The reasoning step requested a tool that is not registered.
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),

    /// A reasoning or tool call exceeded its per-call time budget.
    #[error("request timed out")]
    Timeout,

    /// The reasoning call itself failed (transport, decode, no choices).
    #[error("reasoning error: {0}")]
    Oracle(String),

    /// The loop reached its iteration ceiling without a final answer.
    #[error("no final answer after {0} reasoning iterations")]
    IterationLimit(usize),
}

pub type Result<T> = std::result::Result<T, ChatError>;
