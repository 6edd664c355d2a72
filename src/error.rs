//! Error types for the stack debugger.

use thiserror::Error;

/// Result type alias for stack debugger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can cross the core's boundary.
///
/// Parse mismatches never show up here: an unrecognised line is dropped by the
/// parser that saw it. A failed frame-detail or memory pass is recorded as a
/// [`PassFailure`](crate::debugger::PassFailure) warning on the step instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The debugger could not be started, or the initial pass exited non-zero
    #[error("debugger failed during {pass} pass: {message}")]
    ToolInvocation { pass: &'static str, message: String },

    /// The configured debugger command line is empty or unparseable
    #[error("invalid debugger command: {0}")]
    InvalidCommand(String),

    /// Unknown session id
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Request could not be understood by the server
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
