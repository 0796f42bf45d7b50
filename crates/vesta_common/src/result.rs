//! Common result and error types for the Vesta build layer.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates a bug in Vesta itself, not a problem with the build
/// request. Problems with the request (unreadable archives, bad
/// configuration) have their own error enums in the crates that detect them,
/// and dependency hygiene findings are reported as diagnostics.
pub type VestaResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in Vesta, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
