use thiserror::Error;

/// Everything that can go wrong between the client and the poll service.
///
/// All variants are recoverable by retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    #[error("poll service unreachable: {0}")]
    Unreachable(String),

    #[error("request to poll service timed out")]
    Timeout,

    /// Non-success status. `message` is the service's own `error` text when
    /// it sent one, otherwise a generic fallback for the operation.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl TransportError {
    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
