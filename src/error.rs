use crate::classify::{classify_status, FailureKind};

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// A single attempt exceeded its time budget.
    #[error("attempt timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Response body could not be decoded into the requested type.
    #[error("decode error: {0}")]
    Decode(String),
    /// The caller cancelled the operation; no further attempts were made.
    #[error("operation cancelled")]
    Cancelled,
}

impl ClientError {
    /// Classifies this error for retry decisions.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(err) if err.is_builder() => FailureKind::InvalidRequest,
            Self::Transport(_) => FailureKind::TransportFailure,
            Self::Timeout { .. } => FailureKind::AttemptTimeout,
            Self::Http { status, .. } => classify_status(*status),
            Self::Decode(_) => FailureKind::DecodeFailure,
            Self::Cancelled => FailureKind::Cancelled,
        }
    }

    /// Returns `true` when another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        self.kind().is_retryable()
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
