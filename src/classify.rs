//! Failure classification for retry decisions.
//!
//! Every terminal outcome of an attempt maps onto one [`FailureKind`]; the
//! retry loop consults [`FailureKind::is_retryable`] and nothing else.

/// Tagged outcome of a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection or transport failure before a response was obtained.
    TransportFailure,
    /// The request could not be built (malformed URL, bad header).
    InvalidRequest,
    /// The per-attempt timeout elapsed.
    AttemptTimeout,
    /// HTTP 408 or any 5xx.
    TransientStatus,
    /// Any other non-success status.
    ClientStatus,
    /// A success response whose body could not be decoded.
    DecodeFailure,
    /// Caller-issued cancellation.
    Cancelled,
}

impl FailureKind {
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::TransportFailure | Self::AttemptTimeout | Self::TransientStatus
        )
    }
}

/// Classifies a non-success HTTP status code.
pub fn classify_status(status: u16) -> FailureKind {
    match status {
        408 | 500..=599 => FailureKind::TransientStatus,
        _ => FailureKind::ClientStatus,
    }
}
