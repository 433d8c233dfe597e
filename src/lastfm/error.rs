use thiserror::Error;

/// Error types for the Last.fm services
///
/// The variants distinguish the recovery policy a caller should apply:
/// `Transport` and `Protocol` failures are retryable service errors,
/// `Persistence` means a fetched token is not durably stored, and
/// `Invariant` marks corrupted local state or misuse that must not be
/// retried automatically.
#[derive(Error, Debug)]
pub enum LastfmError {
    /// Network or timeout failure, message passed through from the transport
    #[error("{0}")]
    Transport(String),

    /// The service returned a failure marker or an expected field was absent
    #[error("{0}")]
    Protocol(String),

    /// The session token could not be read from or written to disk
    #[error("{0}")]
    Persistence(String),

    /// Corrupted local state or a call that violates a service precondition
    #[error("{0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, LastfmError>;
