//! Error type for the NMA client.
//!
//! # Design
//! One enum covers the whole taxonomy: local validation failures (detected
//! before any I/O), encoding and transport failures, non-200 HTTP statuses,
//! and server-reported failures carried in the XML envelope. Each variant
//! owns its diagnostic text, so every call returns a self-contained error —
//! there is no process-wide "last error" slot.
//!
//! The upstream Java library surfaced these as numeric return codes;
//! `notify_code` and `verify_code` reproduce that numbering for callers that
//! want to branch on it (success was `1`).

use std::fmt;

/// Fixed diagnostic used for any non-200 HTTP status, kept verbatim from
/// the upstream library.
pub(crate) const SERVER_STATUS_MESSAGE: &str = "There was a problem contacting NMA Servers. \
    HTTP Response code different than 200(OK). Try again or contact support@nma.bz if it persists.";

/// Errors returned by `NmaClient` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NmaError {
    /// Application name is empty or longer than 256 characters.
    InvalidApplication,

    /// Event text is empty or longer than 1000 characters.
    InvalidEvent,

    /// Description is empty or longer than 10000 characters.
    InvalidDescription,

    /// Priority is outside [-2, 2].
    InvalidPriority,

    /// At least one comma-separated API key is not exactly 48 characters.
    InvalidApiKey,

    /// A developer key was supplied but is not exactly 48 characters.
    InvalidDeveloperKey,

    /// The request body could not be serialized. Distinct from validation:
    /// the fields were acceptable but encoding them failed.
    Encode(String),

    /// The HTTP exchange itself failed (connect, send, or read).
    Transport(String),

    /// The server replied with a status other than 200; the body is not
    /// inspected.
    ServerStatus(u16),

    /// HTTP 200 but the XML envelope reported a failure. Carries the error
    /// element's text, or a parse diagnostic if the envelope itself was
    /// unreadable.
    Api(String),
}

impl NmaError {
    /// Numeric code for a failed `notify`, matching the upstream scheme.
    pub fn notify_code(&self) -> i32 {
        match self {
            NmaError::InvalidApplication => -1,
            NmaError::InvalidEvent => -2,
            NmaError::InvalidDescription => -3,
            NmaError::InvalidPriority => -4,
            NmaError::InvalidApiKey => -5,
            NmaError::InvalidDeveloperKey => -6,
            NmaError::Encode(_) | NmaError::Transport(_) => -7,
            NmaError::ServerStatus(_) => -8,
            NmaError::Api(_) => -9,
        }
    }

    /// Numeric code for a failed `verify`. The upstream doc comment claimed
    /// a 5-code scheme but the implementation fell through to notify's
    /// -7/-8/-9; this follows the runtime behavior.
    pub fn verify_code(&self) -> i32 {
        match self {
            NmaError::InvalidApiKey => -1,
            NmaError::InvalidDeveloperKey => -2,
            other => other.notify_code(),
        }
    }
}

impl fmt::Display for NmaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NmaError::InvalidApplication => {
                write!(f, "application must have between 1 and 256 characters")
            }
            NmaError::InvalidEvent => {
                write!(f, "event must have between 1 and 1000 characters")
            }
            NmaError::InvalidDescription => {
                write!(f, "description must have between 1 and 10000 characters")
            }
            NmaError::InvalidPriority => {
                write!(f, "priority must be one of -2, -1, 0, 1, 2")
            }
            NmaError::InvalidApiKey => {
                write!(f, "one or more API keys are not 48 characters long")
            }
            NmaError::InvalidDeveloperKey => {
                write!(f, "developer key is not 48 characters long")
            }
            NmaError::Encode(msg) => write!(f, "could not encode request: {msg}"),
            NmaError::Transport(msg) => write!(f, "transport error: {msg}"),
            NmaError::ServerStatus(_) => f.write_str(SERVER_STATUS_MESSAGE),
            NmaError::Api(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for NmaError {}
