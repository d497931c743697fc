//! Error types for the taskwire client

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Client-wide result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error type
///
/// A closed enumeration: every failure the library can surface is one of
/// these variants, each carrying its own typed payload. Nothing is swallowed
/// or logged-and-continued.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Client configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Task submission was rejected by the service
    #[error("Submission rejected: {0}")]
    Submission(String),

    /// Client-side wait exceeded the configured timeout
    #[error("Task timed out after {timeout:?}")]
    TaskTimeout { timeout: Duration },

    /// The service reported a terminal failure state for the task
    #[error("Task {state}: {message}")]
    TaskFailed { state: String, message: String },

    /// The task reached the completed state but carried no result payload
    #[error("Task completed without data")]
    CompletedWithoutData,

    /// Pre-flight size ceiling violation, checked before any network access
    #[error("File too large: {size} bytes (max: {max})")]
    FileTooLarge { size: u64, max: u64 },

    /// The negotiate phase returned a non-positive part size
    #[error("Invalid part size: {0}")]
    InvalidPartSize(u64),

    /// A multipart phase (negotiate/authorize/upload/finalize) failed
    #[error("{phase} failed with status {status}: {body}")]
    UploadPhase {
        phase: UploadPhase,
        status: u16,
        body: String,
    },

    /// The authorize phase returned a different number of URLs than requested
    #[error("Part count mismatch: requested {requested}, got {returned}")]
    PartCountMismatch { requested: usize, returned: usize },

    /// A part upload succeeded but the response carried no integrity token
    #[error("Missing integrity token for part {part_number}")]
    MissingIntegrityToken { part_number: u32 },

    /// An HTTP call could not complete or returned an unexpected status
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Which phase of the multipart protocol failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Negotiate,
    Authorize,
    Upload,
    Finalize,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadPhase::Negotiate => "Upload negotiation",
            UploadPhase::Authorize => "Part authorization",
            UploadPhase::Upload => "Part upload",
            UploadPhase::Finalize => "Upload finalization",
        };
        f.write_str(name)
    }
}

/// Transport-level errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(UploadPhase::Negotiate.to_string(), "Upload negotiation");
        assert_eq!(UploadPhase::Finalize.to_string(), "Upload finalization");
    }

    #[test]
    fn test_upload_phase_error_message() {
        let err = ClientError::UploadPhase {
            phase: UploadPhase::Negotiate,
            status: 503,
            body: "service unavailable".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Upload negotiation"));
        assert!(msg.contains("503"));
        assert!(msg.contains("service unavailable"));
    }

    #[test]
    fn test_timeout_carries_configured_value() {
        let err = ClientError::TaskTimeout {
            timeout: Duration::from_secs(120),
        };
        match err {
            ClientError::TaskTimeout { timeout } => {
                assert_eq!(timeout, Duration::from_secs(120));
            }
            _ => unreachable!(),
        }
    }
}
