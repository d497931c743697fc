//! Upload types and strategy selection

use std::time::Duration;

use crate::error::{ClientError, Result};
use crate::upload::content_type;

// ============================================================================
// Constants
// ============================================================================

/// Default single-shot/multipart threshold: 5MB
pub const DEFAULT_MULTIPART_THRESHOLD: u64 = 5 * 1024 * 1024;

/// Maximum file size: 500MB, checked before any network access
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Default number of part uploads in flight per batch
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Default attempt limit for the single-shot upload
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for the single-shot linear backoff (attempt index x base)
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

// ============================================================================
// Strategy
// ============================================================================

/// How a payload is uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStrategy {
    /// One signed target, one request
    Single,
    /// Negotiate, upload parts, finalize
    Multipart,
}

/// Choose an upload strategy for a payload size
///
/// Pure decision: the absolute ceiling is enforced first, independent of
/// strategy, and is not overridable.
pub fn select_strategy(size: u64, threshold: u64) -> Result<UploadStrategy> {
    if size > MAX_FILE_SIZE {
        return Err(ClientError::FileTooLarge {
            size,
            max: MAX_FILE_SIZE,
        });
    }
    if size <= threshold {
        Ok(UploadStrategy::Single)
    } else {
        Ok(UploadStrategy::Multipart)
    }
}

// ============================================================================
// Session
// ============================================================================

/// Options for one upload invocation
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Payloads at or below this size go single-shot
    pub threshold: u64,

    /// Part uploads in flight per batch
    pub concurrency: usize,

    /// Attempt limit for the single-shot upload
    pub retry_attempts: u32,

    /// Base delay for the single-shot linear backoff
    pub retry_base_delay: Duration,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MULTIPART_THRESHOLD,
            concurrency: DEFAULT_CONCURRENCY,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }
}

/// One upload invocation: immutable payload plus resolved metadata
#[derive(Debug)]
pub struct UploadSession {
    /// Raw payload, held in memory for the whole upload
    pub data: Vec<u8>,

    /// Logical file name as given by the caller
    pub file_name: String,

    /// Resolved type suffix (lowercased, without the dot); an unrecognized
    /// suffix is already coerced to the default here, so negotiation
    /// requests and the content-type header agree
    pub file_suffix: String,

    /// Payload length in bytes
    pub size: u64,

    /// Chosen strategy
    pub strategy: UploadStrategy,
}

impl UploadSession {
    /// Build a session, enforcing the size ceiling before anything else
    pub fn new(file_name: &str, data: Vec<u8>, threshold: u64) -> Result<Self> {
        let size = data.len() as u64;
        let strategy = select_strategy(size, threshold)?;

        Ok(Self {
            data,
            file_name: file_name.to_string(),
            file_suffix: content_type::resolve_suffix(file_name),
            size,
            strategy,
        })
    }

    /// Content type for the session's suffix
    pub fn content_type(&self) -> &'static str {
        content_type::content_type_for(&self.file_suffix)
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Progress callback payload
///
/// A tagged union: the multipart path reports the structured `Chunked`
/// shape, the single-shot path reports a bare `Percentage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadProgress {
    /// Cumulative multipart progress, emitted after each batch
    Chunked {
        uploaded_bytes: u64,
        total_bytes: u64,
        /// Rounded to the nearest integer
        percentage: u8,
        uploaded_chunks: usize,
        total_chunks: usize,
    },
    /// Bare percentage from the single-shot path
    Percentage(u8),
}

/// Callback trait for upload progress reporting
pub trait ProgressListener: Send + Sync {
    fn on_progress(&self, progress: &UploadProgress);
}

impl<F> ProgressListener for F
where
    F: Fn(&UploadProgress) + Send + Sync,
{
    fn on_progress(&self, progress: &UploadProgress) {
        self(progress)
    }
}
