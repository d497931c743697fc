//! File upload: strategy selection, chunking, and the single-shot and
//! multipart upload paths

pub mod chunker;
pub mod content_type;
pub mod multipart;
pub mod scheduler;
pub mod single_shot;
pub mod types;

pub use types::{
    ProgressListener, UploadOptions, UploadProgress, UploadSession, UploadStrategy,
};
