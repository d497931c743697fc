//! taskwire
//!
//! Async client for a remote task-execution service. Two independent
//! capabilities:
//!
//! - **Tasks**: submit a compute job to a named service, then poll its
//!   status until a terminal state or a client-side timeout, with progress
//!   forwarding along the way.
//! - **Uploads**: push a binary payload to cloud storage through the
//!   service's signed-URL endpoints, single-shot for small payloads and a
//!   negotiate/upload-parts/finalize multipart protocol for large ones.
//!
//! # Example
//!
//! ```no_run
//! use taskwire::{Client, ClientConfig};
//!
//! # async fn example() -> taskwire::Result<()> {
//! let client = Client::new(ClientConfig::new(
//!     "https://api.example.com/v1",
//!     "my-api-token",
//! ))?;
//!
//! let url = client
//!     .upload_file("frame.png", std::fs::read("frame.png").unwrap(), None)
//!     .await?;
//!
//! let result = client
//!     .run_task(
//!         "render",
//!         serde_json::json!({ "source": url }),
//!         Some(&|pct: u8| println!("{pct}%")),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod task;
pub mod transport;
pub mod upload;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result, TransportError, UploadPhase};
pub use task::{TaskOptions, TaskProgress, TaskState};
pub use upload::{
    ProgressListener, UploadOptions, UploadProgress, UploadSession, UploadStrategy,
};
