//! Top-level client

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::task::poller;
use crate::task::types::{TaskOptions, TaskProgress};
use crate::transport::HttpTransport;
use crate::upload::types::{ProgressListener, UploadOptions, UploadSession, UploadStrategy};
use crate::upload::{multipart, single_shot};

/// Client for the task-execution service
///
/// Holds the immutable configuration and the HTTP transport. One instance
/// can serve any number of concurrent task and upload invocations; no
/// operation mutates shared state.
#[derive(Debug)]
pub struct Client {
    transport: HttpTransport,
    config: ClientConfig,
}

impl Client {
    /// Create a client from configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { transport, config })
    }

    /// Create a client from environment variables
    ///
    /// See [`ClientConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()
            .map_err(|e| crate::error::ClientError::Config(e.to_string()))?;
        Self::new(config)
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit a task and wait for its result, using the configured
    /// poll interval and timeout
    pub async fn run_task(
        &self,
        service: &str,
        inputs: Value,
        progress: Option<&dyn TaskProgress>,
    ) -> Result<Value> {
        let options = TaskOptions {
            poll_interval: self.config.poll_interval,
            timeout: self.config.task_timeout,
        };
        self.run_task_with(service, inputs, &options, progress).await
    }

    /// Submit a task and wait for its result with explicit options
    pub async fn run_task_with(
        &self,
        service: &str,
        inputs: Value,
        options: &TaskOptions,
        progress: Option<&dyn TaskProgress>,
    ) -> Result<Value> {
        poller::run_task(&self.transport, service, &inputs, options, progress).await
    }

    /// Upload a file with default options, returning its download URL
    pub async fn upload_file(
        &self,
        file_name: &str,
        data: Vec<u8>,
        progress: Option<&dyn ProgressListener>,
    ) -> Result<String> {
        self.upload_file_with(file_name, data, &UploadOptions::default(), progress)
            .await
    }

    /// Upload a file, returning its download URL
    ///
    /// The size ceiling is enforced during session construction, before any
    /// network access. Payloads at or below the threshold go single-shot,
    /// larger ones take the multipart path.
    pub async fn upload_file_with(
        &self,
        file_name: &str,
        data: Vec<u8>,
        options: &UploadOptions,
        progress: Option<&dyn ProgressListener>,
    ) -> Result<String> {
        let session = UploadSession::new(file_name, data, options.threshold)?;

        tracing::info!(
            file_name = %session.file_name,
            size = session.size,
            strategy = ?session.strategy,
            "Starting upload"
        );

        match session.strategy {
            UploadStrategy::Single => {
                single_shot::upload_single(&self.transport, &session, options, progress).await
            }
            UploadStrategy::Multipart => {
                multipart::upload_multipart(&self.transport, &session, options, progress).await
            }
        }
    }
}
