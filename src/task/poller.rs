//! Task poller
//!
//! Submits a task and drives an explicit poll loop until a terminal state
//! or the client-side timeout. One timeout check per iteration, at the top,
//! before the status read: a task that only finishes after the deadline is
//! reported as timed out, and the final interval may overshoot the deadline
//! by up to one poll interval.

use std::time::Instant;

use serde_json::Value;
use tokio::time::sleep;

use crate::error::{ClientError, Result};
use crate::task::types::{TaskOptions, TaskProgress, TaskState};
use crate::transport::ApiTransport;

/// Submit a task and wait for its result
pub async fn run_task<T: ApiTransport + ?Sized>(
    transport: &T,
    service: &str,
    inputs: &Value,
    options: &TaskOptions,
    progress: Option<&dyn TaskProgress>,
) -> Result<Value> {
    let submitted = transport.submit_task(service, inputs).await?;
    if !submitted.success {
        return Err(ClientError::Submission(format!(
            "service {service} rejected the task"
        )));
    }

    tracing::info!(
        session_id = %submitted.session_id,
        service = %service,
        "Task submitted"
    );

    wait_for_task(transport, service, &submitted.session_id, options, progress).await
}

/// Poll a submitted task until a terminal state or timeout
///
/// Transport failures during polling abort the wait immediately; they are
/// not retried.
pub async fn wait_for_task<T: ApiTransport + ?Sized>(
    transport: &T,
    service: &str,
    session_id: &str,
    options: &TaskOptions,
    progress: Option<&dyn TaskProgress>,
) -> Result<Value> {
    let started = Instant::now();

    loop {
        if started.elapsed() > options.timeout {
            tracing::warn!(
                session_id = %session_id,
                timeout_secs = options.timeout.as_secs(),
                "Task wait timed out"
            );
            return Err(ClientError::TaskTimeout {
                timeout: options.timeout,
            });
        }

        let status = transport.task_status(service, session_id).await?;

        if let (Some(listener), Some(percentage)) = (progress, status.progress) {
            listener.on_progress(percentage);
        }

        match status.state {
            TaskState::Completed => {
                let data = match status.data {
                    Some(data) if !data.is_null() => data,
                    _ => {
                        return Err(ClientError::CompletedWithoutData);
                    }
                };

                // Final notification is forced regardless of the last
                // reported percentage.
                if let Some(listener) = progress {
                    listener.on_progress(100);
                }

                tracing::info!(session_id = %session_id, "Task completed");
                return Ok(data);
            }
            TaskState::Failed | TaskState::Error => {
                let state = status.state.as_str().to_string();
                let message = status
                    .error
                    .unwrap_or_else(|| "unknown error".to_string());
                tracing::warn!(
                    session_id = %session_id,
                    state = %state,
                    message = %message,
                    "Task failed"
                );
                return Err(ClientError::TaskFailed { state, message });
            }
            TaskState::Pending | TaskState::Processing => {
                sleep(options.poll_interval).await;
            }
        }
    }
}
