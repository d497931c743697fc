//! Task types for submission and polling

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_POLL_INTERVAL, DEFAULT_TASK_TIMEOUT};

/// Remote-reported task state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Queued, not yet started
    Pending,
    /// Running
    Processing,
    /// Terminal success (requires a result payload)
    Completed,
    /// Terminal failure reported by the service
    Failed,
    /// Terminal failure reported by the service
    Error,
}

impl TaskState {
    /// Whether no further state transitions occur
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Error)
    }

    /// The literal state string as the service reports it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }
}

/// Options for one submit-and-wait invocation
#[derive(Debug, Clone)]
pub struct TaskOptions {
    /// Delay between status polls
    pub poll_interval: Duration,

    /// Wall-clock limit since submission; checked at the top of every poll
    /// iteration, so the last interval may overshoot by up to one interval
    pub timeout: Duration,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TASK_TIMEOUT,
        }
    }
}

/// Callback for task progress percentages
///
/// Reported percentages are forwarded verbatim; on completion a final `100`
/// is always delivered.
pub trait TaskProgress: Send + Sync {
    fn on_progress(&self, percentage: u8);
}

impl<F> TaskProgress for F
where
    F: Fn(u8) + Send + Sync,
{
    fn on_progress(&self, percentage: u8) {
        self(percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wire_format() {
        assert_eq!(
            serde_json::from_str::<TaskState>("\"pending\"").unwrap(),
            TaskState::Pending
        );
        assert_eq!(
            serde_json::from_str::<TaskState>("\"error\"").unwrap(),
            TaskState::Error
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TaskState::Pending.is_terminal());
        assert!(!TaskState::Processing.is_terminal());
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Error.is_terminal());
    }
}
