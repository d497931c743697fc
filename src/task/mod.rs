//! Task submission and completion waiting

pub mod poller;
pub mod types;

pub use poller::{run_task, wait_for_task};
pub use types::{TaskOptions, TaskProgress, TaskState};
