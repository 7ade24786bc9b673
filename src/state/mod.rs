//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `TaskState`: lifecycle of a single crawl task
//! - `TaskError`: per-task rejection and failure reasons

mod task_state;

pub use task_state::{TaskError, TaskState};
