//! # Task System Core Traits
//!
//! This module defines the unit of work executed by the
//! [`TaskManager`](super::TaskManager).
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The output travels back tagged with the ticket issued at publish time
//! 4. `TaskManager::join()` hands all outputs back in publish order
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `Task::Output` must be `Send` to be transferred back to the caller
//! - Tasks own their inputs; nothing is shared between workers

/// A unit of work that can be executed on a worker thread.
///
/// Tasks should be self-contained and own all the data they need.
///
/// # Implementation Guidelines
/// - Should be relatively coarse-grained to amortize scheduling overhead
/// - Should avoid blocking operations that could starve other tasks
pub trait Task: Send + 'static {
    /// Value produced by the task.
    type Output: Send + 'static;

    /// Performs the work and returns its output.
    fn process(&self) -> Self::Output;
}

/// The output of a processed task, tagged with its publish ticket.
#[derive(Debug)]
pub struct TaskResult<O> {
    /// Ticket returned by `publish_task`
    pub ticket: usize,
    /// What the task produced
    pub output: O,
}
