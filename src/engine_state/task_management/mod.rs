//! # Task Management System
//!
//! This module provides a small worker pool for executing independent tasks
//! on background threads and collecting their outputs in order.
//!
//! ## Architecture Overview
//!
//! The task management system consists of several key components:
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed on a worker
//! - `TaskResult`: The output of a completed task, tagged with its ticket
//! - `TaskChannel`: Communication channel between the caller and one worker thread
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send back their outputs
//! 4. `process_completed_tasks()` collects finished outputs and frees the channels
//! 5. `process_queued_tasks()` hands waiting tasks to freed channels
//! 6. `join()` drives both until everything finished, then returns outputs in publish order
//!
//! A manager with zero workers processes every task inline at publish time.
//!
//! ## Example Usage
//! ```rust
//! use voxel_wasteland::engine_state::task_management::{task::Task, TaskManager};
//!
//! struct Square(u64);
//!
//! impl Task for Square {
//!     type Output = u64;
//!     fn process(&self) -> u64 {
//!         self.0 * self.0
//!     }
//! }
//!
//! let mut task_manager = TaskManager::new(2);
//! for n in 1..=4 {
//!     task_manager.publish_task(Square(n));
//! }
//! assert_eq!(task_manager.join().unwrap(), vec![1, 4, 9, 16]);
//! ```

pub mod task;

use std::collections::VecDeque;
use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, error};
use task::{Task, TaskResult};

/// Failure while running tasks on the worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// A worker thread panicked while processing a task.
    WorkerPanicked { worker: usize },
    /// A worker hung up before returning all of its results.
    WorkerDisconnected { worker: usize },
    /// Fewer outputs were collected than tasks were published.
    MissingResults { expected: usize, received: usize },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::WorkerPanicked { worker } => write!(f, "worker {worker} panicked"),
            TaskError::WorkerDisconnected { worker } => {
                write!(f, "worker {worker} disconnected with tasks in flight")
            }
            TaskError::MissingResults { expected, received } => {
                write!(f, "expected {expected} task results, received {received}")
            }
        }
    }
}

impl std::error::Error for TaskError {}

/// A communication channel between the caller and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tickets and tasks to the worker
/// - `result_receiver`: Receives tagged outputs from the worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `worker`: Handle to the worker thread, joined on shutdown
struct TaskChannel<T: Task> {
    task_sender: Sender<(usize, T)>,
    result_receiver: Receiver<TaskResult<T::Output>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Queuing tasks when all workers are busy
/// - Collecting outputs and returning them in publish order
pub struct TaskManager<T: Task> {
    channels: Vec<TaskChannel<T>>,
    queued_tasks: VecDeque<(usize, T)>,
    completed: Vec<TaskResult<T::Output>>,
    current_channel: usize,
    next_ticket: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Additional tasks wait in the manager's queue until a channel frees up.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl<T: Task> TaskManager<T> {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create. Zero runs tasks inline.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        if num_workers > 0 {
            debug!(
                "Spawning {num_workers} workers, available parallelism: {:?}",
                thread::available_parallelism()
            );
        }

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<(usize, T)>();
            let (result_tx, result_rx) = channel::<TaskResult<T::Output>>();

            let worker = thread::spawn(move || {
                while let Ok((ticket, task)) = task_rx.recv() {
                    let output = task.process();
                    if result_tx.send(TaskResult { ticket, output }).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            completed: Vec::new(),
            current_channel: 0,
            next_ticket: 0,
        }
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of tasks waiting for a free worker.
    pub fn queued_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was sent
    /// - `Err((ticket, task))` if the worker disconnected, so the task can be requeued
    fn try_send_task(&mut self, ticket: usize, task: T, channel_idx: usize) -> Result<(), (usize, T)> {
        match self.channels[channel_idx].task_sender.send((ticket, task)) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(returned) => Err(returned.0),
        }
    }

    /// Finds an available worker channel using round-robin from the last used channel.
    ///
    /// # Returns
    /// - `Some(usize)` index of a channel below `MAX_TASKS_IN_FLIGHT`
    /// - `None` if all channels are busy or there are no channels
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|step| (self.current_channel + step) % count)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a new task for execution.
    ///
    /// The task is sent to the next free worker, queued if all workers are
    /// busy, or processed immediately when the manager has no workers.
    ///
    /// # Returns
    /// The ticket identifying the task's position in the output of [`TaskManager::join`].
    pub fn publish_task(&mut self, task: T) -> usize {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        if self.channels.is_empty() {
            let output = task.process();
            self.completed.push(TaskResult { ticket, output });
            return ticket;
        }

        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(ticket, task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(returned) => self.queued_tasks.push_back(returned),
            },
            None => self.queued_tasks.push_back((ticket, task)),
        }
        ticket
    }

    /// Hands queued tasks to free workers in FIFO order.
    ///
    /// Stops at the first task that can't be scheduled.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some((ticket, task)) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(ticket, task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(returned) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(returned);
                    break;
                }
            }
        }
    }

    /// Collects finished outputs without blocking.
    ///
    /// # Returns
    /// The number of outputs collected by this call.
    pub fn process_completed_tasks(&mut self) -> usize {
        let mut collected = 0;
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                self.completed.push(result);
                collected += 1;
            }
        }
        collected
    }

    /// Blocks until every published task finished, shuts the workers down and
    /// returns all outputs in publish order.
    pub fn join(mut self) -> Result<Vec<T::Output>, TaskError> {
        let mut failure = None;

        while failure.is_none() && (!self.queued_tasks.is_empty() || self.in_flight() > 0) {
            self.process_queued_tasks();
            for (worker, channel) in self.channels.iter_mut().enumerate() {
                if channel.num_tasks_in_flight == 0 {
                    continue;
                }
                match channel.result_receiver.recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        self.completed.push(result);
                    }
                    Err(_) => {
                        failure = Some(TaskError::WorkerDisconnected { worker });
                        break;
                    }
                }
            }
            if failure.is_none() && self.in_flight() == 0 && !self.queued_tasks.is_empty() {
                // every worker refused its task
                failure = Some(TaskError::WorkerDisconnected { worker: self.current_channel });
            }
        }

        let expected = self.next_ticket;
        let TaskManager { channels, mut completed, .. } = self;

        for (worker, channel) in channels.into_iter().enumerate() {
            drop(channel.task_sender);
            if channel.worker.join().is_err() {
                error!("Task worker {worker} panicked");
                failure = Some(TaskError::WorkerPanicked { worker });
            }
        }

        if let Some(error) = failure {
            return Err(error);
        }
        if completed.len() != expected {
            return Err(TaskError::MissingResults {
                expected,
                received: completed.len(),
            });
        }

        completed.sort_by_key(|result| result.ticket);
        Ok(completed.into_iter().map(|result| result.output).collect())
    }

    fn in_flight(&self) -> usize {
        self.channels.iter().map(|channel| channel.num_tasks_in_flight).sum()
    }
}
