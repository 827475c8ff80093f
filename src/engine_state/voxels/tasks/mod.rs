//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation. They run on
//! the [`TaskManager`](crate::engine_state::task_management::TaskManager) worker
//! pool while the caller blocks on the join.

pub mod chunk_allocation_task;
