//! # Chunk Allocation Task
//!
//! This module defines the `ChunkAllocationTask` which allocates a batch of
//! empty chunks on a worker thread. Allocation is the only step of world
//! generation that fans out: the chunks are independent until their terrain
//! and neighbour links are set, which happens afterwards on the calling thread.

use crate::engine_state::{task_management::task::Task, voxels::chunk::Chunk};

/// Allocates `count` empty chunks.
pub struct ChunkAllocationTask {
    count: usize,
}

impl ChunkAllocationTask {
    /// Creates a task allocating `count` chunks.
    pub fn new(count: usize) -> Self {
        ChunkAllocationTask { count }
    }

    /// Splits `total` chunks over at most `workers` tasks.
    ///
    /// Every task gets `total / tasks` chunks and the first `total % tasks`
    /// tasks take one extra, so the counts always add up to `total`. No task
    /// is created empty.
    pub fn partition(total: usize, workers: usize) -> Vec<ChunkAllocationTask> {
        let tasks = workers.min(total).max(1);
        let (base, remainder) = (total / tasks, total % tasks);
        (0..tasks)
            .map(|i| ChunkAllocationTask::new(base + usize::from(i < remainder)))
            .filter(|task| task.count > 0)
            .collect()
    }

    /// Number of chunks this task allocates.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Task for ChunkAllocationTask {
    type Output = Vec<Chunk>;

    fn process(&self) -> Vec<Chunk> {
        (0..self.count).map(|_| Chunk::default()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(total: usize, workers: usize) -> Vec<usize> {
        ChunkAllocationTask::partition(total, workers)
            .iter()
            .map(ChunkAllocationTask::count)
            .collect()
    }

    #[test]
    fn partition_spreads_the_remainder() {
        assert_eq!(counts(256, 8), vec![32; 8]);
        assert_eq!(counts(10, 4), vec![3, 3, 2, 2]);
    }

    #[test]
    fn small_grids_use_fewer_tasks() {
        assert_eq!(counts(4, 8), vec![1, 1, 1, 1]);
        assert_eq!(counts(1, 8), vec![1]);
        assert!(counts(0, 8).is_empty());
    }

    #[test]
    fn allocated_chunks_are_empty() {
        let chunks = ChunkAllocationTask::new(3).process();
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|chunk| chunk.active_count() == 0 && !chunk.is_dirty()));
    }
}
