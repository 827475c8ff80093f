//! # Core Module
//!
//! Engine-agnostic building blocks used by the voxel systems.
//!
//! ## Key Components
//! - `SparseSet`: Fixed-capacity integer set with O(1) insert/delete/search and dense iteration
//! - `common_utils`: Random helpers and Poisson-disc point scattering
//!
//! ## Usage
//! ```rust
//! use voxel_wasteland::core::SparseSet;
//!
//! let mut alive = SparseSet::new(1000, 64);
//! alive.insert(12);
//! assert!(alive.contains(12));
//! ```

pub mod common_utils;
pub mod sparse_set;

pub use sparse_set::SparseSet;
