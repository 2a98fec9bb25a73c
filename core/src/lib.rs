//! Gomory-Hu min-cut trees for undirected capacity graphs
//!
//! Given a symmetric n×n capacity matrix, the builder produces a weighted
//! tree on the same n vertices in which, for every pair (u, v), the lightest
//! edge on the tree path between u and v equals the minimum u-v cut of the
//! input graph. The tree is computed with n-1 max-flow computations on
//! progressively contracted networks.
//!
//! ```no_run
//! use gomory_hu_core::{build_gomory_hu_tree, CapacityMatrix, NodeId};
//!
//! let matrix = CapacityMatrix::from_rows(vec![
//!     vec![0, 3, 1],
//!     vec![3, 0, 2],
//!     vec![1, 2, 0],
//! ])?;
//! let tree = build_gomory_hu_tree(&matrix)?;
//! assert_eq!(tree.min_cut(NodeId(0), NodeId(2)), Some(3));
//! # Ok::<(), gomory_hu_core::AlgorithmError>(())
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod execution;
pub mod validation;

pub use crate::algorithm::graph::{
    GomoryHuBuilder, GomoryHuConfig, GomoryHuTree, GroupSelection, MaxFlowSolver, MinCut,
    PairSelection, TreeEdge,
};
pub use crate::algorithm::traits::{Algorithm, AlgorithmError, AlgorithmMetrics, NodeId};
pub use crate::data_structures::graph::Capacity;
pub use crate::data_structures::matrix::CapacityMatrix;
pub use crate::execution::tracer::{ExecutionTracer, LogTracer, RecordingTracer, TraceEvent};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for fallible crate operations
pub type Result<T> = std::result::Result<T, AlgorithmError>;

/// Builds the Gomory-Hu tree of `matrix` with the default configuration
pub fn build_gomory_hu_tree(matrix: &CapacityMatrix) -> Result<GomoryHuTree> {
    GomoryHuBuilder::new().build(matrix)
}
