//! Core algorithm trait definitions for the min-cut tree toolkit
//!
//! This module establishes the shared vocabulary of the crate: the original
//! vertex identifier, the error type every fallible operation returns, the
//! execution metrics collected during a run, and the `Algorithm` trait that
//! whole-matrix computations implement.
//!
//! # Key Design Principles
//! - Original vertex ids are a newtype, never mixed with arena handles
//! - Lookups that miss are `Option::None`, never errors
//! - Observers are optional and never change the computed result

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::FlowError;
use crate::data_structures::graph::Capacity;
use crate::data_structures::matrix::CapacityMatrix;
use crate::execution::tracer::ExecutionTracer;

/// Original vertex identifier, the row/column index of the input matrix
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Comprehensive error types for algorithm operations
#[derive(Debug, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid node: {0}")]
    InvalidNode(NodeId),

    #[error("Invalid graph state: {0}")]
    InvalidGraph(String),

    #[error("Matrix is not square: row {row} has {len} entries, expected {rows}")]
    NotSquare { rows: usize, row: usize, len: usize },

    #[error("Self-loop at vertex {node} with weight {weight}")]
    NonZeroDiagonal { node: usize, weight: Capacity },

    #[error("Edge weights differ between {i}-{j} and {j}-{i}")]
    Asymmetric { i: usize, j: usize },

    #[error("Negative weight {weight} on edge {i}-{j}")]
    NegativeCapacity { i: usize, j: usize, weight: Capacity },

    #[error("Total capacity exceeds {limit} at edge {i}-{j}")]
    CapacityOverflow { i: usize, j: usize, limit: Capacity },

    #[error("Refinement invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Flow computation failed: {0}")]
    Flow(#[from] FlowError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AlgorithmError {
    fn from(err: serde_json::Error) -> Self {
        AlgorithmError::Serialization(err.to_string())
    }
}

/// Algorithm execution metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    /// Refinement rounds completed (one max-flow computation each)
    pub rounds: usize,
    /// Augmenting paths pushed across all max-flow computations
    pub augmenting_paths: usize,
    /// Largest auxiliary network solved, in vertices
    pub max_network_size: usize,
    /// Wall-clock duration of the last run
    pub execution_time: Duration,
}

/// Whole-matrix computation with an optional observer
///
/// # Invariants
/// - State isolation between runs
/// - Deterministic behavior for given inputs and parameters
/// - The result never depends on whether a tracer is attached
pub trait Algorithm: Debug {
    /// Result of one execution
    type Output;

    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., min_cut)
    fn category(&self) -> &'static str;

    /// Returns the algorithm's description with complexity notes
    fn description(&self) -> String;

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String>;

    /// Returns all parameters as strings
    fn parameters(&self) -> HashMap<String, String>;

    /// Executes the algorithm, reporting checkpoints to `tracer` when one is given
    fn execute_with_tracing(
        &mut self,
        matrix: &CapacityMatrix,
        tracer: Option<&mut dyn ExecutionTracer>,
    ) -> Result<Self::Output, AlgorithmError>;

    /// Executes the algorithm without an observer
    fn execute(&mut self, matrix: &CapacityMatrix) -> Result<Self::Output, AlgorithmError> {
        self.execute_with_tracing(matrix, None)
    }
}

/// Performance profiling integration
#[derive(Debug, Default)]
pub struct AlgorithmProfiler {
    metrics: AlgorithmMetrics,
    start_time: Option<Instant>,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.metrics = AlgorithmMetrics::default();
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.metrics.execution_time = start.elapsed();
        }
    }

    pub fn record_round(&mut self) {
        self.record_rounds(1);
    }

    pub fn record_rounds(&mut self, count: usize) {
        self.metrics.rounds += count;
    }

    pub fn record_augmenting_paths(&mut self, count: usize) {
        self.metrics.augmenting_paths += count;
    }

    pub fn observe_network(&mut self, vertex_count: usize) {
        self.metrics.max_network_size = self.metrics.max_network_size.max(vertex_count);
    }

    pub fn get_metrics(&self) -> AlgorithmMetrics {
        self.metrics.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_type_safety() {
        let node1 = NodeId(42);
        let node2 = NodeId(42);
        let node3 = NodeId(43);

        assert_eq!(node1, node2);
        assert_ne!(node1, node3);
        assert_eq!(node1.as_usize(), 42);
        assert_eq!(node3.to_string(), "43");
    }

    #[test]
    fn test_error_messages() {
        let err = AlgorithmError::Asymmetric { i: 1, j: 3 };
        assert_eq!(err.to_string(), "Edge weights differ between 1-3 and 3-1");

        let err = AlgorithmError::NegativeCapacity { i: 0, j: 2, weight: -4 };
        assert_eq!(err.to_string(), "Negative weight -4 on edge 0-2");
    }

    #[test]
    fn test_profiler_accumulates() {
        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        profiler.record_round();
        profiler.record_round();
        profiler.record_augmenting_paths(3);
        profiler.observe_network(4);
        profiler.observe_network(2);
        profiler.stop();

        let metrics = profiler.get_metrics();
        assert_eq!(metrics.rounds, 2);
        assert_eq!(metrics.augmenting_paths, 3);
        assert_eq!(metrics.max_network_size, 4);
    }

    #[test]
    fn test_profiler_records_rounds_in_bulk() {
        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        profiler.record_rounds(10);
        profiler.record_round();
        profiler.record_rounds(0);

        assert_eq!(profiler.get_metrics().rounds, 11);
    }

    #[test]
    fn test_profiler_restart_clears_metrics() {
        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        profiler.record_round();
        profiler.start();
        assert_eq!(profiler.get_metrics().rounds, 0);
    }
}
