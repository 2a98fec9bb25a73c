//! Maximum Flow / Minimum Cut Implementation
//!
//! This module implements the shortest-augmenting-path method (Edmonds-Karp)
//! on the mirrored-record graph model. Every undirected edge is two arcs
//! whose residual capacities move in opposite directions when flow is pushed,
//! which lets later paths cancel earlier flow.
//!
//! # Algorithmic Complexity
//!
//! - Each augmenting path is a fewest-edge path found by breadth-first search
//! - At most O(V·E) augmentations, O(V·E²) overall
//!
//! # Cut Extraction
//!
//! Once no augmenting path remains, the sink side is every vertex that can
//! still reach the sink along arcs with positive residual capacity and the
//! source side is the complement. All arcs from the source side into the sink
//! side are saturated, so the crossing capacity equals the flow value.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, HashSet, VecDeque};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::data_structures::graph::{set_difference, Capacity, EdgeRecord, Graph};
use crate::data_structures::vertex::VertexHandle;

/// Flow value type
pub type Flow = Capacity;

/// Result of one max-flow computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    /// Source vertex
    pub source: VertexHandle,
    /// Sink vertex
    pub sink: VertexHandle,
    /// Maximum flow value between source and sink
    pub max_flow: Flow,
    /// Side of the cut containing the source
    pub source_side: Vec<VertexHandle>,
    /// Side of the cut containing the sink
    pub sink_side: Vec<VertexHandle>,
}

/// Flow algorithm errors
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Vertex {0:?} is not part of the network")]
    InvalidVertex(VertexHandle),
    #[error("Source and sink are the same vertex {0:?}")]
    IdenticalTerminals(VertexHandle),
    #[error("Flow value exceeds the capacity range")]
    Overflow,
}

/// Breadth-first search tree with parent pointers
#[derive(Debug, Default)]
struct SearchTree {
    /// Visit order, starting with the root
    order: Vec<VertexHandle>,
    /// Parent pointer per visited vertex except the root
    parent: HashMap<VertexHandle, VertexHandle>,
}

/// Edmonds-Karp maximum flow solver
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolver {
    /// Augmenting paths pushed by the last `solve`
    augmenting_paths: usize,
}

impl MaxFlowSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Augmenting paths pushed by the most recent computation
    pub fn augmenting_paths(&self) -> usize {
        self.augmenting_paths
    }

    /// Computes the maximum flow from `source` to `sink` and the matching cut.
    ///
    /// The network's capacities are restored before returning, so the same
    /// network can be solved again for another pair.
    pub fn solve(
        &mut self,
        network: &mut Graph,
        source: VertexHandle,
        sink: VertexHandle,
    ) -> Result<MinCut, FlowError> {
        for terminal in [source, sink] {
            if !network.contains(terminal) {
                return Err(FlowError::InvalidVertex(terminal));
            }
        }
        if source == sink {
            return Err(FlowError::IdenticalTerminals(source));
        }

        self.augmenting_paths = 0;
        let mut max_flow: Flow = 0;

        loop {
            let search = breadth_first(network, source, Some(sink), has_residual);
            if !search.parent.contains_key(&sink) {
                break;
            }

            let path = trace_back(&search, sink);
            let bottleneck = path
                .iter()
                .filter_map(|&(from, to)| network.edge(from, to).map(|e| e.capacity))
                .min()
                .unwrap_or(0);
            if bottleneck <= 0 {
                break;
            }

            // mirror records grow by the pushed amount and must stay in range
            let mirrors_fit = path.iter().all(|&(from, to)| {
                network
                    .edge(to, from)
                    .map_or(true, |mirror| mirror.capacity.checked_add(bottleneck).is_some())
            });
            let Some(total) = max_flow.checked_add(bottleneck).filter(|_| mirrors_fit) else {
                network.restore_capacities();
                return Err(FlowError::Overflow);
            };

            for &(from, to) in &path {
                if let Some(forward) = network.edge_mut(from, to) {
                    forward.capacity -= bottleneck;
                    forward.flow += bottleneck;
                }
                if let Some(mirror) = network.edge_mut(to, from) {
                    mirror.capacity += bottleneck;
                    mirror.flow -= bottleneck;
                }
            }

            max_flow = total;
            self.augmenting_paths += 1;
            trace!(
                "augmenting path of {} arcs carries {} (total {})",
                path.len(),
                bottleneck,
                max_flow
            );
        }

        // the cut must be read off the saturated residual network
        let sink_side = breadth_first(network, sink, None, feeds_current).order;
        let source_side = set_difference(network.vertices(), &sink_side);
        network.restore_capacities();

        Ok(MinCut {
            source,
            sink,
            max_flow,
            source_side,
            sink_side,
        })
    }

    /// Maximum flow value only
    pub fn max_flow(
        &mut self,
        network: &mut Graph,
        source: VertexHandle,
        sink: VertexHandle,
    ) -> Result<Flow, FlowError> {
        self.solve(network, source, sink).map(|cut| cut.max_flow)
    }
}

/// Arc `current → record.target` still has room
fn has_residual(_: &Graph, _: VertexHandle, record: &EdgeRecord) -> bool {
    record.capacity > 0
}

/// Arc `record.target → current` still has room
fn feeds_current(network: &Graph, current: VertexHandle, record: &EdgeRecord) -> bool {
    network
        .edge(record.target, current)
        .map_or(false, |mirror| mirror.capacity > 0)
}

/// BFS from `root` over admissible records, stopping as soon as `stop_at` is reached
fn breadth_first<F>(
    network: &Graph,
    root: VertexHandle,
    stop_at: Option<VertexHandle>,
    admissible: F,
) -> SearchTree
where
    F: Fn(&Graph, VertexHandle, &EdgeRecord) -> bool,
{
    let mut tree = SearchTree {
        order: vec![root],
        parent: HashMap::new(),
    };
    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        for record in network.edges(current) {
            let next = record.target;
            if visited.contains(&next) || !admissible(network, current, record) {
                continue;
            }
            visited.insert(next);
            tree.parent.insert(next, current);
            tree.order.push(next);
            if Some(next) == stop_at {
                return tree;
            }
            queue.push_back(next);
        }
    }
    tree
}

/// Arcs `(from, to)` of the tree path ending at `end`, listed from `end` backwards
fn trace_back(tree: &SearchTree, end: VertexHandle) -> Vec<(VertexHandle, VertexHandle)> {
    let mut path = Vec::new();
    let mut current = end;
    while let Some(&parent) = tree.parent.get(&current) {
        path.push((parent, current));
        current = parent;
    }
    path
}
