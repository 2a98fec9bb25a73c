//! Gomory-Hu Min-Cut Tree Construction
//!
//! This module drives the Gomory-Hu refinement: the tree starts as a single
//! group holding every original vertex, and each round splits one group with
//! at least two members along a minimum cut computed on the contracted
//! auxiliary network. After exactly n-1 rounds every group is a singleton
//! and the tree, projected back onto original ids, is the min-cut tree.
//!
//! # Theoretical Foundation
//!
//! For any two members s, t of a group X, a minimum s-t cut in the network
//! where every tree branch off X is collapsed to one vertex is also a minimum
//! s-t cut of the original graph, and it never separates a collapsed branch.
//! Each branch therefore lies wholly on one side and can be reattached to the
//! half of X on that side.
//!
//! # Algorithmic Complexity
//!
//! - n-1 rounds, each one max-flow computation on at most n vertices
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::contraction::contract;
use crate::algorithm::graph::max_flow::MaxFlowSolver;
use crate::algorithm::traits::{
    Algorithm, AlgorithmError, AlgorithmMetrics, AlgorithmProfiler, NodeId,
};
use crate::data_structures::graph::{set_difference, set_intersection, Capacity, Graph};
use crate::data_structures::matrix::CapacityMatrix;
use crate::data_structures::vertex::{VertexArena, VertexHandle};
use crate::execution::tracer::{ExecutionTracer, TraceEvent};
use crate::validation::input::{check_total_capacity, validate_matrix};

/// Which two members of the selected group become source and sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairSelection {
    /// First and second member
    #[default]
    FirstTwo,
    /// Last two members
    LastTwo,
    /// First and last member
    FirstAndLast,
}

impl PairSelection {
    /// Two distinct entries of `members`, `None` if there are fewer than two
    pub fn pick(self, members: &[VertexHandle]) -> Option<(VertexHandle, VertexHandle)> {
        let len = members.len();
        if len < 2 {
            return None;
        }
        Some(match self {
            PairSelection::FirstTwo => (members[0], members[1]),
            PairSelection::LastTwo => (members[len - 2], members[len - 1]),
            PairSelection::FirstAndLast => (members[0], members[len - 1]),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PairSelection::FirstTwo => "first_two",
            PairSelection::LastTwo => "last_two",
            PairSelection::FirstAndLast => "first_and_last",
        }
    }
}

impl FromStr for PairSelection {
    type Err = AlgorithmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "first_two" => Ok(PairSelection::FirstTwo),
            "last_two" => Ok(PairSelection::LastTwo),
            "first_and_last" => Ok(PairSelection::FirstAndLast),
            _ => Err(AlgorithmError::InvalidParameter {
                name: "pair_selection".to_string(),
                reason: format!("unknown strategy '{}'", value),
            }),
        }
    }
}

/// Which non-singleton group is refined next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSelection {
    /// First group in tree order with two or more members
    #[default]
    FirstFound,
    /// Group with the most members, earliest on ties
    Largest,
}

impl GroupSelection {
    /// Next group to refine, `None` once every group is a singleton
    pub fn select(self, arena: &VertexArena, tree: &Graph) -> Option<VertexHandle> {
        let mut candidates = tree
            .vertices()
            .iter()
            .copied()
            .filter(|&v| arena.members(v).len() >= 2);
        match self {
            GroupSelection::FirstFound => candidates.next(),
            GroupSelection::Largest => candidates.fold(None, |best, v| match best {
                Some(b) if arena.members(b).len() >= arena.members(v).len() => Some(b),
                _ => Some(v),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupSelection::FirstFound => "first_found",
            GroupSelection::Largest => "largest",
        }
    }
}

impl FromStr for GroupSelection {
    type Err = AlgorithmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "first_found" => Ok(GroupSelection::FirstFound),
            "largest" => Ok(GroupSelection::Largest),
            _ => Err(AlgorithmError::InvalidParameter {
                name: "group_selection".to_string(),
                reason: format!("unknown strategy '{}'", value),
            }),
        }
    }
}

/// Configuration for the tree builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GomoryHuConfig {
    /// Terminal pair choice inside a group
    pub pair_selection: PairSelection,
    /// Order in which groups are refined
    pub group_selection: GroupSelection,
    /// Check symmetry, diagonal and signs before building
    pub validate_input: bool,
    /// Check max-flow/min-cut duality after every round
    pub verify_cuts: bool,
}

impl Default for GomoryHuConfig {
    fn default() -> Self {
        Self {
            pair_selection: PairSelection::FirstTwo,
            group_selection: GroupSelection::FirstFound,
            validate_input: true,
            verify_cuts: false,
        }
    }
}

impl GomoryHuConfig {
    /// Parses a JSON object; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, AlgorithmError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Edge of the finished tree, `u < v`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeEdge {
    pub u: NodeId,
    pub v: NodeId,
    pub weight: Capacity,
}

/// Finished Gomory-Hu tree over the original vertex ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GomoryHuTree {
    /// Adjacency matrix indexed like the input
    matrix: CapacityMatrix,
    /// Tree edges, including zero-weight edges of disconnected inputs
    edges: Vec<TreeEdge>,
}

impl GomoryHuTree {
    pub fn matrix(&self) -> &CapacityMatrix {
        &self.matrix
    }

    pub fn into_matrix(self) -> CapacityMatrix {
        self.matrix
    }

    pub fn node_count(&self) -> usize {
        self.matrix.size()
    }

    /// Tree edges sorted by endpoints
    pub fn edges(&self) -> &[TreeEdge] {
        &self.edges
    }

    /// Minimum s-t cut value between `u` and `v`: the lightest edge on their tree path.
    ///
    /// `None` for `u == v`, unknown ids, or ids the tree does not connect.
    pub fn min_cut(&self, u: NodeId, v: NodeId) -> Option<Capacity> {
        let n = self.node_count();
        if u == v || u.0 >= n || v.0 >= n {
            return None;
        }

        let mut adjacency: HashMap<NodeId, Vec<(NodeId, Capacity)>> = HashMap::new();
        for edge in &self.edges {
            adjacency.entry(edge.u).or_default().push((edge.v, edge.weight));
            adjacency.entry(edge.v).or_default().push((edge.u, edge.weight));
        }

        // bottleneck from u to every reached vertex
        let mut bottleneck = HashMap::from([(u, Capacity::MAX)]);
        let mut queue = VecDeque::from([u]);
        while let Some(current) = queue.pop_front() {
            let reach = bottleneck[&current];
            for &(next, weight) in adjacency.get(&current).map(Vec::as_slice).unwrap_or(&[]) {
                if !bottleneck.contains_key(&next) {
                    bottleneck.insert(next, reach.min(weight));
                    queue.push_back(next);
                }
            }
        }
        bottleneck.get(&v).copied()
    }

    /// Exactly n-1 edges connecting all n vertices
    pub fn is_spanning_tree(&self) -> bool {
        let n = self.node_count();
        if n == 0 {
            return self.edges.is_empty();
        }
        if self.edges.len() != n - 1 {
            return false;
        }
        (1..n).all(|i| self.min_cut(NodeId(0), NodeId(i)).is_some())
    }

    pub fn to_json(&self) -> Result<String, AlgorithmError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for GomoryHuTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.matrix)
    }
}

/// Gomory-Hu tree builder
#[derive(Debug, Default)]
pub struct GomoryHuBuilder {
    config: GomoryHuConfig,
    solver: MaxFlowSolver,
    profiler: AlgorithmProfiler,
}

impl GomoryHuBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GomoryHuConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GomoryHuConfig {
        &self.config
    }

    /// Metrics of the most recent build
    pub fn metrics(&self) -> AlgorithmMetrics {
        self.profiler.get_metrics()
    }

    /// Builds the tree without tracing
    pub fn build(&mut self, matrix: &CapacityMatrix) -> Result<GomoryHuTree, AlgorithmError> {
        self.execute_with_tracing(matrix, None)
    }

    fn run(
        &mut self,
        matrix: &CapacityMatrix,
        tracer: &mut Option<&mut dyn ExecutionTracer>,
    ) -> Result<GomoryHuTree, AlgorithmError> {
        if self.config.validate_input {
            validate_matrix(matrix)?;
        } else {
            check_total_capacity(matrix)?;
        }

        let mut state = RefinementState::new(matrix);
        emit(tracer, || TraceEvent::Initialized {
            groups: state.groups(),
        });

        let mut round = 0;
        while let Some(group) = self.config.group_selection.select(&state.arena, &state.tree) {
            round += 1;
            emit(tracer, || TraceEvent::RoundStarted {
                round,
                group: state.arena.original_ids(&[group]),
            });

            let mut network = contract(&mut state.arena, &state.base, &mut state.tree, group)?;
            self.profiler.observe_network(network.graph().vertex_count());
            emit(tracer, || TraceEvent::NetworkBuilt {
                round,
                vertices: network
                    .graph()
                    .vertices()
                    .iter()
                    .map(|&v| state.arena.original_ids(&[v]))
                    .collect(),
                matrix: network.graph().to_matrix(network.graph().vertices()),
            });

            let (source, sink) = self
                .config
                .pair_selection
                .pick(network.members())
                .ok_or_else(|| {
                    AlgorithmError::InvariantViolation(format!(
                        "round {} network has fewer than two group members",
                        round
                    ))
                })?;
            let cut = self.solver.solve(network.graph_mut(), source, sink)?;
            self.profiler.record_augmenting_paths(self.solver.augmenting_paths());

            if self.config.verify_cuts {
                let crossing = network.graph().cut_capacity(&cut.source_side, &cut.sink_side);
                if crossing != cut.max_flow {
                    return Err(AlgorithmError::InvariantViolation(format!(
                        "round {}: cut capacity {} differs from flow {}",
                        round, crossing, cut.max_flow
                    )));
                }
            }

            let source_leaves = state.arena.flatten(&cut.source_side);
            emit(tracer, || TraceEvent::CutFound {
                round,
                source: state.arena.original_ids(&[source]),
                sink: state.arena.original_ids(&[sink]),
                max_flow: cut.max_flow,
                source_side: state.arena.original_ids(&cut.source_side),
                sink_side: state.arena.original_ids(&cut.sink_side),
            });

            let reattachments = network
                .branches()
                .iter()
                .map(|branch| {
                    let representative = state
                        .arena
                        .flatten(&[branch.vertex])
                        .first()
                        .copied()
                        .ok_or_else(|| {
                            AlgorithmError::InvariantViolation(format!(
                                "branch at {:?} has no leaves",
                                branch.tree_neighbor
                            ))
                        })?;
                    Ok(Reattachment {
                        neighbor: branch.tree_neighbor,
                        weight: branch.weight,
                        representative,
                    })
                })
                .collect::<Result<Vec<_>, AlgorithmError>>()?;

            network.dispose(&mut state.arena);
            let (size_a, size_b) =
                state.split(group, &source_leaves, cut.max_flow, &reattachments)?;
            self.profiler.record_round();
            debug!(
                "round {}: split group into {} + {} at cut value {}",
                round, size_a, size_b, cut.max_flow
            );
            emit(tracer, || TraceEvent::TreeUpdated {
                round,
                groups: state.groups(),
                matrix: state.tree.to_matrix(state.tree.vertices()),
            });
        }

        let tree = export_tree(&state.arena, &state.tree)?;
        emit(tracer, || TraceEvent::Finished {
            tree: tree.matrix().clone(),
        });
        Ok(tree)
    }
}

impl Algorithm for GomoryHuBuilder {
    type Output = GomoryHuTree;

    fn name(&self) -> &'static str {
        "Gomory-Hu"
    }

    fn category(&self) -> &'static str {
        "min_cut"
    }

    fn description(&self) -> String {
        "Gomory-Hu min-cut tree by n-1 rounds of group splitting, each solving one \
         Edmonds-Karp max flow on the contracted tree: O(n · V·E²)."
            .to_string()
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        let parse_flag = |value: &str| {
            value.parse::<bool>().map_err(|_| AlgorithmError::InvalidParameter {
                name: name.to_string(),
                reason: "must be true or false".to_string(),
            })
        };
        match name {
            "pair_selection" => self.config.pair_selection = value.parse()?,
            "group_selection" => self.config.group_selection = value.parse()?,
            "validate_input" => self.config.validate_input = parse_flag(value)?,
            "verify_cuts" => self.config.verify_cuts = parse_flag(value)?,
            _ => {
                return Err(AlgorithmError::InvalidParameter {
                    name: name.to_string(),
                    reason: "unknown parameter".to_string(),
                })
            }
        }
        Ok(())
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            "pair_selection" => Some(self.config.pair_selection.as_str().to_string()),
            "group_selection" => Some(self.config.group_selection.as_str().to_string()),
            "validate_input" => Some(self.config.validate_input.to_string()),
            "verify_cuts" => Some(self.config.verify_cuts.to_string()),
            _ => None,
        }
    }

    fn parameters(&self) -> HashMap<String, String> {
        ["pair_selection", "group_selection", "validate_input", "verify_cuts"]
            .into_iter()
            .filter_map(|name| self.get_parameter(name).map(|value| (name.to_string(), value)))
            .collect()
    }

    fn execute_with_tracing(
        &mut self,
        matrix: &CapacityMatrix,
        mut tracer: Option<&mut dyn ExecutionTracer>,
    ) -> Result<GomoryHuTree, AlgorithmError> {
        self.profiler.start();
        let result = self.run(matrix, &mut tracer);
        self.profiler.stop();

        if let Ok(tree) = &result {
            let metrics = self.profiler.get_metrics();
            info!(
                "Gomory-Hu tree over {} vertices: {} rounds, {} augmenting paths in {:?}",
                tree.node_count(),
                metrics.rounds,
                metrics.augmenting_paths,
                metrics.execution_time
            );
        }
        result
    }
}

fn emit<F>(tracer: &mut Option<&mut dyn ExecutionTracer>, event: F)
where
    F: FnOnce() -> TraceEvent,
{
    if let Some(tracer) = tracer.as_deref_mut() {
        tracer.record(&event());
    }
}

/// Tree edge to move onto one half of a split group
struct Reattachment {
    /// Tree vertex on the far side of the edge
    neighbor: VertexHandle,
    weight: Capacity,
    /// Any leaf of the branch behind `neighbor`
    representative: VertexHandle,
}

/// Working structures of one build
struct RefinementState {
    arena: VertexArena,
    /// Original graph over leaves
    base: Graph,
    /// Evolving tree over groups of leaves
    tree: Graph,
}

impl RefinementState {
    fn new(matrix: &CapacityMatrix) -> Self {
        let n = matrix.size();
        let mut arena = VertexArena::with_capacity(3 * n + 1);
        let leaves: Vec<_> = (0..n).map(|i| arena.leaf(NodeId(i))).collect();

        let mut base = Graph::from_vertices(leaves.clone());
        for (i, j, weight) in matrix.non_zero_pairs() {
            base.add_edge(leaves[i], leaves[j], weight);
        }

        let mut tree = Graph::new();
        if n > 0 {
            let root = arena.group(leaves);
            tree.insert_vertex(root);
        }

        Self { arena, base, tree }
    }

    fn groups(&self) -> Vec<Vec<NodeId>> {
        self.tree
            .vertices()
            .iter()
            .map(|&v| self.arena.original_ids(&[v]))
            .collect()
    }

    /// Replaces `group` by its source-side and sink-side halves.
    ///
    /// Every tree edge formerly incident to `group` moves to the half on the
    /// same side as its branch's representative leaf, keeping its weight.
    fn split(
        &mut self,
        group: VertexHandle,
        source_leaves: &[VertexHandle],
        max_flow: Capacity,
        reattachments: &[Reattachment],
    ) -> Result<(usize, usize), AlgorithmError> {
        let members = self.arena.members(group).to_vec();
        let side_a = set_intersection(&members, source_leaves);
        let side_b = set_difference(&members, source_leaves);
        if side_a.is_empty() || side_b.is_empty() {
            return Err(AlgorithmError::InvariantViolation(format!(
                "cut leaves one half of a {}-member group empty",
                members.len()
            )));
        }
        let sizes = (side_a.len(), side_b.len());

        let index = self.tree.find_vertex(group).unwrap_or(0);

        let xa = self.arena.group(side_a);
        let xb = self.arena.group(side_b);
        self.tree.insert_vertex_at(index, xb);
        self.tree.insert_vertex_at(index, xa);
        self.tree.add_edge(xa, xb, max_flow);

        let source_set: HashSet<_> = source_leaves.iter().copied().collect();
        for branch in reattachments {
            let half = if source_set.contains(&branch.representative) {
                xa
            } else {
                xb
            };
            self.tree.remove_edge(group, branch.neighbor);
            self.tree.add_edge(half, branch.neighbor, branch.weight);
        }

        self.tree.remove_vertex(group);
        self.arena.release(group);
        Ok(sizes)
    }
}

/// Projects a fully refined tree onto original ids.
///
/// Every tree vertex must be a group with exactly one leaf; the result is
/// ordered by original id so it lines up with the input matrix.
pub fn export_tree(arena: &VertexArena, tree: &Graph) -> Result<GomoryHuTree, AlgorithmError> {
    let mut order = Vec::with_capacity(tree.vertex_count());
    for &vertex in tree.vertices() {
        let id = match arena.members(vertex) {
            [leaf] => arena.original_id(*leaf),
            _ => None,
        }
        .ok_or_else(|| {
            AlgorithmError::InvariantViolation(format!(
                "tree vertex {:?} is not a singleton group",
                vertex
            ))
        })?;
        order.push((id, vertex));
    }
    order.sort_by_key(|&(id, _)| id);

    let handles: Vec<_> = order.iter().map(|&(_, vertex)| vertex).collect();
    let matrix = tree.to_matrix(&handles);

    let id_of: HashMap<_, _> = order.iter().map(|&(id, vertex)| (vertex, id)).collect();
    let mut edges = Vec::with_capacity(order.len().saturating_sub(1));
    for &(u, vertex) in &order {
        for record in tree.edges(vertex) {
            if let Some(&v) = id_of.get(&record.target) {
                if u < v {
                    edges.push(TreeEdge {
                        u,
                        v,
                        weight: record.capacity,
                    });
                }
            }
        }
    }
    edges.sort_by_key(|edge| (edge.u, edge.v));

    Ok(GomoryHuTree { matrix, edges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::tracer::RecordingTracer;

    fn matrix(rows: Vec<Vec<Capacity>>) -> CapacityMatrix {
        CapacityMatrix::from_rows(rows).unwrap()
    }

    fn sample() -> CapacityMatrix {
        matrix(vec![
            vec![0, 1, 7, 0, 0, 0],
            vec![1, 0, 1, 3, 2, 0],
            vec![7, 1, 0, 0, 4, 0],
            vec![0, 3, 0, 0, 1, 6],
            vec![0, 2, 4, 1, 0, 2],
            vec![0, 0, 0, 6, 2, 0],
        ])
    }

    #[test]
    fn test_two_vertices() {
        let tree = GomoryHuBuilder::new()
            .build(&matrix(vec![vec![0, 5], vec![5, 0]]))
            .unwrap();

        assert_eq!(tree.matrix().to_rows(), vec![vec![0, 5], vec![5, 0]]);
        assert_eq!(tree.edges(), &[TreeEdge { u: NodeId(0), v: NodeId(1), weight: 5 }]);
        assert_eq!(tree.min_cut(NodeId(1), NodeId(0)), Some(5));
    }

    #[test]
    fn test_path_is_fixed_point() {
        let path = matrix(vec![
            vec![0, 3, 0, 0],
            vec![3, 0, 2, 0],
            vec![0, 2, 0, 1],
            vec![0, 0, 1, 0],
        ]);
        let tree = GomoryHuBuilder::new().build(&path).unwrap();
        assert_eq!(tree.matrix(), &path);
        assert_eq!(tree.min_cut(NodeId(0), NodeId(2)), Some(2));
        assert_eq!(tree.min_cut(NodeId(0), NodeId(3)), Some(1));
    }

    #[test]
    fn test_sample_graph_tree() {
        let mut builder = GomoryHuBuilder::new();
        let tree = builder.build(&sample()).unwrap();

        assert!(tree.is_spanning_tree());
        assert_eq!(tree.matrix().non_zero_pairs().len(), 5);
        assert_eq!(tree.min_cut(NodeId(0), NodeId(5)), Some(6));
        assert_eq!(tree.min_cut(NodeId(0), NodeId(2)), Some(8));
        assert_eq!(builder.metrics().rounds, 5);
        assert!(builder.metrics().max_network_size <= 6);
    }

    #[test]
    fn test_every_strategy_gives_same_cut_values() {
        let reference = GomoryHuBuilder::new().build(&sample()).unwrap();
        for pair_selection in [PairSelection::LastTwo, PairSelection::FirstAndLast] {
            for group_selection in [GroupSelection::FirstFound, GroupSelection::Largest] {
                let config = GomoryHuConfig {
                    pair_selection,
                    group_selection,
                    verify_cuts: true,
                    ..GomoryHuConfig::default()
                };
                let tree = GomoryHuBuilder::with_config(config).build(&sample()).unwrap();
                for u in 0..6 {
                    for v in 0..6 {
                        assert_eq!(
                            tree.min_cut(NodeId(u), NodeId(v)),
                            reference.min_cut(NodeId(u), NodeId(v))
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_disconnected_input_keeps_zero_weight_edge() {
        let input = matrix(vec![
            vec![0, 4, 0, 0],
            vec![4, 0, 0, 0],
            vec![0, 0, 0, 2],
            vec![0, 0, 2, 0],
        ]);
        let tree = GomoryHuBuilder::new().build(&input).unwrap();

        assert!(tree.is_spanning_tree());
        assert_eq!(tree.matrix().non_zero_pairs().len(), 2);
        assert_eq!(tree.min_cut(NodeId(0), NodeId(1)), Some(4));
        assert_eq!(tree.min_cut(NodeId(1), NodeId(2)), Some(0));
        assert_eq!(tree.min_cut(NodeId(2), NodeId(3)), Some(2));
    }

    #[test]
    fn test_trivial_inputs() {
        let empty = GomoryHuBuilder::new().build(&CapacityMatrix::zeros(0)).unwrap();
        assert_eq!(empty.node_count(), 0);
        assert!(empty.is_spanning_tree());

        let single = GomoryHuBuilder::new().build(&CapacityMatrix::zeros(1)).unwrap();
        assert_eq!(single.matrix().to_rows(), vec![vec![0]]);
        assert!(single.edges().is_empty());
        assert_eq!(single.min_cut(NodeId(0), NodeId(0)), None);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let asymmetric = matrix(vec![vec![0, 1], vec![2, 0]]);
        assert!(matches!(
            GomoryHuBuilder::new().build(&asymmetric),
            Err(AlgorithmError::Asymmetric { i: 0, j: 1 })
        ));
    }

    #[test]
    fn test_tracer_checkpoints() {
        let mut tracer = RecordingTracer::new();
        let tree = GomoryHuBuilder::new()
            .execute_with_tracing(&sample(), Some(&mut tracer))
            .unwrap();

        let events = tracer.events();
        assert_eq!(tracer.round_count(), 5);
        assert_eq!(events.len(), 1 + 5 * 4 + 1);
        assert_eq!(
            events[0],
            TraceEvent::Initialized {
                groups: vec![(0..6).map(NodeId).collect()]
            }
        );
        assert_eq!(
            events.last(),
            Some(&TraceEvent::Finished {
                tree: tree.matrix().clone()
            })
        );
        match &events[2] {
            TraceEvent::NetworkBuilt { vertices, matrix, .. } => {
                assert_eq!(vertices.len(), 6);
                assert_eq!(matrix, &sample());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_tracer_does_not_change_result() {
        let mut tracer = RecordingTracer::new();
        let traced = GomoryHuBuilder::new()
            .execute_with_tracing(&sample(), Some(&mut tracer))
            .unwrap();
        let plain = GomoryHuBuilder::new().execute(&sample()).unwrap();
        assert_eq!(traced, plain);
    }

    #[test]
    fn test_capacity_bound_checked_without_validation() {
        let config = GomoryHuConfig {
            validate_input: false,
            ..GomoryHuConfig::default()
        };
        let huge = Capacity::MAX / 3;
        let triangle = matrix(vec![
            vec![0, huge, huge],
            vec![huge, 0, huge],
            vec![huge, huge, 0],
        ]);

        assert!(matches!(
            GomoryHuBuilder::with_config(config).build(&triangle),
            Err(AlgorithmError::CapacityOverflow { .. })
        ));
    }

    #[test]
    fn test_parameters() {
        let mut builder = GomoryHuBuilder::new();
        assert_eq!(builder.name(), "Gomory-Hu");
        assert_eq!(builder.category(), "min_cut");

        builder.set_parameter("pair_selection", "last_two").unwrap();
        builder.set_parameter("group_selection", "largest").unwrap();
        builder.set_parameter("verify_cuts", "true").unwrap();
        assert_eq!(builder.get_parameter("pair_selection").as_deref(), Some("last_two"));
        assert_eq!(builder.config().group_selection, GroupSelection::Largest);
        assert!(builder.config().verify_cuts);
        assert_eq!(builder.parameters().len(), 4);

        assert!(builder.set_parameter("pair_selection", "random").is_err());
        assert!(builder.set_parameter("validate_input", "yes").is_err());
        assert!(builder.set_parameter("unknown", "1").is_err());
        assert_eq!(builder.get_parameter("unknown"), None);
    }

    #[test]
    fn test_config_from_json_defaults_missing_fields() {
        let config = GomoryHuConfig::from_json(r#"{"pair_selection": "first_and_last"}"#).unwrap();
        assert_eq!(config.pair_selection, PairSelection::FirstAndLast);
        assert_eq!(config.group_selection, GroupSelection::FirstFound);
        assert!(config.validate_input);
        assert!(GomoryHuConfig::from_json(r#"{"pair_selection": 3}"#).is_err());
    }

    #[test]
    fn test_pair_selection_picks_distinct_members() {
        let mut arena = VertexArena::new();
        let v: Vec<_> = (0..4).map(|i| arena.leaf(NodeId(i))).collect();

        assert_eq!(PairSelection::FirstTwo.pick(&v), Some((v[0], v[1])));
        assert_eq!(PairSelection::LastTwo.pick(&v), Some((v[2], v[3])));
        assert_eq!(PairSelection::FirstAndLast.pick(&v), Some((v[0], v[3])));
        assert_eq!(PairSelection::FirstAndLast.pick(&v[..1]), None);
    }

    #[test]
    fn test_group_selection() {
        let mut arena = VertexArena::new();
        let v: Vec<_> = (0..5).map(|i| arena.leaf(NodeId(i))).collect();
        let small = arena.group(vec![v[0], v[1]]);
        let single = arena.group(vec![v[2]]);
        let large = arena.group(vec![v[3], v[4], v[0]]);
        let tree = Graph::from_vertices(vec![single, small, large]);

        assert_eq!(GroupSelection::FirstFound.select(&arena, &tree), Some(small));
        assert_eq!(GroupSelection::Largest.select(&arena, &tree), Some(large));
        assert_eq!(
            GroupSelection::Largest.select(&arena, &Graph::from_vertices(vec![single])),
            None
        );
    }

    #[test]
    fn test_export_rejects_unrefined_tree() {
        let mut arena = VertexArena::new();
        let v: Vec<_> = (0..2).map(|i| arena.leaf(NodeId(i))).collect();
        let root = arena.group(v);
        let tree = Graph::from_vertices(vec![root]);

        assert!(matches!(
            export_tree(&arena, &tree),
            Err(AlgorithmError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_tree_json() {
        let tree = GomoryHuBuilder::new()
            .build(&matrix(vec![vec![0, 5], vec![5, 0]]))
            .unwrap();
        assert_eq!(
            tree.to_json().unwrap(),
            r#"{"matrix":[[0,5],[5,0]],"edges":[{"u":0,"v":1,"weight":5}]}"#
        );
    }

    #[test]
    fn test_split_moves_branches_by_representative() {
        let mut arena = VertexArena::new();
        let l: Vec<_> = (0..4).map(|i| arena.leaf(NodeId(i))).collect();
        let x = arena.group(vec![l[0], l[1]]);
        let y = arena.group(vec![l[2]]);
        let z = arena.group(vec![l[3]]);
        let mut tree = Graph::from_vertices(vec![y, x, z]);
        tree.add_edge(x, y, 4);
        tree.add_edge(x, z, 1);
        let mut state = RefinementState {
            arena,
            base: Graph::new(),
            tree,
        };
        let reattachments = [
            Reattachment {
                neighbor: y,
                weight: 4,
                representative: l[2],
            },
            Reattachment {
                neighbor: z,
                weight: 1,
                representative: l[3],
            },
        ];

        let sizes = state.split(x, &[l[0], l[2]], 5, &reattachments).unwrap();

        assert_eq!(sizes, (1, 1));
        assert_eq!(state.tree.vertex_count(), 4);
        let xa = state.tree.vertices()[1];
        let xb = state.tree.vertices()[2];
        assert_eq!(state.arena.original_ids(&[xa]), vec![NodeId(0)]);
        assert_eq!(state.arena.original_ids(&[xb]), vec![NodeId(1)]);
        assert_eq!(state.tree.edge(xa, xb).map(|e| e.capacity), Some(5));
        assert_eq!(state.tree.edge(y, xa).map(|e| e.capacity), Some(4));
        assert_eq!(state.tree.edge(xb, z).map(|e| e.capacity), Some(1));
        assert!(state.tree.edge(xa, z).is_none());
        assert_eq!(state.tree.edge_count(), 3);
        assert!(!state.arena.contains(x));
    }

    #[test]
    fn test_split_rejects_one_sided_cut() {
        let mut arena = VertexArena::new();
        let l: Vec<_> = (0..2).map(|i| arena.leaf(NodeId(i))).collect();
        let x = arena.group(l.clone());
        let mut state = RefinementState {
            arena,
            base: Graph::new(),
            tree: Graph::from_vertices(vec![x]),
        };

        assert!(matches!(
            state.split(x, &l, 3, &[]),
            Err(AlgorithmError::InvariantViolation(_))
        ));
    }
}
