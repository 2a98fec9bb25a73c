//! Contraction of the evolving tree around one group vertex
//!
//! Given a group X of the evolving Gomory-Hu tree, the auxiliary network
//! exposes every member of X as its own vertex and collapses each branch of
//! the tree hanging off X into a single vertex. Because the tree is acyclic,
//! the component reached from a neighbor after cutting its edge to X is
//! exactly that branch.
//!
//! Edge capacities between the new vertices are the sums of the original
//! graph's edges between their leaves; edges inside one vertex disappear.

use std::collections::HashMap;

use log::debug;

use crate::algorithm::traits::AlgorithmError;
use crate::data_structures::graph::{Capacity, Graph};
use crate::data_structures::vertex::{VertexArena, VertexHandle};

/// A tree branch collapsed into one network vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    /// Tree vertex adjacent to the contracted group
    pub tree_neighbor: VertexHandle,
    /// Weight of the tree edge leading to `tree_neighbor`
    pub weight: Capacity,
    /// Network vertex holding every leaf of the branch
    pub vertex: VertexHandle,
}

/// Round-scoped auxiliary network.
///
/// Every vertex of `graph` is a wrapper allocated in the arena for this
/// round only; `dispose` must be called to release them before the next
/// round begins.
#[derive(Debug)]
pub struct ContractedNetwork {
    graph: Graph,
    member_wrappers: Vec<VertexHandle>,
    branches: Vec<Branch>,
}

impl ContractedNetwork {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Singleton wrappers of the group's members, in member order
    pub fn members(&self) -> &[VertexHandle] {
        &self.member_wrappers
    }

    /// Collapsed branches, in the order of the group's tree edges
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Releases every wrapper created for this network.
    ///
    /// The wrapped leaves and the tree are untouched.
    pub fn dispose(self, arena: &mut VertexArena) {
        for &vertex in self.graph.vertices() {
            arena.release(vertex);
        }
    }
}

/// Builds the auxiliary network for `group`.
///
/// `base` is the original graph over leaves; `tree` is the evolving tree
/// whose vertices are groups of leaves. The tree is restored to its prior
/// edge set before returning.
pub fn contract(
    arena: &mut VertexArena,
    base: &Graph,
    tree: &mut Graph,
    group: VertexHandle,
) -> Result<ContractedNetwork, AlgorithmError> {
    if !tree.contains(group) {
        return Err(AlgorithmError::InvalidGraph(format!(
            "group {:?} is not a tree vertex",
            group
        )));
    }
    let members = arena.members(group).to_vec();
    if members.len() < 2 {
        return Err(AlgorithmError::InvariantViolation(format!(
            "group {:?} has {} member(s), contraction needs at least two",
            group,
            members.len()
        )));
    }

    let mut graph = Graph::new();
    let mut owner = HashMap::new();
    let mut member_wrappers = Vec::with_capacity(members.len());

    for member in members {
        let wrapper = arena.group(vec![member]);
        for leaf in arena.flatten(&[member]) {
            owner.insert(leaf, wrapper);
        }
        graph.insert_vertex(wrapper);
        member_wrappers.push(wrapper);
    }

    let incident: Vec<_> = tree
        .edges(group)
        .iter()
        .map(|record| (record.target, record.capacity))
        .collect();
    let mut branches = Vec::with_capacity(incident.len());

    for (neighbor, weight) in incident {
        tree.remove_edge(group, neighbor);
        let component = tree.component(neighbor);
        tree.add_edge(group, neighbor, weight);

        let leaves = arena.flatten(&component);
        let vertex = arena.group(leaves.clone());
        for leaf in leaves {
            owner.insert(leaf, vertex);
        }
        graph.insert_vertex(vertex);
        branches.push(Branch {
            tree_neighbor: neighbor,
            weight,
            vertex,
        });
    }

    if owner.len() != base.vertex_count() {
        let covered = owner.len();
        let network = ContractedNetwork {
            graph,
            member_wrappers,
            branches,
        };
        network.dispose(arena);
        return Err(AlgorithmError::InvariantViolation(format!(
            "contraction covers {} of {} original vertices",
            covered,
            base.vertex_count()
        )));
    }

    let vertices = graph.vertices().to_vec();
    for &vertex in &vertices {
        for leaf in arena.flatten(&[vertex]) {
            for record in base.edges(leaf) {
                match owner.get(&record.target) {
                    // mirror arcs come from the other side's own scan
                    Some(&other) if other != vertex => {
                        graph.add_arc(vertex, other, record.capacity)
                    }
                    _ => {}
                }
            }
        }
    }

    debug!(
        "contracted group {:?}: {} members, {} branches, {} edges",
        group,
        member_wrappers.len(),
        branches.len(),
        graph.edge_count()
    );

    Ok(ContractedNetwork {
        graph,
        member_wrappers,
        branches,
    })
}
