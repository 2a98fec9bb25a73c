//! Undirected capacity graph over arena vertices
//!
//! This module implements the graph model shared by the original input
//! graph, the evolving tree and the per-round auxiliary networks. Each
//! undirected edge is materialized as two mirrored directed records, one in
//! each endpoint's adjacency list, so a flow computation can adjust the two
//! directions independently.
//!
//! # Invariants
//! - If record (u→v) exists with capacity c, record (v→u) exists with the
//!   same nominal capacity (`capacity + flow`)
//! - Adding capacity between an existing pair sums into the existing record
//! - No self-loop records are ever created
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::data_structures::matrix::CapacityMatrix;
use crate::data_structures::vertex::VertexHandle;

/// Edge capacity and flow amount
pub type Capacity = i64;

/// Directed half of an undirected edge, stored at its tail vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Head vertex
    pub target: VertexHandle,
    /// Remaining capacity in this direction
    pub capacity: Capacity,
    /// Flow currently pushed in this direction
    pub flow: Capacity,
}

impl EdgeRecord {
    #[inline]
    fn new(target: VertexHandle, capacity: Capacity) -> Self {
        Self {
            target,
            capacity,
            flow: 0,
        }
    }

    /// Capacity before any flow was pushed
    #[inline]
    pub fn nominal_capacity(&self) -> Capacity {
        self.capacity + self.flow
    }
}

/// Ordered vertex set plus the edge records reachable from it
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Vertex handles in insertion order
    vertices: Vec<VertexHandle>,
    /// Outgoing records per vertex
    adjacency: HashMap<VertexHandle, Vec<EdgeRecord>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph over `vertices` with no edges
    pub fn from_vertices(vertices: Vec<VertexHandle>) -> Self {
        let mut graph = Self::new();
        for vertex in vertices {
            graph.insert_vertex(vertex);
        }
        graph
    }

    /// Appends a vertex; returns `false` if it is already present
    pub fn insert_vertex(&mut self, vertex: VertexHandle) -> bool {
        if self.contains(vertex) {
            return false;
        }
        self.vertices.push(vertex);
        self.adjacency.entry(vertex).or_default();
        true
    }

    /// Inserts a vertex at `index` in the ordering (clamped to the end)
    pub fn insert_vertex_at(&mut self, index: usize, vertex: VertexHandle) -> bool {
        if self.contains(vertex) {
            return false;
        }
        let index = index.min(self.vertices.len());
        self.vertices.insert(index, vertex);
        self.adjacency.entry(vertex).or_default();
        true
    }

    #[inline]
    pub fn vertices(&self) -> &[VertexHandle] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn contains(&self, vertex: VertexHandle) -> bool {
        self.adjacency.contains_key(&vertex)
    }

    /// Position of `vertex` in the ordering
    pub fn find_vertex(&self, vertex: VertexHandle) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// Outgoing records of `vertex`; empty for unknown vertices
    pub fn edges(&self, vertex: VertexHandle) -> &[EdgeRecord] {
        self.adjacency.get(&vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record from `from` to `to`, `None` meaning no relation
    pub fn edge(&self, from: VertexHandle, to: VertexHandle) -> Option<&EdgeRecord> {
        self.adjacency.get(&from)?.iter().find(|e| e.target == to)
    }

    pub fn edge_mut(&mut self, from: VertexHandle, to: VertexHandle) -> Option<&mut EdgeRecord> {
        self.adjacency.get_mut(&from)?.iter_mut().find(|e| e.target == to)
    }

    /// Adds capacity to the single record `from → to`, creating it if absent.
    ///
    /// Self-loops are dropped. The caller owns the mirror record.
    pub fn add_arc(&mut self, from: VertexHandle, to: VertexHandle, capacity: Capacity) {
        if from == to {
            return;
        }
        let records = self.adjacency.entry(from).or_default();
        match records.iter_mut().find(|e| e.target == to) {
            Some(record) => record.capacity += capacity,
            None => records.push(EdgeRecord::new(to, capacity)),
        }
    }

    /// Adds (or merges into) the undirected edge `u – v`
    pub fn add_edge(&mut self, u: VertexHandle, v: VertexHandle, capacity: Capacity) {
        self.add_arc(u, v, capacity);
        self.add_arc(v, u, capacity);
    }

    /// Removes the single record `from → to`
    pub fn remove_arc(&mut self, from: VertexHandle, to: VertexHandle) -> Option<EdgeRecord> {
        let records = self.adjacency.get_mut(&from)?;
        let index = records.iter().position(|e| e.target == to)?;
        Some(records.remove(index))
    }

    /// Removes both mirrored records of `u – v`, returning the nominal capacity
    pub fn remove_edge(&mut self, u: VertexHandle, v: VertexHandle) -> Option<Capacity> {
        let forward = self.remove_arc(u, v);
        let backward = self.remove_arc(v, u);
        forward.or(backward).map(|record| record.nominal_capacity())
    }

    /// Removes `vertex` with its own records and the mirror record in every neighbor
    pub fn remove_vertex(&mut self, vertex: VertexHandle) -> bool {
        let Some(index) = self.find_vertex(vertex) else {
            return false;
        };
        self.vertices.remove(index);
        for record in self.adjacency.remove(&vertex).unwrap_or_default() {
            self.remove_arc(record.target, vertex);
        }
        true
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Vertices connected to `start` through any record, regardless of capacity
    pub fn component(&self, start: VertexHandle) -> Vec<VertexHandle> {
        if !self.contains(start) {
            return Vec::new();
        }
        let mut visited = HashSet::from([start]);
        let mut order = vec![start];
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for record in self.edges(current) {
                if visited.insert(record.target) {
                    order.push(record.target);
                    queue.push_back(record.target);
                }
            }
        }
        order
    }

    /// Puts every pushed unit of flow back into capacity
    pub fn restore_capacities(&mut self) {
        for records in self.adjacency.values_mut() {
            for record in records.iter_mut() {
                record.capacity += record.flow;
                record.flow = 0;
            }
        }
    }

    /// Total nominal capacity of records leading from `side_a` into `side_b`
    pub fn cut_capacity(&self, side_a: &[VertexHandle], side_b: &[VertexHandle]) -> Capacity {
        let side_b: HashSet<_> = side_b.iter().copied().collect();
        side_a
            .iter()
            .flat_map(|&v| self.edges(v))
            .filter(|record| side_b.contains(&record.target))
            .map(EdgeRecord::nominal_capacity)
            .sum()
    }

    /// Projects `order` and its adjacency into a dense matrix.
    ///
    /// Vertices are numbered by their position in `order`; records leading
    /// outside `order` are ignored.
    pub fn to_matrix(&self, order: &[VertexHandle]) -> CapacityMatrix {
        let position: HashMap<_, _> = order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let mut matrix = CapacityMatrix::zeros(order.len());
        for (i, &vertex) in order.iter().enumerate() {
            for record in self.edges(vertex) {
                if let Some(&j) = position.get(&record.target) {
                    matrix.set(i, j, record.capacity);
                }
            }
        }
        matrix
    }
}

/// Elements of `left` that are not in `right`, in `left` order
pub fn set_difference(left: &[VertexHandle], right: &[VertexHandle]) -> Vec<VertexHandle> {
    let right: HashSet<_> = right.iter().copied().collect();
    left.iter().copied().filter(|v| !right.contains(v)).collect()
}

/// Elements of `left` that are also in `right`, in `left` order
pub fn set_intersection(left: &[VertexHandle], right: &[VertexHandle]) -> Vec<VertexHandle> {
    let right: HashSet<_> = right.iter().copied().collect();
    left.iter().copied().filter(|v| right.contains(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::traits::NodeId;
    use crate::data_structures::vertex::VertexArena;

    fn leaves(arena: &mut VertexArena, n: usize) -> Vec<VertexHandle> {
        (0..n).map(|i| arena.leaf(NodeId(i))).collect()
    }

    #[test]
    fn test_add_edge_creates_mirrored_records() {
        let mut arena = VertexArena::new();
        let v = leaves(&mut arena, 2);
        let mut graph = Graph::from_vertices(v.clone());

        graph.add_edge(v[0], v[1], 4);

        assert_eq!(graph.edge(v[0], v[1]).map(|e| e.capacity), Some(4));
        assert_eq!(graph.edge(v[1], v[0]).map(|e| e.capacity), Some(4));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_merges_capacity() {
        let mut arena = VertexArena::new();
        let v = leaves(&mut arena, 3);
        let mut graph = Graph::from_vertices(v.clone());

        graph.add_edge(v[0], v[1], 4);
        graph.add_edge(v[1], v[0], 3);

        assert_eq!(graph.edges(v[0]).len(), 1);
        assert_eq!(graph.edge(v[0], v[1]).map(|e| e.capacity), Some(7));
        assert_eq!(graph.edge(v[1], v[0]).map(|e| e.capacity), Some(7));
        assert!(graph.edge(v[0], v[2]).is_none());
    }

    #[test]
    fn test_self_loops_are_dropped() {
        let mut arena = VertexArena::new();
        let v = leaves(&mut arena, 1);
        let mut graph = Graph::from_vertices(v.clone());

        graph.add_edge(v[0], v[0], 9);
        assert!(graph.edges(v[0]).is_empty());
    }

    #[test]
    fn test_remove_edge_removes_both_records() {
        let mut arena = VertexArena::new();
        let v = leaves(&mut arena, 2);
        let mut graph = Graph::from_vertices(v.clone());
        graph.add_edge(v[0], v[1], 5);

        assert_eq!(graph.remove_edge(v[1], v[0]), Some(5));
        assert!(graph.edge(v[0], v[1]).is_none());
        assert!(graph.edge(v[1], v[0]).is_none());
        assert_eq!(graph.remove_edge(v[0], v[1]), None);
    }

    #[test]
    fn test_remove_vertex_cleans_neighbors() {
        let mut arena = VertexArena::new();
        let v = leaves(&mut arena, 3);
        let mut graph = Graph::from_vertices(v.clone());
        graph.add_edge(v[0], v[1], 1);
        graph.add_edge(v[1], v[2], 2);
        graph.add_edge(v[0], v[2], 3);

        assert!(graph.remove_vertex(v[1]));
        assert_eq!(graph.vertices(), &[v[0], v[2]]);
        assert!(graph.edge(v[0], v[1]).is_none());
        assert!(graph.edge(v[2], v[1]).is_none());
        assert_eq!(graph.edge(v[0], v[2]).map(|e| e.capacity), Some(3));
        assert!(!graph.remove_vertex(v[1]));
    }

    #[test]
    fn test_insert_vertex_at_position() {
        let mut arena = VertexArena::new();
        let v = leaves(&mut arena, 3);
        let mut graph = Graph::from_vertices(vec![v[0], v[2]]);

        assert!(graph.insert_vertex_at(1, v[1]));
        assert!(!graph.insert_vertex_at(0, v[1]));
        assert_eq!(graph.vertices(), &v[..]);
        assert_eq!(graph.find_vertex(v[2]), Some(2));
    }

    #[test]
    fn test_component_ignores_capacity() {
        let mut arena = VertexArena::new();
        let v = leaves(&mut arena, 4);
        let mut graph = Graph::from_vertices(v.clone());
        graph.add_edge(v[0], v[1], 0);
        graph.add_edge(v[1], v[2], 2);

        assert_eq!(graph.component(v[0]), vec![v[0], v[1], v[2]]);
        assert_eq!(graph.component(v[3]), vec![v[3]]);
    }

    #[test]
    fn test_set_algebra_by_identity() {
        let mut arena = VertexArena::new();
        let v = leaves(&mut arena, 4);

        assert_eq!(set_difference(&v, &[v[1], v[3]]), vec![v[0], v[2]]);
        assert_eq!(set_intersection(&v, &[v[3], v[1]]), vec![v[1], v[3]]);
        assert!(set_intersection(&v[..2], &v[2..]).is_empty());
    }

    #[test]
    fn test_projection_uses_set_positions() {
        let mut arena = VertexArena::new();
        let v = leaves(&mut arena, 3);
        let mut graph = Graph::from_vertices(v.clone());
        graph.add_edge(v[0], v[2], 6);
        graph.add_edge(v[1], v[2], 1);

        let matrix = graph.to_matrix(&[v[2], v[0]]);
        assert_eq!(matrix.to_rows(), vec![vec![0, 6], vec![6, 0]]);
    }

    #[test]
    fn test_restore_and_cut_capacity() {
        let mut arena = VertexArena::new();
        let v = leaves(&mut arena, 3);
        let mut graph = Graph::from_vertices(v.clone());
        graph.add_edge(v[0], v[1], 4);
        graph.add_edge(v[0], v[2], 2);

        if let Some(record) = graph.edge_mut(v[0], v[1]) {
            record.capacity -= 3;
            record.flow += 3;
        }
        assert_eq!(graph.cut_capacity(&[v[0]], &[v[1], v[2]]), 6);

        graph.restore_capacities();
        let record = graph.edge(v[0], v[1]).copied().unwrap();
        assert_eq!((record.capacity, record.flow), (4, 0));
    }
}
