//! Vertex arena with nested, non-owning groups
//!
//! Every vertex the algorithm touches lives in one `VertexArena` and is
//! addressed by a `VertexHandle`. A vertex is either a leaf wrapping one
//! original id or a group listing other handles. Groups never own their
//! members: releasing a group frees only its own slot, so leaves created for
//! the input graph survive any number of regroupings.

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::NodeId;

/// Index-based handle into a `VertexArena`; identity is by handle, not value
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct VertexHandle(usize);

impl VertexHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Payload of an arena slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vertex {
    /// Original-graph vertex
    Leaf(NodeId),
    /// Ordered, non-owning list of member vertices
    Group(Vec<VertexHandle>),
}

/// Slot allocator for vertices with a free list for reuse
#[derive(Debug, Default)]
pub struct VertexArena {
    slots: Vec<Option<Vertex>>,
    free_list: Vec<usize>,
    live: usize,
}

impl VertexArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates arena with room for `capacity` vertices
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Allocates a vertex, reusing a released slot when one is available
    pub fn allocate(&mut self, vertex: Vertex) -> VertexHandle {
        self.live += 1;
        match self.free_list.pop() {
            Some(index) => {
                self.slots[index] = Some(vertex);
                VertexHandle(index)
            }
            None => {
                self.slots.push(Some(vertex));
                VertexHandle(self.slots.len() - 1)
            }
        }
    }

    pub fn leaf(&mut self, id: NodeId) -> VertexHandle {
        self.allocate(Vertex::Leaf(id))
    }

    pub fn group(&mut self, members: Vec<VertexHandle>) -> VertexHandle {
        self.allocate(Vertex::Group(members))
    }

    /// Releases the slot of `handle` and returns its payload.
    ///
    /// Members of a released group are left untouched.
    pub fn release(&mut self, handle: VertexHandle) -> Option<Vertex> {
        let vertex = self.slots.get_mut(handle.0)?.take()?;
        self.free_list.push(handle.0);
        self.live -= 1;
        Some(vertex)
    }

    pub fn get(&self, handle: VertexHandle) -> Option<&Vertex> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    pub fn contains(&self, handle: VertexHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Direct members of a group; empty for leaves and released handles
    pub fn members(&self, handle: VertexHandle) -> &[VertexHandle] {
        match self.get(handle) {
            Some(Vertex::Group(members)) => members,
            _ => &[],
        }
    }

    /// Original id of a leaf
    pub fn original_id(&self, handle: VertexHandle) -> Option<NodeId> {
        match self.get(handle) {
            Some(Vertex::Leaf(id)) => Some(*id),
            _ => None,
        }
    }

    /// Number of live vertices
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Flattens a possibly nested set down to its leaves, preserving order.
    ///
    /// `{{1,2},{3}}` becomes `{1,2,3}`; released handles contribute nothing.
    pub fn flatten(&self, set: &[VertexHandle]) -> Vec<VertexHandle> {
        let mut leaves = Vec::new();
        for &handle in set {
            self.flatten_into(handle, &mut leaves);
        }
        leaves
    }

    fn flatten_into(&self, handle: VertexHandle, out: &mut Vec<VertexHandle>) {
        match self.get(handle) {
            Some(Vertex::Leaf(_)) => out.push(handle),
            Some(Vertex::Group(members)) => {
                for &member in members {
                    self.flatten_into(member, out);
                }
            }
            None => {}
        }
    }

    /// Original ids of every leaf under `set`
    pub fn original_ids(&self, set: &[VertexHandle]) -> Vec<NodeId> {
        self.flatten(set)
            .into_iter()
            .filter_map(|leaf| self.original_id(leaf))
            .collect()
    }
}
