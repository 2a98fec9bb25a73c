//! Vertex arena, capacity graph and dense matrix types

pub mod vertex;
pub mod graph;
pub mod matrix;

pub use self::vertex::{Vertex, VertexArena, VertexHandle};
pub use self::graph::{set_difference, set_intersection, Capacity, EdgeRecord, Graph};
pub use self::matrix::CapacityMatrix;
