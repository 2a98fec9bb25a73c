//! Dense square capacity matrix
//!
//! The exchange format of the crate: the input graph arrives as an n×n
//! matrix of undirected edge capacities (zero meaning no edge), and the
//! finished Gomory-Hu tree is exported in the same shape and indexing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::AlgorithmError;
use crate::data_structures::graph::Capacity;

/// Row-major n×n matrix of capacities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Capacity>>", into = "Vec<Vec<Capacity>>")]
pub struct CapacityMatrix {
    size: usize,
    entries: Vec<Capacity>,
}

impl CapacityMatrix {
    /// All-zero matrix of the given order
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            entries: vec![0; size * size],
        }
    }

    /// Builds a matrix from rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<Capacity>>) -> Result<Self, AlgorithmError> {
        let size = rows.len();
        let mut entries = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(AlgorithmError::NotSquare {
                    rows: size,
                    row,
                    len: values.len(),
                });
            }
            entries.extend(values);
        }
        Ok(Self { size, entries })
    }

    /// Parses a JSON array of rows
    pub fn from_json(json: &str) -> Result<Self, AlgorithmError> {
        let rows: Vec<Vec<Capacity>> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    /// Number of rows (and columns)
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Entry at `[i][j]`, `None` when out of range
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<Capacity> {
        if i < self.size && j < self.size {
            Some(self.entries[i * self.size + j])
        } else {
            None
        }
    }

    /// Sets `[i][j]`; out-of-range writes are ignored
    pub fn set(&mut self, i: usize, j: usize, value: Capacity) {
        if i < self.size && j < self.size {
            self.entries[i * self.size + j] = value;
        }
    }

    /// Sets both `[i][j]` and `[j][i]`
    pub fn set_symmetric(&mut self, i: usize, j: usize, value: Capacity) {
        self.set(i, j, value);
        self.set(j, i, value);
    }

    pub fn row(&self, i: usize) -> &[Capacity] {
        &self.entries[i * self.size..(i + 1) * self.size]
    }

    pub fn to_rows(&self) -> Vec<Vec<Capacity>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }

    /// Unordered pairs `(i, j, weight)` with `i < j` and a non-zero weight
    pub fn non_zero_pairs(&self) -> Vec<(usize, usize, Capacity)> {
        let mut pairs = Vec::new();
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let weight = self.entries[i * self.size + j];
                if weight != 0 {
                    pairs.push((i, j, weight));
                }
            }
        }
        pairs
    }
}

impl TryFrom<Vec<Vec<Capacity>>> for CapacityMatrix {
    type Error = AlgorithmError;

    fn try_from(rows: Vec<Vec<Capacity>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<CapacityMatrix> for Vec<Vec<Capacity>> {
    fn from(matrix: CapacityMatrix) -> Self {
        matrix.to_rows()
    }
}

/// Indented, right-aligned layout, one row per line
impl fmt::Display for CapacityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.size {
            write!(f, "    ")?;
            for value in self.row(i) {
                write!(f, "{:>3}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
