//! Pairwise translation vectors between dataset points.

use crate::point::{Dataset, Vector};

/// `dataset[index] + vector` is a dataset member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorTableEntry {
    pub index: usize,
    pub vector: Vector,
}

/// Build the vector table: one entry `(i, dataset[j] - dataset[i])` for every `i < j`.
///
/// Entries are sorted by vector (lexicographically), then by source index, so
/// that all entries sharing a vector are adjacent.
pub fn vector_table(dataset: &Dataset) -> Vec<VectorTableEntry> {
    let n = dataset.len();
    if n < 2 {
        return Vec::new();
    }

    let points = dataset.points();
    let mut table = Vec::with_capacity(n * (n - 1) / 2);
    for (i, from) in points.iter().enumerate() {
        for to in &points[i + 1..] {
            table.push(VectorTableEntry {
                index: i,
                vector: to - from,
            });
        }
    }

    table.sort_by(|a, b| a.vector.cmp(&b.vector).then(a.index.cmp(&b.index)));
    table
}
