//! Maximal Translatable Patterns.
//!
//! The MTP for a vector `v` is every dataset point that `v` maps onto another
//! dataset point. Because the vector table is sorted by vector, each MTP is a
//! run of adjacent table entries and one linear pass finds them all.

use std::collections::BTreeSet;

use super::vector_table::VectorTableEntry;
use crate::point::{Dataset, Point, Vector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mtp {
    pub vector: Vector,
    /// Distinct source indices, ascending.
    pub indices: Vec<usize>,
}

impl Mtp {
    /// The distinct points at this MTP's indices, sorted.
    pub fn pattern(&self, dataset: &Dataset) -> Vec<Point> {
        self.indices
            .iter()
            .filter_map(|&i| dataset.get(i))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// A single index means one point translated once: nothing repeats.
    pub fn is_repetition(&self) -> bool {
        self.indices.len() >= 2
    }
}

/// Group a sorted vector table into MTPs, one per distinct vector.
pub fn extract_mtps(table: &[VectorTableEntry]) -> Vec<Mtp> {
    let mut mtps: Vec<Mtp> = Vec::new();

    for entry in table {
        match mtps.last_mut() {
            Some(mtp) if mtp.vector == entry.vector => {
                // Duplicate points give one index several entries under the same vector.
                if mtp.indices.last() != Some(&entry.index) {
                    mtp.indices.push(entry.index);
                }
            }
            _ => mtps.push(Mtp {
                vector: entry.vector.clone(),
                indices: vec![entry.index],
            }),
        }
    }

    mtps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::siatec::vector_table::vector_table;

    #[test]
    fn test_groups_by_vector() {
        let points: Vec<Point> = vec![(60, 1).into(), (62, 1).into(), (62, 1).into(), (64, 1).into()];
        let dataset = Dataset::new(&points).unwrap();
        let mtps = extract_mtps(&vector_table(&dataset));

        assert_eq!(mtps.len(), 3);
        assert_eq!(mtps[0].vector, Vector::from((0, 0)));
        assert_eq!(mtps[0].indices, vec![1]);
        assert_eq!(mtps[1].vector, Vector::from((2, 0)));
        assert_eq!(mtps[1].indices, vec![0, 1, 2]);
        assert_eq!(mtps[2].vector, Vector::from((4, 0)));
        assert_eq!(mtps[2].indices, vec![0]);
    }

    #[test]
    fn test_pattern_collapses_identical_points() {
        let points: Vec<Point> = vec![(60, 1).into(), (62, 1).into(), (62, 1).into(), (64, 1).into()];
        let dataset = Dataset::new(&points).unwrap();
        let mtps = extract_mtps(&vector_table(&dataset));

        let expected: Vec<Point> = vec![(60, 1).into(), (62, 1).into()];
        assert_eq!(mtps[1].pattern(&dataset), expected);
        assert!(mtps[1].is_repetition());
        assert!(!mtps[2].is_repetition());
    }

    #[test]
    fn test_unique_occurrences_are_kept() {
        let points: Vec<Point> = vec![(60, 1).into(), (61, 2).into(), (63, 3).into()];
        let dataset = Dataset::new(&points).unwrap();
        let mtps = extract_mtps(&vector_table(&dataset));

        assert_eq!(mtps.len(), 3);
        assert!(mtps.iter().all(|m| m.indices.len() == 1));
    }

    #[test]
    fn test_empty_table() {
        assert!(extract_mtps(&[]).is_empty());
    }
}
