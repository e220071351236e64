//! Translational Equivalence Classes.
//!
//! MTPs only say that one vector recurs between some points. Merging turns
//! that into "this pattern occurs at all of these offsets":
//!
//! 1. Each repeating MTP's pattern is anchored by subtracting its smallest
//!    point; the anchored list is the pattern's shape.
//! 2. MTPs are grouped by shape. The occurrence with the smallest anchor
//!    represents the group.
//! 3. Candidate translators are re-verified against the full representative
//!    pattern with hashed point lookups.
//! 4. TECs implied by a larger pattern with at least the same translators
//!    are dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::mtp::Mtp;
use crate::point::{Dataset, Point, PointIndex, Vector};

/// A pattern together with every translation that maps it onto another occurrence.
///
/// `pattern` is the occurrence with the smallest anchor, sorted; `translators`
/// are sorted and distinct, except that a single point repeated in place
/// carries one zero vector per extra occurrence. Ordering is by pattern,
/// then translators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Tec {
    pub pattern: Vec<Point>,
    pub translators: Vec<Vector>,
}

impl Tec {
    /// The pattern itself followed by each translated copy.
    pub fn occurrences(&self) -> Vec<Vec<Point>> {
        std::iter::once(self.pattern.clone())
            .chain(
                self.translators
                    .iter()
                    .map(|t| self.pattern.iter().map(|p| p + t).collect()),
            )
            .collect()
    }

    /// Every distinct dataset point touched by some occurrence.
    pub fn covered_points(&self) -> BTreeSet<Point> {
        self.occurrences().into_iter().flatten().collect()
    }

    /// Points covered per unit of description (pattern points plus translators).
    pub fn compression_ratio(&self) -> f64 {
        let description = self.pattern.len() + self.translators.len();
        if description == 0 {
            return 0.0;
        }
        self.covered_points().len() as f64 / description as f64
    }
}

impl fmt::Display for Tec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern: Vec<String> = self.pattern.iter().map(Point::to_string).collect();
        let translators: Vec<String> = self.translators.iter().map(Vector::to_string).collect();
        writeln!(f, "PATTERN: {}", pattern.join("; "))?;
        write!(f, "TRANSLATORS: {}", translators.join("; "))
    }
}

/// Occurrences of one shape found among the MTPs.
struct ShapeGroup {
    /// Occurrence with the smallest anchor.
    pattern: Vec<Point>,
    /// `(anchor, vector)` of every MTP with this shape.
    members: Vec<(Point, Vector)>,
    /// Set by the zero-vector MTP when all of its indices hold one point:
    /// that point and the size of the MTP's index set.
    in_place: Option<(Point, usize)>,
}

/// Merge MTPs into maximal, deduplicated TECs.
pub fn merge_tecs(dataset: &Dataset, mtps: Vec<Mtp>) -> Vec<Tec> {
    let lookup = dataset.index();
    let groups = group_by_shape(dataset, &mtps);
    debug!(shapes = groups.len(), "grouped MTPs by shape");

    let tecs: Vec<Tec> = groups
        .into_values()
        .filter_map(|group| complete(dataset, &lookup, group))
        .collect();
    debug!(tecs = tecs.len(), "completed translator sets");

    let mut maximal = remove_dominated(tecs);
    maximal.sort();
    maximal
}

fn group_by_shape(dataset: &Dataset, mtps: &[Mtp]) -> BTreeMap<Vec<Vector>, ShapeGroup> {
    let mut groups: BTreeMap<Vec<Vector>, ShapeGroup> = BTreeMap::new();

    for mtp in mtps.iter().filter(|m| m.is_repetition()) {
        let pattern = mtp.pattern(dataset);
        let Some(anchor) = pattern.first().cloned() else {
            continue;
        };
        let shape: Vec<Vector> = pattern.iter().map(|p| p - &anchor).collect();
        let in_place =
            (mtp.vector.is_zero() && pattern.len() == 1).then(|| (anchor.clone(), mtp.indices.len()));

        match groups.get_mut(&shape) {
            Some(group) => {
                if anchor < group.pattern[0] {
                    group.pattern = pattern;
                }
                group.members.push((anchor, mtp.vector.clone()));
                if in_place.is_some() {
                    group.in_place = in_place;
                }
            }
            None => {
                groups.insert(
                    shape,
                    ShapeGroup {
                        pattern,
                        members: vec![(anchor, mtp.vector.clone())],
                        in_place,
                    },
                );
            }
        }
    }

    groups
}

/// Compute the full translator set of a shape's representative occurrence.
///
/// Candidates are seeded from the member MTPs (their own offset from the
/// representative, and that offset plus their vector) and extended with the
/// offset from the anchor to every dataset point, so a translator whose MTP
/// has a different shape is not missed. Each candidate must carry every
/// pattern point onto the dataset.
///
/// The zero vector is never a candidate. It is only emitted for a single
/// point repeated in place, once per member of the zero-vector MTP's index
/// set.
fn complete(dataset: &Dataset, lookup: &PointIndex, group: ShapeGroup) -> Option<Tec> {
    let anchor = &group.pattern[0];

    let mut candidates: BTreeSet<Vector> = BTreeSet::new();
    for (member_anchor, vector) in &group.members {
        // `member_anchor + vector` is a dataset point, so both offsets stay in range.
        if let Some(target) = member_anchor.checked_translate(vector) {
            candidates.insert(&target - anchor);
        }
        candidates.insert(member_anchor - anchor);
    }
    candidates.extend(dataset.iter().map(|q| q - anchor));

    let mut translators: Vec<Vector> = candidates
        .into_iter()
        .filter(|t| !t.is_zero())
        .filter(|t| {
            group.pattern.iter().all(|p| {
                p.checked_translate(t)
                    .is_some_and(|moved| lookup.contains(&moved))
            })
        })
        .collect();

    if let Some((point, repeats)) = &group.in_place {
        if group.pattern.len() == 1 && group.pattern[0] == *point {
            let zero = Vector::zero(anchor.dimension());
            translators.extend(std::iter::repeat(zero).take(*repeats));
            translators.sort();
        }
    }

    if translators.is_empty() {
        return None;
    }

    Some(Tec {
        pattern: group.pattern,
        translators,
    })
}

/// Drop every TEC whose pattern is a strict subset of another TEC's pattern
/// while its translators are a subset of that TEC's translators.
pub(crate) fn remove_dominated(tecs: Vec<Tec>) -> Vec<Tec> {
    let dominated: Vec<bool> = tecs
        .iter()
        .map(|small| {
            tecs.iter().any(|large| {
                small.pattern.len() < large.pattern.len()
                    && is_sorted_subset(&small.pattern, &large.pattern)
                    && is_sorted_subset(&small.translators, &large.translators)
            })
        })
        .collect();

    tecs.into_iter()
        .zip(dominated)
        .filter_map(|(tec, dominated)| (!dominated).then_some(tec))
        .collect()
}

/// Subset test for two ascending slices, counting repeated elements.
fn is_sorted_subset<T: Ord>(small: &[T], large: &[T]) -> bool {
    let mut rest = large.iter();
    small.iter().all(|s| rest.by_ref().any(|l| l == s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tec(pattern: &[(i64, i64)], translators: &[(i64, i64)]) -> Tec {
        Tec {
            pattern: pattern.iter().map(|&p| p.into()).collect(),
            translators: translators.iter().map(|&t| t.into()).collect(),
        }
    }

    #[test]
    fn test_sorted_subset() {
        assert!(is_sorted_subset(&[1, 3], &[1, 2, 3]));
        assert!(is_sorted_subset::<i32>(&[], &[1]));
        assert!(!is_sorted_subset(&[1, 4], &[1, 2, 3]));
        assert!(!is_sorted_subset(&[3, 1], &[1, 2, 3]));
    }

    #[test]
    fn test_dominated_tec_is_removed() {
        let small = tec(&[(60, 1), (62, 1)], &[(7, 0)]);
        let large = tec(&[(60, 1), (62, 1), (64, 1)], &[(7, 0), (12, 0)]);
        let kept = remove_dominated(vec![small, large.clone()]);
        assert_eq!(kept, vec![large]);
    }

    #[test]
    fn test_smaller_pattern_with_more_translators_survives() {
        let small = tec(&[(60, 1), (62, 1)], &[(2, 0), (7, 0)]);
        let large = tec(&[(60, 1), (62, 1), (64, 1)], &[(7, 0)]);
        let kept = remove_dominated(vec![small.clone(), large.clone()]);
        assert_eq!(kept, vec![small, large]);
    }

    #[test]
    fn test_disjoint_patterns_both_survive() {
        let a = tec(&[(60, 1)], &[(7, 0)]);
        let b = tec(&[(62, 1), (64, 1)], &[(7, 0)]);
        assert_eq!(remove_dominated(vec![a.clone(), b.clone()]).len(), 2);
    }

    #[test]
    fn test_repeated_zero_translators_count_as_subset() {
        assert!(is_sorted_subset(&[0, 0, 2], &[0, 0, 2, 5]));
        assert!(!is_sorted_subset(&[0, 0, 0], &[0, 0, 2]));
    }

    #[test]
    fn test_in_place_repeats_become_zero_translators() {
        let points: Vec<Point> = vec![(60, 1).into(); 4];
        let dataset = Dataset::new(&points).unwrap();
        let mtps = vec![Mtp {
            vector: Vector::zero(2),
            indices: vec![0, 1, 2],
        }];
        let tecs = merge_tecs(&dataset, mtps);
        assert_eq!(tecs, vec![tec(&[(60, 1)], &[(0, 0), (0, 0), (0, 0)])]);
    }

    #[test]
    fn test_multi_point_zero_mtp_gets_no_zero_translator() {
        let points: Vec<Point> = vec![(60, 1).into(), (62, 1).into(), (60, 1).into(), (62, 1).into()];
        let dataset = Dataset::new(&points).unwrap();
        let mtps = vec![Mtp {
            vector: Vector::zero(2),
            indices: vec![0, 1],
        }];
        assert!(merge_tecs(&dataset, mtps).is_empty());
    }

    #[test]
    fn test_occurrences_and_coverage() {
        let t = tec(&[(60, 1), (62, 1)], &[(2, 0)]);
        let expected: Vec<Vec<Point>> = vec![
            vec![(60, 1).into(), (62, 1).into()],
            vec![(62, 1).into(), (64, 1).into()],
        ];
        assert_eq!(t.occurrences(), expected);
        assert_eq!(t.covered_points().len(), 3);
        assert!((t.compression_ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display() {
        let t = tec(&[(60, 1), (62, 1)], &[(2, 0), (7, 0)]);
        assert_eq!(
            t.to_string(),
            "PATTERN: (60, 1); (62, 1)\nTRANSLATORS: (2, 0); (7, 0)"
        );
    }
}
