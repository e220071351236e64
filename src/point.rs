//! # Point-Set Representation
//!
//! A melody reaches the pattern finder as an ordered list of [`Point`]s.
//! For scores read by this crate each point is `(pitch, duration)`: a MIDI
//! pitch (or the rest sentinel) and a quantized duration, but nothing in
//! the algorithm depends on there being exactly two coordinates.
//!
//! Coordinates are integers so that equality and hashing are exact.
//!
//! ## Types
//! - [`Point`] - an immutable coordinate tuple, ordered lexicographically
//! - [`Vector`] - the difference of two points, used only as a translation
//! - [`Dataset`] - a validated, read-only, re-iterable view over a slice of points
//! - [`PointIndex`] - hashed point membership

use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, Sub};

use serde::Serialize;

use crate::error::OstinatoError;

/// An ordered tuple of integer coordinates.
///
/// Points compare by coordinates; the derived ordering is lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Point {
    coords: Vec<i64>,
}

impl Point {
    pub fn new(coords: Vec<i64>) -> Self {
        Self { coords }
    }

    /// `self + vector`, or `None` when a coordinate leaves the `i64` range.
    pub fn checked_translate(&self, vector: &Vector) -> Option<Point> {
        self.coords
            .iter()
            .zip(&vector.coords)
            .map(|(a, b)| a.checked_add(*b))
            .collect::<Option<Vec<_>>>()
            .map(Point::new)
    }

    pub fn coords(&self) -> &[i64] {
        &self.coords
    }

    pub fn dimension(&self) -> usize {
        self.coords.len()
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(vec![x, y])
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.coords)
    }
}

/// A translation offset between two points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Vector {
    coords: Vec<i64>,
}

impl Vector {
    pub fn new(coords: Vec<i64>) -> Self {
        Self { coords }
    }

    pub fn zero(dimension: usize) -> Self {
        Self::new(vec![0; dimension])
    }

    pub fn coords(&self) -> &[i64] {
        &self.coords
    }

    pub fn is_zero(&self) -> bool {
        self.coords.iter().all(|&c| c == 0)
    }
}

impl From<(i64, i64)> for Vector {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(vec![x, y])
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.coords)
    }
}

fn write_tuple(f: &mut fmt::Formatter<'_>, coords: &[i64]) -> fmt::Result {
    write!(f, "(")?;
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

/// `q - p`: the vector translating `p` onto `q`.
impl Sub for &Point {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Vector {
        Vector::new(
            self.coords
                .iter()
                .zip(&rhs.coords)
                .map(|(a, b)| a - b)
                .collect(),
        )
    }
}

impl<'a> Add<&'a Vector> for &Point {
    type Output = Point;

    fn add(self, rhs: &'a Vector) -> Point {
        Point::new(
            self.coords
                .iter()
                .zip(&rhs.coords)
                .map(|(a, b)| a + b)
                .collect(),
        )
    }
}

/// A validated, read-only view over an ordered point sequence.
///
/// The view holds no cursor: every call to [`Dataset::iter`] starts a fresh
/// pass, so independent stages can scan the same dataset without
/// interfering with each other.
#[derive(Debug, Clone, Copy)]
pub struct Dataset<'a> {
    points: &'a [Point],
}

impl<'a> Dataset<'a> {
    /// Wrap `points`, rejecting any point whose dimensionality differs from the
    /// first, and any axis whose coordinates are too far apart for the
    /// difference of two of them to fit in an `i64`.
    pub fn new(points: &'a [Point]) -> Result<Self, OstinatoError> {
        let Some(first) = points.first() else {
            return Ok(Self { points });
        };

        let expected = first.dimension();
        if let Some((index, point)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| p.dimension() != expected)
        {
            return Err(OstinatoError::DimensionMismatch {
                index,
                expected,
                found: point.dimension(),
            });
        }

        for axis in 0..expected {
            let values = points.iter().map(|p| p.coords[axis]);
            let min = values.clone().min().unwrap_or_default();
            let max = values.max().unwrap_or_default();
            if max.checked_sub(min).is_none() {
                return Err(OstinatoError::CoordinateRange { axis, min, max });
            }
        }

        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of coordinates per point, `None` for an empty dataset.
    pub fn dimension(&self) -> Option<usize> {
        self.points.first().map(Point::dimension)
    }

    pub fn points(&self) -> &'a [Point] {
        self.points
    }

    pub fn get(&self, index: usize) -> Option<&'a Point> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Point> {
        self.points.iter()
    }

    /// Build the coordinate lookup used for membership tests.
    pub fn index(&self) -> PointIndex<'a> {
        PointIndex::new(self.points)
    }
}

impl<'a> IntoIterator for Dataset<'a> {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Hashed membership test over the points of a dataset.
#[derive(Debug, Clone)]
pub struct PointIndex<'a> {
    points: HashSet<&'a Point>,
}

impl<'a> PointIndex<'a> {
    fn new(points: &'a [Point]) -> Self {
        Self {
            points: points.iter().collect(),
        }
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.points.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_order_lexicographically() {
        let mut points: Vec<Point> = vec![(62, 1).into(), (60, 2).into(), (60, 1).into()];
        points.sort();
        let expected: Vec<Point> = vec![(60, 1).into(), (60, 2).into(), (62, 1).into()];
        assert_eq!(points, expected);
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point::from((60, 1));
        let b = Point::from((64, 3));
        let v = &b - &a;
        assert_eq!(v, Vector::from((4, 2)));
        assert_eq!(&a + &v, b);
        assert!(!v.is_zero());
        assert!((&a - &a).is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Point::from((60, -1)).to_string(), "(60, -1)");
        assert_eq!(Vector::new(vec![2]).to_string(), "(2)");
    }

    #[test]
    fn test_dataset_rejects_mixed_dimensions() {
        let points = vec![Point::from((60, 1)), Point::new(vec![62, 1, 0])];
        match Dataset::new(&points) {
            Err(OstinatoError::DimensionMismatch { index, expected, found }) => {
                assert_eq!((index, expected, found), (1, 2, 3));
            }
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_dataset_rejects_untranslatable_range() {
        let points = vec![Point::from((i64::MIN, 0)), Point::from((i64::MAX, 0))];
        match Dataset::new(&points) {
            Err(OstinatoError::CoordinateRange { axis, min, max }) => {
                assert_eq!((axis, min, max), (0, i64::MIN, i64::MAX));
            }
            other => panic!("expected CoordinateRange, got {:?}", other),
        }
    }

    #[test]
    fn test_dataset_accepts_widest_representable_range() {
        let points = vec![Point::from((0, -1)), Point::from((i64::MAX, -1))];
        assert!(Dataset::new(&points).is_ok());
    }

    #[test]
    fn test_checked_translate() {
        let p = Point::from((i64::MAX, 0));
        assert_eq!(p.checked_translate(&Vector::from((1, 0))), None);
        assert_eq!(
            p.checked_translate(&Vector::from((-1, 2))),
            Some(Point::from((i64::MAX - 1, 2)))
        );
    }

    #[test]
    fn test_dataset_is_restartable() {
        let points = vec![Point::from((60, 1)), Point::from((62, 1))];
        let dataset = Dataset::new(&points).unwrap();
        let first: Vec<_> = dataset.iter().collect();
        let second: Vec<_> = dataset.iter().collect();
        assert_eq!(first, second);
        assert_eq!(dataset.into_iter().count(), 2);
        assert_eq!(dataset.dimension(), Some(2));
    }

    #[test]
    fn test_empty_dataset_is_valid() {
        let dataset = Dataset::new(&[]).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.dimension(), None);
    }

    #[test]
    fn test_point_index_membership() {
        let points = vec![
            Point::from((60, 1)),
            Point::from((62, 1)),
            Point::from((60, 1)),
        ];
        let index = Dataset::new(&points).unwrap().index();
        assert!(index.contains(&Point::from((60, 1))));
        assert!(index.contains(&Point::from((62, 1))));
        assert!(!index.contains(&Point::from((64, 1))));
    }
}
