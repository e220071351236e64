//! # Pattern Discovery (SIATEC)
//!
//! Finds every maximal pattern of points that recurs elsewhere in a dataset
//! under a translation, together with all translations that map it onto a
//! further occurrence.
//!
//! ## Pipeline
//! 1. [`vector_table`] - every pairwise vector `dataset[j] - dataset[i]`, `i < j`,
//!    sorted by vector
//! 2. [`extract_mtps`] - one Maximal Translatable Pattern per distinct vector
//! 3. [`merge_tecs`] - group MTPs by anchored shape, verify translators, drop
//!    dominated classes
//!
//! ## Entry Point
//! [`discover_patterns()`]
//!
//! ## Example
//! ```rust
//! use ostinato::{discover_patterns, Point, Vector};
//!
//! let melody: Vec<Point> = vec![(60, 1).into(), (62, 1).into(), (62, 1).into(), (64, 1).into()];
//! let tecs = discover_patterns(&melody)?;
//!
//! assert_eq!(tecs.len(), 1);
//! assert_eq!(tecs[0].pattern, vec![Point::from((60, 1)), Point::from((62, 1))]);
//! assert_eq!(tecs[0].translators, vec![Vector::from((2, 0))]);
//! # Ok::<(), ostinato::OstinatoError>(())
//! ```
//!
//! ## Cost
//! The vector table holds n(n-1)/2 entries, so memory is quadratic in the
//! dataset length. Callers should bound their input before calling.

mod mtp;
mod tec;
mod vector_table;


pub use mtp::{extract_mtps, Mtp};
pub use tec::{merge_tecs, Tec};
pub use vector_table::{vector_table, VectorTableEntry};

use tracing::debug;

use crate::error::OstinatoError;
use crate::point::{Dataset, Point};

/// Discover all Translational Equivalence Classes in `points`.
///
/// Returns an empty list for fewer than two points. The result is sorted by
/// pattern, which carries no meaning beyond making runs reproducible.
///
/// # Errors
/// [`OstinatoError::DimensionMismatch`] if the points do not all share one
/// dimensionality. Nothing past validation can fail.
pub fn discover_patterns(points: &[Point]) -> Result<Vec<Tec>, OstinatoError> {
    let _span = tracing::debug_span!("discover_patterns", points = points.len()).entered();

    let dataset = Dataset::new(points)?;
    if dataset.len() < 2 {
        return Ok(Vec::new());
    }

    let table = vector_table(&dataset);
    debug!(entries = table.len(), "built vector table");

    let mtps = extract_mtps(&table);
    drop(table);
    debug!(mtps = mtps.len(), "extracted MTPs");

    let tecs = merge_tecs(&dataset, mtps);
    debug!(tecs = tecs.len(), "discovered TECs");
    Ok(tecs)
}
