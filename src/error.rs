//! # Error Types
//!
//! This module defines all error types for the Ostinato pattern finder.
//!
//! Pattern discovery itself is a total computation once its input has been
//! validated, so almost every variant here belongs to the boundary: reading
//! a score file, walking its MusicXML, loading configuration.
//!
//! ## Error Types
//! - `DimensionMismatch` - Points of inconsistent dimensionality in one dataset
//! - `CoordinateRange` - Coordinates too far apart for their difference to be represented
//! - `XmlError` - Malformed XML
//! - `ScoreError` - Well-formed XML that is not a usable MusicXML score, with measure number
//! - `UnsupportedFile` - Unknown score file type
//! - `Archive` - Unreadable compressed MusicXML (`.mxl`)
//! - `PartNotFound` - Requested part number outside the score
//! - `ConfigError` - Invalid YAML configuration
//! - `Serialization` - Results could not be rendered as JSON
//! - `Io` - File could not be read
//!
//! ## Usage
//! ```rust
//! use ostinato::{discover_patterns, OstinatoError, Point};
//!
//! let dataset = vec![Point::new(vec![60, 1]), Point::new(vec![62])];
//! match discover_patterns(&dataset) {
//!     Ok(tecs) => println!("{} patterns", tecs.len()),
//!     Err(OstinatoError::DimensionMismatch { index, expected, found }) => {
//!         eprintln!("Point {} has {} coordinates, expected {}", index, found, expected);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OstinatoError {
    /// A point whose dimensionality differs from the first point of the dataset.
    ///
    /// # Example
    /// ```
    /// # use ostinato::OstinatoError;
    /// let err = OstinatoError::DimensionMismatch { index: 3, expected: 2, found: 1 };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Point 3 has 1 coordinates, expected 2 (all points of a dataset must share one dimensionality)"
    /// );
    /// ```
    #[error("Point {index} has {found} coordinates, expected {expected} (all points of a dataset must share one dimensionality)")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Two coordinates on one axis whose difference overflows `i64`.
    ///
    /// # Example
    /// ```
    /// # use ostinato::OstinatoError;
    /// let err = OstinatoError::CoordinateRange { axis: 0, min: -5, max: i64::MAX };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Coordinates on axis 0 span -5 to 9223372036854775807, too wide to translate between"
    /// );
    /// ```
    #[error("Coordinates on axis {axis} span {min} to {max}, too wide to translate between")]
    CoordinateRange { axis: usize, min: i64, max: i64 },

    /// The score file is not well-formed XML.
    #[error("Malformed XML: {0}")]
    XmlError(String),

    /// Well-formed XML that does not describe a usable score.
    ///
    /// `measure` is 1-based; 0 means the problem is outside any measure.
    ///
    /// # Example
    /// ```
    /// # use ostinato::OstinatoError;
    /// let err = OstinatoError::ScoreError {
    ///     measure: 4,
    ///     message: "note has no <duration>".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Score error at measure 4: note has no <duration>");
    /// ```
    #[error("Score error at measure {measure}: {message}")]
    ScoreError { measure: usize, message: String },

    #[error("Unsupported music file type: {0}")]
    UnsupportedFile(String),

    /// A `.mxl` archive that cannot be read or holds no root-level score.
    #[error("Invalid MusicXML archive: {0}")]
    Archive(String),

    #[error("Part {requested} not found (score has {available} parts)")]
    PartNotFound { requested: usize, available: usize },

    /// Invalid configuration.
    ///
    /// # Example
    /// ```
    /// # use ostinato::OstinatoError;
    /// let err = OstinatoError::ConfigError("part must be at least 1".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: part must be at least 1");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<quick_xml::Error> for OstinatoError {
    fn from(err: quick_xml::Error) -> Self {
        OstinatoError::XmlError(err.to_string())
    }
}

impl From<zip::result::ZipError> for OstinatoError {
    fn from(err: zip::result::ZipError) -> Self {
        OstinatoError::Archive(err.to_string())
    }
}
