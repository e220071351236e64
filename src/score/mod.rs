//! # Score Model
//!
//! Reads MusicXML scores and reduces a part to the point-set consumed by
//! [`discover_patterns`](crate::discover_patterns).
//!
//! ## Type Hierarchy
//! ```text
//! Score
//!   └── Vec<Part>
//!         ├── id, instrument
//!         └── Vec<Measure>
//!               ├── key: Option<Key>
//!               ├── melody: Melody (Vec<MelodyElement>: Note | Rest)
//!               └── harmony: Harmony (Vec<ProgressionChord>)
//! ```
//!
//! ## Point Convention
//! Each melody element becomes one `(pitch, duration)` point: the MIDI pitch
//! ([`REST`] for rests) and the element's share of its measure quantized to
//! [`DURATION_QUANTUM`]. Chord tones after the first and grace notes are not
//! part of the line.
//!
//! ## Example
//! ```rust
//! use ostinato::{Point, Score};
//!
//! let score = Score::from_xml_str(r#"
//! <score-partwise>
//!   <part id="P1">
//!     <measure number="1">
//!       <note><pitch><step>C</step><octave>4</octave></pitch><duration>2</duration></note>
//!       <note><rest/><duration>2</duration></note>
//!     </measure>
//!   </part>
//! </score-partwise>"#)?;
//!
//! assert_eq!(
//!     score.to_dataset(1)?,
//!     vec![Point::from((60, 500_000)), Point::from((-1, 500_000))]
//! );
//! # Ok::<(), ostinato::OstinatoError>(())
//! ```

mod melody;
mod parser;
mod tonality;
mod xml;

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tracing::{debug, info};
use zip::ZipArchive;

pub use melody::{
    pitch_name, pitch_value, Duration, DurationLabel, Melody, MelodyElement, DURATION_QUANTUM, REST,
};
pub use parser::parse_score;
pub use tonality::{ChordKind, Harmony, Key, ProgressionChord};

use crate::error::OstinatoError;
use crate::point::Point;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Score {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Part {
    pub id: String,
    pub instrument: String,
    pub measures: Vec<Measure>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Measure {
    pub key: Option<Key>,
    pub melody: Melody,
    pub harmony: Harmony,
}

impl Score {
    pub fn from_xml_str(xml: &str) -> Result<Self, OstinatoError> {
        parse_score(xml)
    }

    /// Read a MusicXML file: plain (`.xml`, `.musicxml`) or compressed (`.mxl`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OstinatoError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let compressed = match extension.as_deref() {
            Some("xml") | Some("musicxml") => false,
            Some("mxl") => true,
            _ => return Err(OstinatoError::UnsupportedFile(path.display().to_string())),
        };

        info!(path = %path.display(), compressed, "reading score");
        let io_error = |source: std::io::Error| OstinatoError::Io {
            path: path.to_path_buf(),
            source,
        };
        if compressed {
            let file = File::open(path).map_err(io_error)?;
            return Self::from_mxl_reader(BufReader::new(file));
        }
        let xml = fs::read_to_string(path).map_err(io_error)?;
        Self::from_xml_str(&xml)
    }

    /// Read a compressed MusicXML archive. The score is the first `.xml`
    /// entry at the archive root; `META-INF/container.xml` is never chosen.
    pub fn from_mxl_reader<R: Read + Seek>(reader: R) -> Result<Self, OstinatoError> {
        let mut archive = ZipArchive::new(reader)?;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            if !name.ends_with(".xml") || name.contains('/') {
                continue;
            }

            debug!(entry = %name, "extracting score from archive");
            let mut xml = String::new();
            entry
                .read_to_string(&mut xml)
                .map_err(|e| OstinatoError::Archive(format!("{}: {}", name, e)))?;
            return Self::from_xml_str(&xml);
        }
        Err(OstinatoError::Archive(
            "no root-level .xml score in archive".to_string(),
        ))
    }

    /// Part by 1-based number.
    pub fn part(&self, number: usize) -> Result<&Part, OstinatoError> {
        number
            .checked_sub(1)
            .and_then(|i| self.parts.get(i))
            .ok_or(OstinatoError::PartNotFound {
                requested: number,
                available: self.parts.len(),
            })
    }

    /// The point-set of a part (1-based), in musical order.
    pub fn to_dataset(&self, part_number: usize) -> Result<Vec<Point>, OstinatoError> {
        Ok(self.part(part_number)?.to_dataset())
    }
}

impl Part {
    pub fn to_dataset(&self) -> Vec<Point> {
        self.measures.iter().flat_map(Measure::to_points).collect()
    }
}

impl Measure {
    pub fn to_points(&self) -> Vec<Point> {
        self.melody.to_points()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .parts
            .iter()
            .enumerate()
            .map(|(i, p)| format!("PART {}:\n{}", i + 1, p))
            .collect();
        write!(f, "SCORE\n{}", parts.join("\n"))
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let measures: Vec<String> = self
            .measures
            .iter()
            .enumerate()
            .map(|(i, m)| format!("MEASURE {}:\n{}", i + 1, m))
            .collect();
        write!(f, "INSTRUMENT: {}\n{}", self.instrument, measures.join("\n"))
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(key) = &self.key {
            writeln!(f, "{}", key)?;
        }
        if !self.harmony.is_empty() {
            writeln!(f, "{}", self.harmony)?;
        }
        if !self.melody.is_empty() {
            writeln!(f, "{}", self.melody)?;
        }
        Ok(())
    }
}
