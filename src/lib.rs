pub mod config;
pub mod error;
pub mod logging;
pub mod point;
pub mod report;
pub mod score;
pub mod siatec;

pub use config::{AnalysisConfig, OutputFormat};
pub use error::*;
pub use point::{Dataset, Point, Vector};
pub use score::Score;
pub use siatec::{discover_patterns, Tec};

/// Discover repeated patterns in one part (1-based) of a MusicXML document.
/// This is the main entry point for score analysis.
pub fn discover_in_musicxml(xml: &str, part: usize) -> Result<Vec<Tec>, OstinatoError> {
    let score = Score::from_xml_str(xml)?;
    let dataset = score.to_dataset(part)?;
    discover_patterns(&dataset)
}
