//! Melodic lines: notes and rests with measure-relative timing.
//!
//! Durations and onsets are fractions of the enclosing measure, so a quarter
//! note in 4/4 is 0.25 regardless of the file's `<divisions>`.

use std::fmt;

use crate::point::Point;

/// Pitch coordinate of a rest.
pub const REST: i64 = -1;

/// Resolution of the duration coordinate: a whole measure is this many units.
pub const DURATION_QUANTUM: i64 = 1_000_000;

pub const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

/// Semitone offset of a natural step above C.
pub fn step_offset(step: &str) -> Option<i64> {
    match step {
        "C" => Some(0),
        "D" => Some(2),
        "E" => Some(4),
        "F" => Some(5),
        "G" => Some(7),
        "A" => Some(9),
        "B" => Some(11),
        _ => None,
    }
}

/// MIDI number of a written pitch (middle C, `C4`, is 60).
pub fn pitch_value(step: &str, octave: i64, alter: i64) -> Option<i64> {
    step_offset(step).map(|offset| (octave + 1) * 12 + offset + alter)
}

pub fn pitch_name(pitch: i64) -> &'static str {
    PITCH_NAMES[pitch.rem_euclid(12) as usize]
}

/// Named note values, as fractions of a 4/4 measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationLabel {
    Breve,
    Whole,
    DottedHalf,
    Half,
    DottedQuarter,
    Quarter,
    DottedEighth,
    Eighth,
    DottedSixteenth,
    Sixteenth,
    DottedThirtySecond,
    ThirtySecond,
    SixtyFourth,
}

impl DurationLabel {
    pub const ALL: [DurationLabel; 13] = [
        DurationLabel::Breve,
        DurationLabel::Whole,
        DurationLabel::DottedHalf,
        DurationLabel::Half,
        DurationLabel::DottedQuarter,
        DurationLabel::Quarter,
        DurationLabel::DottedEighth,
        DurationLabel::Eighth,
        DurationLabel::DottedSixteenth,
        DurationLabel::Sixteenth,
        DurationLabel::DottedThirtySecond,
        DurationLabel::ThirtySecond,
        DurationLabel::SixtyFourth,
    ];

    pub fn value(self) -> f64 {
        match self {
            DurationLabel::Breve => 2.0,
            DurationLabel::Whole => 1.0,
            DurationLabel::DottedHalf => 0.75,
            DurationLabel::Half => 0.5,
            DurationLabel::DottedQuarter => 0.375,
            DurationLabel::Quarter => 0.25,
            DurationLabel::DottedEighth => 0.1875,
            DurationLabel::Eighth => 0.125,
            DurationLabel::DottedSixteenth => 0.09375,
            DurationLabel::Sixteenth => 0.0625,
            DurationLabel::DottedThirtySecond => 0.046875,
            DurationLabel::ThirtySecond => 0.03125,
            DurationLabel::SixtyFourth => 0.015625,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            DurationLabel::Breve => "BRV",
            DurationLabel::Whole => "WHL",
            DurationLabel::DottedHalf => "DHLF",
            DurationLabel::Half => "HLF",
            DurationLabel::DottedQuarter => "DQTR",
            DurationLabel::Quarter => "QTR",
            DurationLabel::DottedEighth => "DEGT",
            DurationLabel::Eighth => "EGT",
            DurationLabel::DottedSixteenth => "DSXT",
            DurationLabel::Sixteenth => "SXT",
            DurationLabel::DottedThirtySecond => "DTSD",
            DurationLabel::ThirtySecond => "TSD",
            DurationLabel::SixtyFourth => "SXF",
        }
    }

    /// Exact match only; all labelled values are dyadic so no tolerance is needed.
    pub fn for_value(value: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.value() == value)
    }
}

/// A duration as a fraction of its measure.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Duration(f64);

impl Duration {
    pub fn new(fraction: f64) -> Self {
        Self(fraction)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn label(self) -> Option<DurationLabel> {
        DurationLabel::for_value(self.0)
    }

    /// Duration coordinate for the point-set: the fraction rounded to the quantum.
    pub fn quantized(self) -> i64 {
        (self.0 * DURATION_QUANTUM as f64).round() as i64
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{}", label.abbreviation()),
            None => write!(f, "{:.4}", self.0),
        }
    }
}

/// A melodic event: a pitched note or a rest.
#[derive(Debug, Clone, PartialEq)]
pub enum MelodyElement {
    Note {
        pitch: i64,
        duration: Duration,
        onset: f64,
    },
    Rest {
        duration: Duration,
        onset: f64,
    },
}

impl MelodyElement {
    pub fn duration(&self) -> Duration {
        match self {
            MelodyElement::Note { duration, .. } | MelodyElement::Rest { duration, .. } => *duration,
        }
    }

    pub fn onset(&self) -> f64 {
        match self {
            MelodyElement::Note { onset, .. } | MelodyElement::Rest { onset, .. } => *onset,
        }
    }

    /// `(pitch, quantized duration)`, with [`REST`] as the pitch of a rest.
    pub fn to_point(&self) -> Point {
        match self {
            MelodyElement::Note { pitch, duration, .. } => Point::from((*pitch, duration.quantized())),
            MelodyElement::Rest { duration, .. } => Point::from((REST, duration.quantized())),
        }
    }
}

impl fmt::Display for MelodyElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MelodyElement::Note { pitch, duration, .. } => {
                write!(f, "({}{}, {})", pitch_name(*pitch), pitch.div_euclid(12) - 1, duration)
            }
            MelodyElement::Rest { duration, .. } => write!(f, "(--, {})", duration),
        }
    }
}

/// The notes and rests of one measure, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Melody {
    pub notes: Vec<MelodyElement>,
}

impl Melody {
    /// Build a melody from raw `(pitch, divisions)` events, `None` marking a rest.
    ///
    /// Durations and onsets are divided by the events' total, so the result
    /// is independent of the file's division resolution. A measure with no
    /// positive total yields an empty melody.
    pub fn from_events(events: &[(Option<i64>, f64)]) -> Self {
        let total: f64 = events.iter().map(|(_, d)| d).sum();
        if total <= 0.0 {
            return Self::default();
        }

        let mut elapsed = 0.0;
        let notes = events
            .iter()
            .map(|&(pitch, dur)| {
                let onset = elapsed / total;
                elapsed += dur;
                let duration = Duration::new(dur / total);
                match pitch {
                    Some(pitch) => MelodyElement::Note { pitch, duration, onset },
                    None => MelodyElement::Rest { duration, onset },
                }
            })
            .collect();

        Self { notes }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MelodyElement> {
        self.notes.iter()
    }

    pub fn to_points(&self) -> Vec<Point> {
        self.notes.iter().map(MelodyElement::to_point).collect()
    }
}

impl<'a> IntoIterator for &'a Melody {
    type Item = &'a MelodyElement;
    type IntoIter = std::slice::Iter<'a, MelodyElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

impl fmt::Display for Melody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notes: Vec<String> = self.notes.iter().map(MelodyElement::to_string).collect();
        write!(f, "MELODY: {}", notes.join("; "))
    }
}
