//! Key signatures and chord symbols.
//!
//! These are read from the score and printed back; no harmonic analysis is
//! done on them.

use std::fmt;

use super::melody::pitch_name;

/// Chord or key quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordKind {
    Unset,
    Major,
    Minor,
    MajorMinor,
    Augmented,
    Diminished,
    Dominant,
    HalfDiminished,
    SuspendedFourth,
    MajorSixth,
    MinorSixth,
    MajorSeventh,
    MinorSeventh,
    AugmentedSeventh,
    DiminishedSeventh,
    MajorNinth,
    MinorNinth,
    DominantNinth,
    MinorEleventh,
    DominantThirteenth,
    SuspendedSecond,
}

/// MusicXML `<kind>` / `<mode>` text for each quality.
const MUSICXML_KINDS: [(&str, ChordKind); 21] = [
    ("major", ChordKind::Major),
    ("minor", ChordKind::Minor),
    ("major-minor", ChordKind::MajorMinor),
    ("augmented", ChordKind::Augmented),
    ("diminished", ChordKind::Diminished),
    ("dominant", ChordKind::Dominant),
    ("half-diminished", ChordKind::HalfDiminished),
    ("suspended-fourth", ChordKind::SuspendedFourth),
    ("major-sixth", ChordKind::MajorSixth),
    ("minor-sixth", ChordKind::MinorSixth),
    ("major-seventh", ChordKind::MajorSeventh),
    ("minor-seventh", ChordKind::MinorSeventh),
    ("augmented-seventh", ChordKind::AugmentedSeventh),
    ("diminished-seventh", ChordKind::DiminishedSeventh),
    ("major-ninth", ChordKind::MajorNinth),
    ("minor-ninth", ChordKind::MinorNinth),
    ("dominant-ninth", ChordKind::DominantNinth),
    ("minor-11th", ChordKind::MinorEleventh),
    ("dominant-13th", ChordKind::DominantThirteenth),
    ("suspended-second", ChordKind::SuspendedSecond),
    ("none", ChordKind::Unset),
];

impl ChordKind {
    pub fn from_musicxml(kind: &str) -> Option<Self> {
        MUSICXML_KINDS
            .iter()
            .find(|(name, _)| *name == kind)
            .map(|&(_, kind)| kind)
    }

    /// Short display label (`M`, `m`, `D9`, ...).
    pub fn label(self) -> &'static str {
        match self {
            ChordKind::Unset => "--",
            ChordKind::Major => "M",
            ChordKind::Minor => "m",
            ChordKind::MajorMinor => "Mm",
            ChordKind::Augmented => "A",
            ChordKind::Diminished => "d",
            ChordKind::Dominant => "D",
            ChordKind::HalfDiminished => "hd",
            ChordKind::SuspendedFourth => "S4",
            ChordKind::MajorSixth => "M6",
            ChordKind::MinorSixth => "m6",
            ChordKind::MajorSeventh => "M7",
            ChordKind::MinorSeventh => "m7",
            ChordKind::AugmentedSeventh => "A7",
            ChordKind::DiminishedSeventh => "d7",
            ChordKind::MajorNinth => "M9",
            ChordKind::MinorNinth => "m9",
            ChordKind::DominantNinth => "D9",
            ChordKind::MinorEleventh => "m11",
            ChordKind::DominantThirteenth => "D13",
            ChordKind::SuspendedSecond => "S2",
        }
    }
}

/// A key signature: tonic pitch class and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub root: i64,
    pub mode: ChordKind,
}

impl Key {
    /// Key from a circle-of-fifths position (`-7..=7`) and mode.
    ///
    /// Only major and minor have a tonic implied by the signature; other
    /// modes return `None`.
    pub fn from_fifths(fifths: i64, mode: ChordKind) -> Option<Self> {
        let major_root = (fifths.rem_euclid(12) * 7).rem_euclid(12);
        let root = match mode {
            ChordKind::Major => major_root,
            ChordKind::Minor => (major_root + 9).rem_euclid(12),
            _ => return None,
        };
        Some(Self { root, mode })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY: ({}, {})", pitch_name(self.root), self.mode.label())
    }
}

/// A chord symbol: root pitch class and quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionChord {
    pub root: i64,
    pub kind: ChordKind,
}

impl fmt::Display for ProgressionChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", pitch_name(self.root), self.kind.label())
    }
}

/// Chord symbols of one measure, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Harmony {
    pub chords: Vec<ProgressionChord>,
}

impl Harmony {
    pub fn push(&mut self, chord: ProgressionChord) {
        self.chords.push(chord);
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProgressionChord> {
        self.chords.iter()
    }
}

impl<'a> IntoIterator for &'a Harmony {
    type Item = &'a ProgressionChord;
    type IntoIter = std::slice::Iter<'a, ProgressionChord>;

    fn into_iter(self) -> Self::IntoIter {
        self.chords.iter()
    }
}

impl fmt::Display for Harmony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chords: Vec<String> = self.chords.iter().map(ProgressionChord::to_string).collect();
        write!(f, "HARMONY: {}", chords.join("; "))
    }
}
