//! Build a [`Score`] from a MusicXML (`score-partwise`) document.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use tracing::{debug, info, warn};

use super::melody::{pitch_value, step_offset, Melody};
use super::tonality::{ChordKind, Harmony, Key, ProgressionChord};
use super::xml::{parse_document, XmlElement};
use super::{Measure, Part, Score};
use crate::error::OstinatoError;

/// Raw `(pitch, divisions)` event; `None` pitch is a rest.
type NoteEvent = (Option<i64>, f64);

/// MusicXML `octave-type`.
const OCTAVES: RangeInclusive<i64> = 0..=9;
/// Chromatic alteration in semitones, up to triple sharps and flats.
const ALTERATIONS: RangeInclusive<i64> = -3..=3;
/// Key signatures from seven flats to seven sharps.
const FIFTHS: RangeInclusive<i64> = -7..=7;

pub fn parse_score(xml: &str) -> Result<Score, OstinatoError> {
    let root = parse_document(xml)?;
    if root.name != "score-partwise" {
        return Err(OstinatoError::ScoreError {
            measure: 0,
            message: format!("expected a <score-partwise> document, found <{}>", root.name),
        });
    }

    let instruments = instrument_names(&root);
    let mut parts = Vec::new();
    for (i, part_xml) in root.children_named("part").enumerate() {
        let id = part_xml
            .attribute("id")
            .map(str::to_string)
            .unwrap_or_else(|| format!("P{}", i + 1));
        debug!(part = %id, "parsing part");

        let measures = part_xml
            .children_named("measure")
            .enumerate()
            .map(|(m, measure_xml)| parse_measure(measure_xml, m + 1))
            .collect::<Result<Vec<_>, _>>()?;

        let instrument = instruments.get(&id).cloned().unwrap_or_default();
        parts.push(Part {
            id,
            instrument,
            measures,
        });
    }

    info!(parts = parts.len(), "parsed score");
    Ok(Score { parts })
}

/// Part id to instrument name, from `<part-list>`.
///
/// Prefers `<score-instrument>/<instrument-name>` and falls back to `<part-name>`.
fn instrument_names(root: &XmlElement) -> HashMap<String, String> {
    let Some(part_list) = root.child("part-list") else {
        return HashMap::new();
    };

    part_list
        .children_named("score-part")
        .filter_map(|score_part| {
            let id = score_part.attribute("id")?;
            let name = score_part
                .child("score-instrument")
                .and_then(|i| i.child_text("instrument-name"))
                .or_else(|| score_part.child_text("part-name"))
                .unwrap_or_default();
            Some((id.to_string(), name.to_string()))
        })
        .collect()
}

fn parse_measure(xml: &XmlElement, number: usize) -> Result<Measure, OstinatoError> {
    let mut key = None;
    let mut harmony = Harmony::default();
    let mut events: Vec<NoteEvent> = Vec::new();

    for element in &xml.children {
        match element.name.as_str() {
            "note" => {
                if let Some(event) = parse_note(element, number)? {
                    events.push(event);
                }
            }
            "harmony" => {
                if let Some(chord) = parse_harmony(element, number)? {
                    harmony.push(chord);
                }
            }
            "attributes" => {
                if let Some(key_xml) = element.child("key") {
                    key = parse_key(key_xml, number)?;
                }
            }
            _ => {}
        }
    }

    Ok(Measure {
        key,
        melody: Melody::from_events(&events),
        harmony,
    })
}

/// Chord tones after the first and grace notes take no time in the line and are skipped.
fn parse_note(xml: &XmlElement, measure: usize) -> Result<Option<NoteEvent>, OstinatoError> {
    if xml.child("chord").is_some() || xml.child("grace").is_some() {
        return Ok(None);
    }

    let duration_text = xml
        .child_text("duration")
        .ok_or_else(|| score_error(measure, "note has no <duration>"))?;
    let duration: f64 = duration_text
        .parse()
        .ok()
        .filter(|d: &f64| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| score_error(measure, format!("invalid note duration '{}'", duration_text)))?;

    if xml.child("rest").is_some() {
        return Ok(Some((None, duration)));
    }

    let Some(pitch_xml) = xml.child("pitch") else {
        warn!(measure, "skipping unpitched note");
        return Ok(None);
    };

    let step = pitch_xml
        .child_text("step")
        .ok_or_else(|| score_error(measure, "pitch has no <step>"))?;
    let octave: i64 = pitch_xml
        .child_text("octave")
        .ok_or_else(|| score_error(measure, "pitch has no <octave>"))?
        .parse::<i64>()
        .ok()
        .filter(|o| OCTAVES.contains(o))
        .ok_or_else(|| score_error(measure, "invalid <octave>"))?;
    let alter = parse_alter(pitch_xml.child_text("alter"), measure)?;

    let pitch = pitch_value(step, octave, alter)
        .ok_or_else(|| score_error(measure, format!("invalid step '{}'", step)))?;
    Ok(Some((Some(pitch), duration)))
}

/// `<alter>` may be fractional (microtones); it is rounded to the nearest semitone.
fn parse_alter(text: Option<&str>, measure: usize) -> Result<i64, OstinatoError> {
    match text {
        None => Ok(0),
        Some(text) => text
            .parse::<f64>()
            .ok()
            .map(|a| a.round() as i64)
            .filter(|a| ALTERATIONS.contains(a))
            .ok_or_else(|| score_error(measure, format!("invalid alter '{}'", text))),
    }
}

fn parse_harmony(xml: &XmlElement, measure: usize) -> Result<Option<ProgressionChord>, OstinatoError> {
    let root_xml = xml
        .child("root")
        .ok_or_else(|| score_error(measure, "harmony has no <root>"))?;
    let step = root_xml
        .child_text("root-step")
        .ok_or_else(|| score_error(measure, "harmony root has no <root-step>"))?;
    let alter = parse_alter(root_xml.child_text("root-alter"), measure)?;
    let offset = step_offset(step)
        .ok_or_else(|| score_error(measure, format!("invalid root step '{}'", step)))?;

    let kind_text = xml.child_text("kind").unwrap_or("none");
    let Some(kind) = ChordKind::from_musicxml(kind_text) else {
        warn!(measure, kind = kind_text, "skipping chord of unknown kind");
        return Ok(None);
    };

    Ok(Some(ProgressionChord {
        root: (offset + alter).rem_euclid(12),
        kind,
    }))
}

fn parse_key(xml: &XmlElement, measure: usize) -> Result<Option<Key>, OstinatoError> {
    // Non-traditional keys (<key-step>/<key-alter> lists) carry no fifths.
    let Some(fifths_text) = xml.child_text("fifths") else {
        return Ok(None);
    };
    let fifths: i64 = fifths_text
        .parse::<i64>()
        .ok()
        .filter(|f| FIFTHS.contains(f))
        .ok_or_else(|| score_error(measure, format!("invalid <fifths> '{}'", fifths_text)))?;

    let mode_text = xml.child_text("mode").unwrap_or("major");
    let key = ChordKind::from_musicxml(mode_text).and_then(|mode| Key::from_fifths(fifths, mode));
    if key.is_none() {
        warn!(measure, mode = mode_text, "key mode has no implied tonic");
    }
    Ok(key)
}

fn score_error(measure: usize, message: impl Into<String>) -> OstinatoError {
    OstinatoError::ScoreError {
        measure,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::melody::{MelodyElement, REST};

    fn measure(body: &str) -> Result<Measure, OstinatoError> {
        let xml = parse_document(&format!("<measure number=\"1\">{}</measure>", body))?;
        parse_measure(&xml, 1)
    }

    #[test]
    fn test_notes_and_rests() {
        let m = measure(
            "<note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>\
             <note><rest/><duration>1</duration></note>\
             <note><pitch><step>F</step><alter>1</alter><octave>4</octave></pitch><duration>2</duration></note>",
        )
        .unwrap();

        let points: Vec<(i64, i64)> = m
            .melody
            .to_points()
            .iter()
            .map(|p| (p.coords()[0], p.coords()[1]))
            .collect();
        assert_eq!(points, vec![(60, 250_000), (REST, 250_000), (66, 500_000)]);
    }

    #[test]
    fn test_chord_and_grace_notes_are_skipped() {
        let m = measure(
            "<note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration></note>\
             <note><chord/><pitch><step>E</step><octave>4</octave></pitch><duration>4</duration></note>\
             <note><grace/><pitch><step>D</step><octave>4</octave></pitch></note>",
        )
        .unwrap();

        assert_eq!(m.melody.len(), 1);
        assert!(matches!(m.melody.notes[0], MelodyElement::Note { pitch: 60, .. }));
    }

    #[test]
    fn test_missing_duration_is_an_error() {
        let err = measure("<note><pitch><step>C</step><octave>4</octave></pitch></note>").unwrap_err();
        assert_eq!(err.to_string(), "Score error at measure 1: note has no <duration>");
    }

    #[test]
    fn test_invalid_step_is_an_error() {
        let result = measure("<note><pitch><step>X</step><octave>4</octave></pitch><duration>1</duration></note>");
        assert!(matches!(result, Err(OstinatoError::ScoreError { measure: 1, .. })));
    }

    #[test]
    fn test_key_and_harmony() {
        let m = measure(
            "<attributes><divisions>1</divisions><key><fifths>-1</fifths><mode>minor</mode></key></attributes>\
             <harmony><root><root-step>B</root-step><root-alter>-1</root-alter></root><kind>major-seventh</kind></harmony>\
             <harmony><root><root-step>A</root-step></root><kind>pedal</kind></harmony>",
        )
        .unwrap();

        assert_eq!(m.key, Some(Key { root: 2, mode: ChordKind::Minor }));
        assert_eq!(
            m.harmony.chords,
            vec![ProgressionChord { root: 10, kind: ChordKind::MajorSeventh }]
        );
        assert!(m.melody.is_empty());
    }

    #[test]
    fn test_out_of_range_octave_is_an_error() {
        let result = measure(
            "<note><pitch><step>C</step><octave>9223372036854775807</octave></pitch><duration>1</duration></note>",
        );
        assert!(matches!(result, Err(OstinatoError::ScoreError { measure: 1, .. })));

        let result = measure("<note><pitch><step>C</step><octave>-1</octave></pitch><duration>1</duration></note>");
        assert!(matches!(result, Err(OstinatoError::ScoreError { measure: 1, .. })));
    }

    #[test]
    fn test_out_of_range_alter_is_an_error() {
        let result = measure(
            "<note><pitch><step>C</step><alter>1e300</alter><octave>4</octave></pitch><duration>1</duration></note>",
        );
        assert!(matches!(result, Err(OstinatoError::ScoreError { measure: 1, .. })));

        let result = measure("<harmony><root><root-step>C</root-step><root-alter>-9</root-alter></root><kind>major</kind></harmony>");
        assert!(matches!(result, Err(OstinatoError::ScoreError { measure: 1, .. })));
    }

    #[test]
    fn test_out_of_range_fifths_is_an_error() {
        let err = measure("<attributes><key><fifths>9223372036854775807</fifths></key></attributes>").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Score error at measure 1: invalid <fifths> '9223372036854775807'"
        );
        assert!(measure("<attributes><key><fifths>8</fifths></key></attributes>").is_err());
        assert!(measure("<attributes><key><fifths>-7</fifths></key></attributes>").is_ok());
    }

    #[test]
    fn test_extreme_pitches_in_range() {
        let m = measure(
            "<note><pitch><step>C</step><alter>-1</alter><octave>0</octave></pitch><duration>1</duration></note>             <note><pitch><step>B</step><alter>3</alter><octave>9</octave></pitch><duration>1</duration></note>",
        )
        .unwrap();
        assert!(matches!(m.melody.notes[0], MelodyElement::Note { pitch: 11, .. }));
        assert!(matches!(m.melody.notes[1], MelodyElement::Note { pitch: 134, .. }));
    }

    #[test]
    fn test_key_without_mode_is_major() {
        let m = measure("<attributes><key><fifths>2</fifths></key></attributes>").unwrap();
        assert_eq!(m.key, Some(Key { root: 2, mode: ChordKind::Major }));
    }

    #[test]
    fn test_rejects_other_document_types() {
        let result = parse_score("<score-timewise/>");
        assert!(matches!(result, Err(OstinatoError::ScoreError { measure: 0, .. })));
    }

    #[test]
    fn test_instrument_names() {
        let score = parse_score(
            r#"<score-partwise>
  <part-list>
    <score-part id="P1"><part-name>Flute</part-name>
      <score-instrument id="P1-I1"><instrument-name>Alto Flute</instrument-name></score-instrument>
    </score-part>
    <score-part id="P2"><part-name>Cello</part-name></score-part>
  </part-list>
  <part id="P1"/>
  <part id="P2"/>
</score-partwise>"#,
        )
        .unwrap();

        assert_eq!(score.parts[0].instrument, "Alto Flute");
        assert_eq!(score.parts[1].instrument, "Cello");
        assert!(score.parts[1].measures.is_empty());
    }
}
