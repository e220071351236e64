//! # Reporting
//!
//! Caller-side post-processing of discovered TECs: keep the ones that meet
//! the configured size thresholds, order them largest first, and render them
//! as text or JSON.

use crate::config::AnalysisConfig;
use crate::error::OstinatoError;
use crate::siatec::Tec;

/// Keep TECs meeting both thresholds, sorted by pattern size then translator
/// count, both descending.
pub fn select(tecs: Vec<Tec>, config: &AnalysisConfig) -> Vec<Tec> {
    let mut selected: Vec<Tec> = tecs
        .into_iter()
        .filter(|t| t.pattern.len() >= config.min_pattern_size)
        .filter(|t| t.translators.len() >= config.min_translators)
        .collect();

    selected.sort_by(|a, b| {
        b.pattern
            .len()
            .cmp(&a.pattern.len())
            .then(b.translators.len().cmp(&a.translators.len()))
            .then_with(|| a.cmp(b))
    });
    selected
}

pub fn render_text(tecs: &[Tec]) -> String {
    if tecs.is_empty() {
        return "No repeated patterns found.\n".to_string();
    }

    let mut out = String::new();
    for (i, tec) in tecs.iter().enumerate() {
        out.push_str(&format!(
            "TEC #{} ({} points, {} translators, compression {:.2}):\n{}\n\n",
            i + 1,
            tec.pattern.len(),
            tec.translators.len(),
            tec.compression_ratio(),
            tec
        ));
    }
    out
}

pub fn render_json(tecs: &[Tec]) -> Result<String, OstinatoError> {
    Ok(serde_json::to_string_pretty(tecs)?)
}
