//! Segment energy curve and optimal cut-point extraction, grounded on
//! `viral_analyzer.py::_analyze_temporal_structure` /
//! `_calculate_segment_energy` / `_identify_optimal_cuts`.

use once_cell::sync::Lazy;
use regex::Regex;

use clipforge_models::viral::{CutPoint, CutPointKind};

use crate::metrics::ClipSegment;

struct EnergyIndicator {
    pattern: Regex,
    weight: f64,
}

static ENERGY_INDICATORS: Lazy<Vec<EnergyIndicator>> = Lazy::new(|| {
    vec![
        EnergyIndicator { pattern: Regex::new(r"!+").unwrap(), weight: 0.3 },
        EnergyIndicator { pattern: Regex::new(r"\?+").unwrap(), weight: 0.2 },
        EnergyIndicator { pattern: Regex::new(r"(?i)\b(wow|incre[ií]ble|amazing|brutal)\b").unwrap(), weight: 0.4 },
        EnergyIndicator { pattern: Regex::new(r"(?i)\b(r[aá]pido|fast|urgente|urgent)\b").unwrap(), weight: 0.3 },
        EnergyIndicator { pattern: Regex::new(r"\b[A-Z]{2,}\b").unwrap(), weight: 0.2 },
    ]
});

const PEAK_MOMENT_THRESHOLD: f64 = 0.6;
const PEAK_CUT_THRESHOLD: f64 = 0.5;
const VALLEY_RISE_THRESHOLD: f64 = 0.4;
const MAX_CUT_POINTS: usize = 10;

#[derive(Debug, Clone, Copy)]
struct EnergySample {
    time_s: f64,
    energy: f64,
}

/// Energy of one segment's text: a weighted density of exclamation,
/// question, intensity-word, and all-caps indicators, softened by
/// `sqrt(word_count)` rather than plain word count.
fn segment_energy(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let mut energy = 0.0;
    for indicator in ENERGY_INDICATORS.iter() {
        energy += indicator.pattern.find_iter(text).count() as f64 * indicator.weight;
    }
    let words = text.split_whitespace().count();
    if words > 0 {
        energy /= (words as f64).sqrt();
    }
    energy.min(1.0)
}

/// One high-energy segment surfaced for human review, independent of
/// the cut-point list.
#[derive(Debug, Clone)]
pub struct PeakMoment {
    pub start: f64,
    pub end: f64,
    pub energy: f64,
}

/// Builds the energy curve for the segment list and returns both the
/// sorted peak moments and the top `MAX_CUT_POINTS` cut points.
pub fn analyze_temporal_structure(segments: &[ClipSegment]) -> (Vec<PeakMoment>, Vec<CutPoint>) {
    if segments.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let curve: Vec<EnergySample> = segments
        .iter()
        .map(|s| EnergySample { time_s: s.start, energy: segment_energy(&s.text.to_lowercase()) })
        .collect();

    let mut peaks: Vec<PeakMoment> = segments
        .iter()
        .zip(curve.iter())
        .filter(|(_, sample)| sample.energy > PEAK_MOMENT_THRESHOLD)
        .map(|(segment, sample)| PeakMoment { start: segment.start, end: segment.end, energy: sample.energy })
        .collect();
    peaks.sort_by(|a, b| b.energy.partial_cmp(&a.energy).unwrap());

    let cuts = identify_optimal_cuts(&curve);
    (peaks, cuts)
}

fn identify_optimal_cuts(curve: &[EnergySample]) -> Vec<CutPoint> {
    if curve.len() < 3 {
        return Vec::new();
    }

    let mut cuts = Vec::new();
    for i in 1..curve.len() - 1 {
        let prev = curve[i - 1].energy;
        let curr = curve[i].energy;
        let next = curve[i + 1].energy;

        if curr > prev && curr > next && curr > PEAK_CUT_THRESHOLD {
            cuts.push(CutPoint { time_s: curve[i].time_s, kind: CutPointKind::PeakEnd, confidence: curr });
        } else if curr < prev && curr < next && next > VALLEY_RISE_THRESHOLD {
            cuts.push(CutPoint { time_s: curve[i].time_s, kind: CutPointKind::ValleyStart, confidence: next });
        }
    }

    cuts.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap());
    cuts.truncate(MAX_CUT_POINTS);
    cuts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, start: f64, end: f64) -> ClipSegment {
        ClipSegment { text: text.into(), start, end }
    }

    #[test]
    fn empty_segments_produce_no_cuts() {
        let (peaks, cuts) = analyze_temporal_structure(&[]);
        assert!(peaks.is_empty());
        assert!(cuts.is_empty());
    }

    #[test]
    fn local_peak_yields_peak_end_cut() {
        let segments = vec![
            seg("tranquilo y normal", 0.0, 2.0),
            seg("WOW increíble brutal!!!", 2.0, 4.0),
            seg("tranquilo de nuevo", 4.0, 6.0),
        ];
        let (_, cuts) = analyze_temporal_structure(&segments);
        assert!(cuts.iter().any(|c| c.kind == CutPointKind::PeakEnd));
    }

    #[test]
    fn cut_points_are_capped_and_sorted_by_confidence() {
        let segments: Vec<ClipSegment> = (0..30)
            .map(|i| {
                let text = if i % 2 == 0 { "wow increíble!!! urgente RAPIDO" } else { "ok" };
                seg(text, i as f64 * 2.0, i as f64 * 2.0 + 2.0)
            })
            .collect();
        let (_, cuts) = analyze_temporal_structure(&segments);
        assert!(cuts.len() <= MAX_CUT_POINTS);
        for pair in cuts.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }
}
