//! Phase 4 — multi-factor scoring: per-candidate viral content, speech
//! clarity, conversation flow, keyword density, and duration-variant
//! generation, grounded on `deepseek_analyzer.py`'s
//! `_analyze_viral_content` / `_analyze_speech_clarity` /
//! `_analyze_conversation_flow` / `_compute_candidate_duration`.

use std::collections::HashSet;

use clipforge_models::HighlightCandidate;

use crate::config::AnalyzerConfig;
use crate::patterns::{ANTI_VIRAL_PATTERNS, CONVERSATION_FLOW_PATTERNS, SUGGESTED_DURATION, VIRAL_CONTENT_FAMILIES};
use crate::util::{round_key, stable_hash};

/// A highlight mapped back to absolute video time, ready for Phase 4
/// scoring. Produced either by the remote reasoning client or (in
/// tests) constructed directly.
#[derive(Debug, Clone)]
pub struct MappedHighlight {
    pub start: f64,
    pub end: f64,
    pub score: f64,
    pub reason: String,
    pub transcription: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ViralContentScore {
    pub score: f64,
    pub confidence: f64,
}

/// Weighted-average viral-content score across pattern families, with a
/// per-family diversity bonus and an anti-viral penalty.
pub fn analyze_viral_content(text: &str) -> ViralContentScore {
    if text.trim().is_empty() {
        return ViralContentScore { score: 0.0, confidence: 0.0 };
    }
    let lower = text.to_lowercase();

    let mut weighted_score = 0.0;
    let mut total_weight = 0.0;
    let mut total_matches = 0.0;

    for family in VIRAL_CONTENT_FAMILIES.iter() {
        let mut category_score = 0.0;
        let mut matched_patterns = 0usize;
        for pattern in &family.patterns {
            let count = pattern.find_iter(&lower).count();
            if count > 0 {
                category_score += count as f64;
                matched_patterns += 1;
            }
        }
        if matched_patterns > 0 {
            let diversity = matched_patterns as f64 / family.patterns.len() as f64;
            category_score = (category_score * (1.0 + diversity)).min(5.0);
        }
        weighted_score += category_score * family.weight;
        total_weight += family.weight;
        total_matches += category_score;
    }

    let base = if total_weight > 0.0 { weighted_score / total_weight } else { 0.0 };
    let penalty: f64 = ANTI_VIRAL_PATTERNS.iter().map(|p| p.find_iter(&lower).count() as f64 * 0.3).sum();

    ViralContentScore {
        score: (base - penalty).max(0.0),
        confidence: (total_matches / 3.0).min(1.0),
    }
}

/// Words-per-second falling in `[2.0, 4.0]` scores 1.0, tapering
/// linearly outside; boosted up to 20% by vocabulary diversity.
pub fn speech_clarity(transcription: &str, duration_s: f64) -> f64 {
    if transcription.trim().is_empty() || duration_s <= 0.0 {
        return 0.0;
    }
    let word_count = transcription.split_whitespace().count();
    if word_count == 0 {
        return 0.0;
    }

    let wps = word_count as f64 / duration_s;
    let (lo, hi) = (2.0, 4.0);
    let clarity = if wps >= lo && wps <= hi {
        1.0
    } else if wps < lo {
        wps / lo
    } else {
        hi / wps
    }
    .clamp(0.0, 1.0);

    let unique: HashSet<String> = transcription.split_whitespace().map(|w| w.to_lowercase()).collect();
    let diversity = unique.len() as f64 / word_count as f64;
    (clarity * (1.0 + diversity * 0.2)).min(1.0)
}

/// Connector/causal/sequence/attention-grabber density, scaled and
/// capped at 1.0.
pub fn conversation_flow(transcription: &str) -> f64 {
    if transcription.trim().is_empty() {
        return 0.0;
    }
    let lower = transcription.to_lowercase();
    let matches: usize = CONVERSATION_FLOW_PATTERNS.iter().map(|p| p.find_iter(&lower).count()).sum();
    let words = transcription.split_whitespace().count();
    if words == 0 {
        return 0.0;
    }
    ((matches as f64 / words as f64) * 20.0).min(1.0)
}

pub fn keyword_density(transcription: &str, duration_s: f64) -> f64 {
    if duration_s <= 0.0 {
        return 0.0;
    }
    transcription.split_whitespace().count() as f64 / duration_s
}

/// 1.0 inside `[optimal_min, optimal_max]`, tapering linearly outside.
pub fn duration_optimality(duration_s: f64, config: &AnalyzerConfig) -> f64 {
    let (lo, hi) = (config.optimal_duration_min, config.optimal_duration_max);
    if duration_s >= lo && duration_s <= hi {
        1.0
    } else if duration_s < lo {
        duration_s / lo
    } else {
        hi / duration_s
    }
}

/// `(hash(start, end) % 11 - 5) / 100`: a deterministic ±5% jitter so
/// candidates sharing a target duration don't all come out identical.
fn duration_jitter_pct(start: f64, end: f64) -> f64 {
    let h = stable_hash(&[round_key(start, 3), round_key(end, 3)]);
    ((h % 11) as i64 - 5) as f64 / 100.0
}

/// `(hash(start, target, factor) % 9 - 4) / 100`: a smaller ±4% jitter
/// applied per duration variant.
fn variant_offset_pct(start: f64, target: f64, factor: f64) -> f64 {
    let h = stable_hash(&[round_key(start, 2), round_key(target, 2), (factor * 100.0).round() as i64]);
    ((h % 9) as i64 - 4) as f64 / 100.0
}

/// Duration assignment: prefer a duration
/// suggested in `reason`, else normalize words/sec toward 3.0, else keep
/// the candidate's own span, else fall back to the optimal-range
/// midpoint. Jittered and clamped to the absolute bounds.
pub fn compute_candidate_duration(reason: &str, transcription: &str, start: f64, end: f64, config: &AnalyzerConfig) -> f64 {
    let (min_opt, max_opt) = (config.optimal_duration_min, config.optimal_duration_max);

    let suggested = SUGGESTED_DURATION.captures(reason).and_then(|c| c.get(1)).and_then(|m| m.as_str().parse::<f64>().ok());

    let word_count = transcription.split_whitespace().count();
    let existing_duration = if end > start { Some(end - start) } else { None };
    let words_per_second = existing_duration.filter(|d| *d > 0.0).map(|d| word_count as f64 / d);

    let mut target = if let Some(suggested) = suggested {
        suggested
    } else if let Some(wps) = words_per_second.filter(|w| *w > 0.0) {
        let _ = wps;
        let optimal_wps = 3.0;
        (word_count as f64 / optimal_wps).clamp(min_opt, max_opt)
    } else if let Some(d) = existing_duration {
        d
    } else {
        (min_opt + max_opt) / 2.0
    };

    target *= 1.0 + duration_jitter_pct(start, end);
    target.clamp(config.absolute_min_duration, config.absolute_max_duration)
}

const VARIANT_FACTORS: [f64; 3] = [1.25, 0.85, 1.0];

/// Builds the full candidate pool: one primary candidate per mapped
/// highlight plus three duration variants recentered on it, each with
/// the same text-derived factors but an independently jittered span.
pub fn build_candidates(mapped: &[MappedHighlight], config: &AnalyzerConfig) -> Vec<HighlightCandidate> {
    let mut candidates = Vec::with_capacity(mapped.len() * 4);

    for highlight in mapped {
        let duration = (highlight.end - highlight.start).max(0.01);
        let viral = analyze_viral_content(&highlight.transcription);
        let clarity = speech_clarity(&highlight.transcription, duration);
        let flow = conversation_flow(&highlight.transcription);
        let density = keyword_density(&highlight.transcription, duration);

        candidates.push(HighlightCandidate {
            start: highlight.start,
            end: highlight.end,
            base_score: highlight.score,
            emotional_intensity: viral.score,
            speech_clarity: clarity,
            keyword_density: density,
            conversation_flow: flow,
            confidence: viral.confidence,
            transcription: highlight.transcription.clone(),
            reason: highlight.reason.clone(),
            suggested_duration: None,
        });

        let base_target = compute_candidate_duration(&highlight.reason, &highlight.transcription, highlight.start, highlight.end, config);

        for &factor in &VARIANT_FACTORS {
            let mut target = (base_target * factor).clamp(config.absolute_min_duration, config.absolute_max_duration);
            let offset = variant_offset_pct(highlight.start, target, factor);
            target = (target * (1.0 + offset)).clamp(config.absolute_min_duration, config.absolute_max_duration);

            let center = (highlight.start + highlight.end) / 2.0;
            let s = (center - target / 2.0).max(0.0);
            let e = s + target;
            if e - s < config.absolute_min_duration {
                continue;
            }

            let base_score = highlight.score * if factor == 1.0 { 0.98 } else { 0.95 };
            candidates.push(HighlightCandidate {
                start: s,
                end: e,
                base_score,
                emotional_intensity: viral.score,
                speech_clarity: clarity,
                keyword_density: density,
                conversation_flow: flow,
                confidence: viral.confidence,
                transcription: highlight.transcription.clone(),
                reason: format!("{} (variant)", highlight.reason),
                suggested_duration: Some(target),
            });
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viral_content_scores_zero_for_flat_text() {
        let result = analyze_viral_content("esto es un texto normal y t\u{ed}pico sin nada especial");
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn viral_content_rewards_intense_language() {
        let result = analyze_viral_content("no puedo creer esto, es incre\u{ed}ble!! wow");
        assert!(result.score > 0.0);
        assert!(result.confidence > 0.0);
    }

    #[test]
    fn speech_clarity_peaks_in_optimal_band() {
        let clarity = speech_clarity("uno dos tres cuatro cinco seis", 2.0);
        assert!(clarity > 0.9);
        let too_fast = speech_clarity("uno dos tres cuatro cinco seis siete ocho nueve diez", 1.0);
        assert!(too_fast < clarity);
    }

    #[test]
    fn duration_optimality_tapers_outside_range() {
        let config = AnalyzerConfig { optimal_duration_min: 15.0, optimal_duration_max: 45.0, ..Default::default() };
        assert_eq!(duration_optimality(30.0, &config), 1.0);
        assert!(duration_optimality(5.0, &config) < 1.0);
        assert!(duration_optimality(90.0, &config) < 1.0);
    }

    #[test]
    fn build_candidates_emits_primary_plus_variants() {
        let config = AnalyzerConfig::default();
        let mapped = vec![MappedHighlight {
            start: 10.0,
            end: 30.0,
            score: 0.8,
            reason: "gran revelaci\u{f3}n".into(),
            transcription: "no puedo creer esto, es incre\u{ed}ble!!".into(),
        }];
        let candidates = build_candidates(&mapped, &config);
        assert!(candidates.len() >= 2);
        assert_eq!(candidates[0].start, 10.0);
        for c in &candidates {
            assert!(c.duration() >= config.absolute_min_duration - 1e-6);
        }
    }
}
