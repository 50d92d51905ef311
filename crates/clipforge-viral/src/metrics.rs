//! Multi-factor virality scoring, grounded directly on the six
//! orthogonal factor computations and their weights.

use clipforge_models::viral::{Recommendation, ViralMetrics};

use crate::patterns::{
    CATCHY_PATTERNS, CONTROVERSY_PATTERNS, CONVERSATIONAL_INDICATORS, ENGAGEMENT_TRIGGERS,
    HIGH_INTENSITY_EMOTION, HOOK_PATTERNS, MEMORABILITY_INDICATORS, NARRATIVE_TENSION_PATTERNS,
    QUESTION_MARK, RELATABLE_PATTERNS, RETENTION_PATTERNS, SHARE_TRIGGERS, VALUE_PATTERNS,
};

/// One transcribed segment of a clip (time-aligned text window).
#[derive(Debug, Clone)]
pub struct ClipSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Secondary like/share/comment prediction and tier classification,
/// supplemented from the original analyzer's `_predict_engagement`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngagementPrediction {
    pub like_prediction: f64,
    pub share_prediction: f64,
    pub comment_prediction: f64,
    pub engagement_score: f64,
}

pub fn score_clip(text: &str, segments: &[ClipSegment], duration_s: f64) -> (ViralMetrics, Recommendation, EngagementPrediction) {
    let text_lower = text.to_lowercase();
    if text_lower.trim().is_empty() {
        return (ViralMetrics::default(), Recommendation::NotViral, EngagementPrediction::default());
    }

    let emotional_impact = calculate_emotional_impact(&text_lower, segments);
    let memorability = calculate_memorability(&text_lower);
    let shareability = calculate_shareability(&text_lower);
    let engagement_potential = calculate_engagement_potential(&text_lower);
    let hook_strength = calculate_hook_strength(segments);
    let retention_probability = calculate_retention_probability(&text_lower, segments, duration_s);

    let virality_coefficient = calculate_virality_coefficient(
        emotional_impact,
        memorability,
        shareability,
        engagement_potential,
        hook_strength,
        retention_probability,
    );

    let metrics = ViralMetrics {
        emotional_impact,
        memorability,
        shareability,
        engagement_potential,
        hook_strength,
        retention_probability,
        virality_coefficient,
    };

    let recommendation = Recommendation::from_coefficient(virality_coefficient);
    let prediction = predict_engagement(&metrics);

    (metrics, recommendation, prediction)
}

fn count_matches(patterns: &[regex::Regex], text: &str) -> usize {
    patterns.iter().map(|p| p.find_iter(text).count()).sum()
}

fn calculate_emotional_impact(text: &str, segments: &[ClipSegment]) -> f64 {
    let word_count = text.split_whitespace().count();
    let impact_matches = count_matches(&HIGH_INTENSITY_EMOTION, text);

    let mut score = if word_count > 0 {
        let density = impact_matches as f64 / word_count as f64;
        (density * 50.0).min(1.0)
    } else {
        0.0
    };

    if segments.len() > 1 {
        let variance = emotion_variance(segments);
        score = (score * (1.0 + variance)).min(1.0);
    }

    score
}

fn emotion_variance(segments: &[ClipSegment]) -> f64 {
    if segments.len() < 2 {
        return 0.0;
    }
    let emotion_patterns = [r"(?i)\b(love|hate|amazing|terrible)\b", r"!+", r"\?+", r"(?i)\b(wow|incredible|insane)\b"];
    let compiled: Vec<regex::Regex> = emotion_patterns.iter().map(|p| regex::Regex::new(p).unwrap()).collect();

    let scores: Vec<f64> = segments
        .iter()
        .map(|s| {
            let lower = s.text.to_lowercase();
            compiled.iter().map(|p| p.find_iter(&lower).count() as f64).sum()
        })
        .collect();

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / scores.len() as f64;
    (variance / 10.0).min(0.5)
}

fn calculate_memorability(text: &str) -> f64 {
    let mut score = 0.0;
    score += count_matches(&MEMORABILITY_INDICATORS, text) as f64 * 0.3;
    score += count_matches(&CATCHY_PATTERNS, text) as f64 * 0.4;

    let mut freq: std::collections::HashMap<&str, u32> = std::collections::HashMap::new();
    for word in text.split_whitespace().filter(|w| w.chars().count() > 4) {
        *freq.entry(word).or_insert(0) += 1;
    }
    let repeated_concepts = freq.values().filter(|&&c| c > 2).count();
    score += repeated_concepts as f64 * 0.2;

    score.min(1.0)
}

fn calculate_shareability(text: &str) -> f64 {
    let mut score = 0.0;
    score += count_matches(&SHARE_TRIGGERS, text) as f64 * 0.4;
    score += count_matches(&CONTROVERSY_PATTERNS, text) as f64 * 0.3;
    score += count_matches(&VALUE_PATTERNS, text) as f64 * 0.25;
    score += QUESTION_MARK.find_iter(text).count() as f64 * 0.15;
    score.min(1.0)
}

fn calculate_engagement_potential(text: &str) -> f64 {
    let mut score = 0.0;
    score += count_matches(&ENGAGEMENT_TRIGGERS, text) as f64 * 0.5;
    score += count_matches(&RELATABLE_PATTERNS, text) as f64 * 0.3;

    if has_conversational_structure(text) {
        score *= 1.3;
    }
    score.min(1.0)
}

fn has_conversational_structure(text: &str) -> bool {
    let count = CONVERSATIONAL_INDICATORS.iter().filter(|p| p.is_match(text)).count();
    count >= 2
}

fn calculate_hook_strength(segments: &[ClipSegment]) -> f64 {
    if segments.is_empty() {
        return 0.0;
    }

    let mut hook_text = String::new();
    for segment in segments {
        if segment.start <= 5.0 {
            hook_text.push_str(&segment.text);
            hook_text.push(' ');
        } else {
            break;
        }
    }

    if hook_text.trim().is_empty() {
        return 0.0;
    }
    let hook_lower = hook_text.to_lowercase();

    let mut hook_score = 0.0;
    for pattern in HOOK_PATTERNS.iter() {
        if pattern.is_match(&hook_lower) {
            hook_score += 1.0;
        }
    }

    hook_score += crate::patterns::CURIOSITY_BOOSTERS
        .iter()
        .map(|p| p.find_iter(&hook_lower).count() as f64 * 0.5)
        .sum::<f64>();

    (hook_score / 3.0).min(1.0)
}

fn calculate_retention_probability(text: &str, segments: &[ClipSegment], duration_s: f64) -> f64 {
    let mut score = 0.5;

    if (15.0..=45.0).contains(&duration_s) {
        score += 0.3;
    } else if duration_s > 60.0 {
        score -= 0.2;
    }

    if !segments.is_empty() {
        let segment_scores: Vec<usize> = segments
            .iter()
            .map(|s| {
                let lower = s.text.to_lowercase();
                count_matches(&RETENTION_PATTERNS, &lower)
            })
            .collect();
        let non_zero = segment_scores.iter().filter(|&&s| s > 0).count();
        score += (non_zero as f64 / segments.len() as f64) * 0.3;
    }

    score += narrative_tension(text) * 0.2;

    score.min(1.0)
}

fn narrative_tension(text: &str) -> f64 {
    let matches = count_matches(&NARRATIVE_TENSION_PATTERNS, text) as f64;
    let words = text.split_whitespace().count();
    if words == 0 {
        return 0.0;
    }
    (matches / words as f64 * 20.0).min(1.0)
}

fn calculate_virality_coefficient(
    emotional_impact: f64,
    memorability: f64,
    shareability: f64,
    engagement: f64,
    hook_strength: f64,
    retention: f64,
) -> f64 {
    let mut score = hook_strength * 0.25 + emotional_impact * 0.20 + shareability * 0.20 + engagement * 0.15 + memorability * 0.10 + retention * 0.10;

    if hook_strength > 0.7 && emotional_impact > 0.6 {
        score *= 1.3;
    }
    if shareability > 0.6 && engagement > 0.6 {
        score *= 1.2;
    }

    let critical = [hook_strength, emotional_impact, shareability];
    let low_critical_count = critical.iter().filter(|&&f| f < 0.3).count();
    if low_critical_count >= 2 {
        score *= 0.7;
    }

    score.min(1.0)
}

fn predict_engagement(metrics: &ViralMetrics) -> EngagementPrediction {
    let like_prediction = metrics.emotional_impact * 0.4 + metrics.hook_strength * 0.3 + metrics.memorability * 0.3;
    let share_prediction = metrics.shareability * 0.5 + metrics.engagement_potential * 0.3 + metrics.memorability * 0.2;
    let comment_prediction = metrics.engagement_potential * 0.6 + metrics.shareability * 0.4;
    let engagement_score = (like_prediction + share_prediction + comment_prediction) / 3.0;

    EngagementPrediction {
        like_prediction,
        share_prediction,
        comment_prediction,
        engagement_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs() -> Vec<ClipSegment> {
        vec![
            ClipSegment { text: "espera, no vas a creer esto!!".into(), start: 0.0, end: 4.0 },
            ClipSegment { text: "pero luego resulta que todo cambió".into(), start: 4.0, end: 10.0 },
            ClipSegment { text: "comparte con tus amigos si te gustó".into(), start: 10.0, end: 20.0 },
        ]
    }

    #[test]
    fn empty_transcript_scores_zero() {
        let (metrics, rec, _) = score_clip("", &[], 20.0);
        assert_eq!(metrics.virality_coefficient, 0.0);
        assert_eq!(rec, Recommendation::NotViral);
    }

    #[test]
    fn hook_heavy_clip_scores_above_zero() {
        let segments = segs();
        let text: String = segments.iter().map(|s| s.text.clone()).collect::<Vec<_>>().join(" ");
        let (metrics, _, _) = score_clip(&text, &segments, 25.0);
        assert!(metrics.hook_strength > 0.0);
        assert!(metrics.virality_coefficient > 0.0);
        assert!(metrics.virality_coefficient <= 1.0);
    }

    #[test]
    fn retention_prefers_optimal_duration_band() {
        let segments = segs();
        let text: String = segments.iter().map(|s| s.text.clone()).collect::<Vec<_>>().join(" ");
        let (short_metrics, _, _) = score_clip(&text, &segments, 30.0);
        let (long_metrics, _, _) = score_clip(&text, &segments, 120.0);
        assert!(short_metrics.retention_probability >= long_metrics.retention_probability);
    }
}
