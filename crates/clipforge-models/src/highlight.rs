use serde::{Deserialize, Serialize};

/// A potential clip produced during highlight analysis, before the
/// constrained selector has pruned it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightCandidate {
    pub start: f64,
    pub end: f64,
    pub base_score: f64,
    pub emotional_intensity: f64,
    pub speech_clarity: f64,
    pub keyword_density: f64,
    pub conversation_flow: f64,
    pub confidence: f64,
    pub transcription: String,
    pub reason: String,
    /// Duration the remote model suggested explicitly, if any (Phase 3).
    pub suggested_duration: Option<f64>,
}

impl HighlightCandidate {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// The combined multi-factor score from Phase 4: weighted sum of
    /// base/emotional/clarity/flow/duration-optimality, scaled by
    /// confidence and capped at 1.0.
    pub fn final_score(&self, duration_optimality: f64) -> f64 {
        let weighted = self.base_score * 0.35
            + self.emotional_intensity * 0.25
            + self.speech_clarity * 0.15
            + self.conversation_flow * 0.15
            + duration_optimality * 0.10;
        (weighted * (1.0 + 0.2 * self.confidence)).min(1.0)
    }
}

/// An accepted clip: the selector's output. Immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    pub start: f64,
    pub end: f64,
    pub final_score: f64,
    pub reason: String,
    pub transcription: String,
    pub metadata: HighlightMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighlightMetadata {
    pub emotional_intensity: f64,
    pub speech_clarity: f64,
    pub keyword_density: f64,
    pub conversation_flow: f64,
    pub confidence: f64,
}

impl Highlight {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Window validity: duration within the absolute bounds and the
    /// window lies within `[0, source_duration]`.
    pub fn is_valid_window(&self, min_duration: f64, max_duration: f64, source_duration: f64) -> bool {
        let d = self.duration();
        d >= min_duration
            && d <= max_duration
            && self.start >= 0.0
            && self.start < self.end
            && self.end <= source_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> HighlightCandidate {
        HighlightCandidate {
            start: 10.0,
            end: 25.0,
            base_score: 0.6,
            emotional_intensity: 0.5,
            speech_clarity: 0.7,
            keyword_density: 0.3,
            conversation_flow: 0.4,
            confidence: 0.8,
            transcription: "no vas a creer esto".into(),
            reason: "hook".into(),
            suggested_duration: None,
        }
    }

    #[test]
    fn final_score_is_capped_at_one() {
        let mut c = candidate();
        c.base_score = 1.0;
        c.emotional_intensity = 1.0;
        c.speech_clarity = 1.0;
        c.conversation_flow = 1.0;
        c.confidence = 1.0;
        assert!(c.final_score(1.0) <= 1.0);
    }

    #[test]
    fn window_validity_rejects_out_of_bounds() {
        let h = Highlight {
            start: 10.0,
            end: 25.0,
            final_score: 0.8,
            reason: "hook".into(),
            transcription: String::new(),
            metadata: HighlightMetadata::default(),
        };
        assert!(h.is_valid_window(5.0, 60.0, 100.0));
        assert!(!h.is_valid_window(20.0, 60.0, 100.0)); // too short
        assert!(!h.is_valid_window(5.0, 60.0, 20.0)); // exceeds source duration
    }
}
