use serde::{Deserialize, Serialize};

/// Per-clip grading vector produced by the Viral Scorer from six
/// orthogonal factors. Immutable once computed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ViralMetrics {
    pub emotional_impact: f64,
    pub memorability: f64,
    pub shareability: f64,
    pub engagement_potential: f64,
    pub hook_strength: f64,
    pub retention_probability: f64,
    pub virality_coefficient: f64,
}

/// Human-facing publish recommendation tier, mapped from the virality
/// coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    ViralGuaranteed,
    HighPotential,
    ModeratePotential,
    LowPotential,
    NotViral,
}

impl Recommendation {
    pub fn from_coefficient(virality: f64) -> Self {
        if virality >= 0.8 {
            Recommendation::ViralGuaranteed
        } else if virality >= 0.65 {
            Recommendation::HighPotential
        } else if virality >= 0.45 {
            Recommendation::ModeratePotential
        } else if virality >= 0.25 {
            Recommendation::LowPotential
        } else {
            Recommendation::NotViral
        }
    }
}

/// One candidate cut point derived from the segment energy curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CutPoint {
    pub time_s: f64,
    pub kind: CutPointKind,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutPointKind {
    PeakEnd,
    ValleyStart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_tiers_match_thresholds() {
        assert_eq!(Recommendation::from_coefficient(0.9), Recommendation::ViralGuaranteed);
        assert_eq!(Recommendation::from_coefficient(0.7), Recommendation::HighPotential);
        assert_eq!(Recommendation::from_coefficient(0.5), Recommendation::ModeratePotential);
        assert_eq!(Recommendation::from_coefficient(0.3), Recommendation::LowPotential);
        assert_eq!(Recommendation::from_coefficient(0.1), Recommendation::NotViral);
    }
}
