//! Standalone virality grader: grades already-transcribed clips
//! on six orthogonal axes and surfaces candidate cut points from a
//! segment energy curve. Independent of the Highlight Analyzer — this
//! is a second-pass/secondary-service grader applied after clip creation.

pub mod cut_points;
pub mod error;
pub mod metrics;
pub mod patterns;

use clipforge_models::viral::{CutPoint, Recommendation, ViralMetrics};

pub use cut_points::PeakMoment;
pub use error::{ViralError, ViralResult};
pub use metrics::{ClipSegment, EngagementPrediction};

/// Full grading result for one clip: the six-factor metrics vector, the
/// derived recommendation tier, the supplemented engagement prediction,
/// and the temporal cut-point analysis.
#[derive(Debug, Clone)]
pub struct ClipGrade {
    pub metrics: ViralMetrics,
    pub recommendation: Recommendation,
    pub engagement: EngagementPrediction,
    pub peak_moments: Vec<PeakMoment>,
    pub optimal_cut_points: Vec<CutPoint>,
}

/// Grades one clip from its full transcript text, its time-aligned
/// segments, and its duration. Returns `EmptyTranscript` rather than a
/// zeroed grade when the transcript carries no usable text, so callers
/// can distinguish "scored zero" from "nothing to score".
pub fn grade_clip(text: &str, segments: &[ClipSegment], duration_s: f64) -> ViralResult<ClipGrade> {
    if text.trim().is_empty() && segments.is_empty() {
        return Err(ViralError::EmptyTranscript);
    }

    let (metrics, recommendation, engagement) = metrics::score_clip(text, segments, duration_s);
    let (peak_moments, optimal_cut_points) = cut_points::analyze_temporal_structure(segments);

    Ok(ClipGrade {
        metrics,
        recommendation,
        engagement,
        peak_moments,
        optimal_cut_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transcript_is_rejected_rather_than_zero_scored() {
        let err = grade_clip("", &[], 20.0).unwrap_err();
        assert!(matches!(err, ViralError::EmptyTranscript));
    }

    #[test]
    fn grading_a_real_clip_returns_bounded_scores() {
        let segments = vec![
            ClipSegment { text: "espera, no vas a creer esto!!".into(), start: 0.0, end: 4.0 },
            ClipSegment { text: "pero luego resulta que todo cambió de repente".into(), start: 4.0, end: 10.0 },
            ClipSegment { text: "comparte con tus amigos si te gustó, qué piensas?".into(), start: 10.0, end: 20.0 },
        ];
        let text: String = segments.iter().map(|s| s.text.clone()).collect::<Vec<_>>().join(" ");
        let grade = grade_clip(&text, &segments, 20.0).unwrap();
        assert!(grade.metrics.virality_coefficient >= 0.0 && grade.metrics.virality_coefficient <= 1.0);
        assert!(grade.optimal_cut_points.len() <= 10);
    }
}
