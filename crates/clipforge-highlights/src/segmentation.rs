//! Phase 1 — segmentation: splits a source video's duration into
//! analysis windows, grounded on
//! `deepseek_analyzer.py::_create_analysis_segments`.

use crate::config::AnalyzerConfig;

/// Safety cap on segment count even under `force_full_coverage`.
const SAFETY_CAP_SEGMENTS: usize = 300;

#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

/// Builds the analysis segment list for a video of `duration_s`.
///
/// - Under `force_full_coverage`, emits contiguous segments up to the
///   300-segment safety cap, distributing evenly if that cap would be
///   exceeded.
/// - Otherwise, contiguous segments if the video fits within
///   `segment_duration * max_segments`, else exactly `max_segments`
///   windows distributed evenly across the full duration.
pub fn build_segments(duration_s: f64, config: &AnalyzerConfig) -> Vec<Segment> {
    if duration_s <= 0.0 {
        return Vec::new();
    }

    if config.force_full_coverage {
        let safe_max = config.max_segments.min(SAFETY_CAP_SEGMENTS);
        let estimated = ((duration_s + config.segment_duration_s - 1.0) / config.segment_duration_s).ceil() as usize;
        return if estimated > safe_max {
            distribute(duration_s, safe_max, config.segment_duration_s)
        } else {
            contiguous(duration_s, estimated, config.segment_duration_s)
        };
    }

    if duration_s <= config.segment_duration_s * config.max_segments as f64 {
        contiguous(duration_s, config.max_segments, config.segment_duration_s)
    } else {
        distribute(duration_s, config.max_segments, config.segment_duration_s)
    }
}

fn contiguous(duration_s: f64, max_count: usize, window: f64) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = 0.0;
    while current < duration_s && segments.len() < max_count {
        let end = (current + window).min(duration_s);
        segments.push(Segment { index: segments.len(), start: current, end });
        current += window;
    }
    segments
}

fn distribute(duration_s: f64, slots: usize, window: f64) -> Vec<Segment> {
    if slots == 0 {
        return Vec::new();
    }
    let step = duration_s / slots as f64;
    let mut segments = Vec::new();
    for i in 0..slots {
        let start = (i as f64 * step).max(0.0);
        let end = (start + window).min(duration_s);
        if end - start < 0.01 {
            continue;
        }
        segments.push(Segment { index: segments.len(), start, end });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_video_yields_contiguous_segments() {
        let config = AnalyzerConfig { segment_duration_s: 30.0, max_segments: 20, ..Default::default() };
        let segments = build_segments(90.0, &config);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[2].end, 90.0);
    }

    #[test]
    fn long_video_distributes_across_full_duration() {
        let config = AnalyzerConfig { segment_duration_s: 30.0, max_segments: 10, ..Default::default() };
        let segments = build_segments(7200.0, &config);
        assert_eq!(segments.len(), 10);
        assert!(segments.last().unwrap().end > 3600.0);
    }

    #[test]
    fn force_full_coverage_respects_safety_cap() {
        let config = AnalyzerConfig {
            segment_duration_s: 1.0,
            max_segments: 10_000,
            force_full_coverage: true,
            ..Default::default()
        };
        let segments = build_segments(100_000.0, &config);
        assert!(segments.len() <= SAFETY_CAP_SEGMENTS);
    }

    #[test]
    fn zero_duration_yields_no_segments() {
        assert!(build_segments(0.0, &AnalyzerConfig::default()).is_empty());
    }
}
