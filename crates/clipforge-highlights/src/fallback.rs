//! No-remote-endpoint fallback: a deterministic distributed-clip split
//! used when no reasoning client is configured, or when transcription
//! and remote reasoning both fail to produce usable highlights, grounded
//! on `deepseek_analyzer.py::_fallback_analysis` / `_compute_backup_segment_duration`.

use clipforge_models::{Highlight, HighlightMetadata};

use crate::config::AnalyzerConfig;
use crate::util::deterministic_jitter;

const CLIPS_PER_HOUR: f64 = 4.0;

fn backup_segment_duration(position: f64, index: usize, total: usize, min_d: f64, max_d: f64, config: &AnalyzerConfig) -> f64 {
    let center_distance = (0.5 - position).abs();
    let center_influence = (1.0 - 2.0 * center_distance).clamp(0.0, 1.0);
    let base_duration = min_d + (max_d - min_d) * (0.2 + 0.8 * center_influence);

    let edge_factor = if index == 0 || index + 1 == total {
        0.65
    } else if index == 1 || index + 2 == total {
        0.85
    } else {
        1.0
    };

    let mut duration = base_duration * edge_factor;
    let jitter = (deterministic_jitter(index) - 0.5) * 0.15 * duration;
    duration += jitter;

    duration.clamp(config.absolute_min_duration.max(min_d), config.absolute_max_duration.min(max_d))
}

/// Builds a deterministic clip list with no transcription or reasoning
/// input at all: a single full-video clip if it already fits the
/// absolute duration bounds, else a distributed set favoring longer
/// clips nearer the video's center.
pub fn fallback_clips(duration_s: f64, config: &AnalyzerConfig) -> Vec<Highlight> {
    if duration_s < config.absolute_min_duration {
        return Vec::new();
    }

    if duration_s <= config.absolute_max_duration {
        return vec![Highlight {
            start: 0.0,
            end: duration_s,
            final_score: 0.6,
            reason: "Full video retained — below the maximum clip duration".to_string(),
            transcription: String::new(),
            metadata: HighlightMetadata::default(),
        }];
    }

    let total_clips = config.max_clips_per_video.min(((duration_s / 3600.0) * CLIPS_PER_HOUR).floor().max(2.0) as usize);
    let mut clips = Vec::with_capacity(total_clips);

    for i in 0..total_clips {
        let position = (i as f64 + 0.5) / total_clips as f64;
        let segment_duration = backup_segment_duration(position, i, total_clips, config.optimal_duration_min, config.optimal_duration_max, config);

        let center = position * duration_s;
        let mut start = (center - segment_duration / 2.0).max(0.0);
        let mut end = (start + segment_duration).min(duration_s);
        start = (end - segment_duration).max(0.0);
        if end < start {
            end = start;
        }
        if end - start < config.absolute_min_duration {
            continue;
        }

        clips.push(Highlight {
            start,
            end,
            final_score: 0.5 + i as f64 * 0.05,
            reason: format!("Distributed segment {} — automatic fallback selection", i + 1),
            transcription: String::new(),
            metadata: HighlightMetadata::default(),
        });
    }

    clips
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_video_yields_single_full_clip() {
        let config = AnalyzerConfig::default();
        let clips = fallback_clips(60.0, &config);
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].start, 0.0);
        assert_eq!(clips[0].end, 60.0);
    }

    #[test]
    fn long_video_distributes_multiple_clips() {
        let config = AnalyzerConfig::default();
        let clips = fallback_clips(7200.0, &config);
        assert!(clips.len() >= 2);
        for clip in &clips {
            assert!(clip.duration() >= config.absolute_min_duration - 1e-6);
            assert!(clip.end <= 7200.0 + 1e-6);
        }
    }

    #[test]
    fn too_short_video_yields_nothing() {
        let config = AnalyzerConfig::default();
        assert!(fallback_clips(1.0, &config).is_empty());
    }
}
