use std::time::Duration;

/// Tuning knobs for the five-phase analyzer. Every
/// field has a conservative default and an environment override,
/// mirroring `clipforge_transcribe::TranscriptionConfig`.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub segment_duration_s: f64,
    pub max_segments: usize,
    pub force_full_coverage: bool,
    pub viral_score_threshold: f64,
    pub min_clip_separation_s: f64,
    pub optimal_duration_min: f64,
    pub optimal_duration_max: f64,
    pub absolute_min_duration: f64,
    pub absolute_max_duration: f64,
    pub max_clips_per_video: usize,
    pub language_hint: String,
    pub whisper_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            segment_duration_s: 30.0,
            max_segments: 20,
            force_full_coverage: false,
            viral_score_threshold: 0.65,
            min_clip_separation_s: 60.0,
            optimal_duration_min: 15.0,
            optimal_duration_max: 45.0,
            absolute_min_duration: 5.0,
            absolute_max_duration: 180.0,
            max_clips_per_video: 10,
            language_hint: "es".to_string(),
            whisper_timeout: Duration::from_secs(30),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            segment_duration_s: env_f64("ANALYSIS_SEGMENT_DURATION", d.segment_duration_s),
            max_segments: env_usize("MAX_ANALYSIS_SEGMENTS", d.max_segments),
            force_full_coverage: env_bool("FORCE_FULL_COVERAGE", d.force_full_coverage),
            viral_score_threshold: env_f64("VIRAL_SCORE_THRESHOLD", d.viral_score_threshold),
            min_clip_separation_s: env_f64("MIN_CLIP_SEPARATION_SECONDS", d.min_clip_separation_s),
            optimal_duration_min: env_f64("OPTIMAL_VIRAL_DURATION_MIN", d.optimal_duration_min),
            optimal_duration_max: env_f64("OPTIMAL_VIRAL_DURATION_MAX", d.optimal_duration_max),
            absolute_min_duration: env_f64("ABSOLUTE_MIN_CLIP_DURATION", d.absolute_min_duration),
            absolute_max_duration: env_f64("ABSOLUTE_MAX_CLIP_DURATION", d.absolute_max_duration),
            max_clips_per_video: env_usize("MAX_CLIPS_PER_VIDEO", d.max_clips_per_video),
            language_hint: std::env::var("TRANSCRIBE_LANGUAGE_HINT").unwrap_or(d.language_hint),
            whisper_timeout: Duration::from_secs(env_u64("WHISPER_TIMEOUT", d.whisper_timeout.as_secs())),
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_bounds() {
        let config = AnalyzerConfig::default();
        assert!(config.absolute_min_duration < config.optimal_duration_min);
        assert!(config.optimal_duration_max < config.absolute_max_duration);
    }
}
