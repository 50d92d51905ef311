use serde::{Deserialize, Serialize};

use crate::quality::{Platform, Quality};

/// A user's ask for one video transformation. Immutable once constructed;
/// discarded by the Job Manager after a fingerprint is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRequest {
    pub video_url: String,
    pub quality: Quality,
    pub platform: Platform,
    #[serde(default)]
    pub options: TransformOptions,
}

/// Explicit, boundary-clamped processing options. Every optional numeric
/// field is clamped to a plausible range as it is read in rather than
/// trusted from the caller; boolean flags default to their conservative
/// (disabled) value rather than being modeled as three-valued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    pub split: bool,
    pub add_subtitles: bool,
    pub subtitle_language: Option<String>,
    pub target_fps: Option<u32>,
    pub custom_bitrate_kbps: Option<u32>,
    pub audio_enhancement: bool,
    pub denoise: bool,
    pub sharpen: Option<f64>,
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
    pub saturation: Option<f64>,
    pub gamma: Option<f64>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            split: false,
            add_subtitles: false,
            subtitle_language: None,
            target_fps: None,
            custom_bitrate_kbps: None,
            audio_enhancement: false,
            denoise: false,
            sharpen: None,
            brightness: None,
            contrast: None,
            saturation: None,
            gamma: None,
        }
    }
}

impl TransformOptions {
    /// True when any option forces the advanced conversion pipeline
    /// rather than the simple letterbox-scale-pad path.
    pub fn requires_advanced_pipeline(&self) -> bool {
        self.add_subtitles
            || self.split
            || self.denoise
            || self.sharpen.is_some()
            || self.brightness.is_some()
            || self.contrast.is_some()
            || self.saturation.is_some()
            || self.gamma.is_some()
    }

    /// Returns a copy with subtitles disabled, used by the FFmpeg fallback
    /// ladder's second rung.
    pub fn without_subtitles(&self) -> Self {
        let mut opts = self.clone();
        opts.add_subtitles = false;
        opts
    }

    /// Clamp sharpen strength into FFmpeg's `unsharp` effective range.
    pub fn clamped_sharpen(&self) -> Option<f64> {
        self.sharpen.map(|s| s.clamp(0.1, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_simple_pipeline() {
        let opts = TransformOptions::default();
        assert!(!opts.requires_advanced_pipeline());
    }

    #[test]
    fn split_forces_advanced_pipeline() {
        let opts = TransformOptions {
            split: true,
            ..Default::default()
        };
        assert!(opts.requires_advanced_pipeline());
    }

    #[test]
    fn without_subtitles_clears_only_that_flag() {
        let opts = TransformOptions {
            add_subtitles: true,
            split: true,
            ..Default::default()
        };
        let stripped = opts.without_subtitles();
        assert!(!stripped.add_subtitles);
        assert!(stripped.split);
    }
}
