//! Answers the "get FFmpeg capabilities" operation (spec §6):
//! `{ffmpeg_available, codecs{}, filters{}, capabilities{}, recommendations[]}`.
//! Probes the real `ffmpeg` binary's `-codecs`/`-filters` listings rather
//! than hardcoding a guess, so the report reflects whatever build of
//! FFmpeg is actually on `PATH`.

use std::collections::HashMap;
use std::process::Stdio;

use serde::Serialize;
use tokio::process::Command;

use crate::command::check_ffmpeg;

/// Codecs this pipeline depends on; checked against `ffmpeg -codecs`.
const REQUIRED_CODECS: &[&str] = &["libx264", "aac", "libmp3lame"];

/// Filters this pipeline's graphs depend on; checked against `ffmpeg -filters`.
const REQUIRED_FILTERS: &[&str] = &[
    "scale",
    "crop",
    "pad",
    "overlay",
    "gblur",
    "split",
    "vstack",
    "hqdn3d",
    "unsharp",
    "eq",
    "subtitles",
    "acompressor",
    "alimiter",
];

/// The FFmpeg-capabilities report handed back by the "get FFmpeg
/// capabilities" operation.
#[derive(Debug, Clone, Serialize)]
pub struct FfmpegCapabilities {
    pub ffmpeg_available: bool,
    pub codecs: HashMap<String, bool>,
    pub filters: HashMap<String, bool>,
    pub capabilities: HashMap<String, bool>,
    pub recommendations: Vec<String>,
}

/// Probes the local `ffmpeg` binary for the codecs and filters this
/// pipeline relies on, and derives a small set of human-readable
/// recommendations for anything missing.
pub async fn capabilities() -> FfmpegCapabilities {
    let Ok(ffmpeg) = check_ffmpeg() else {
        return unavailable_report();
    };

    let codec_listing = run_listing(&ffmpeg, "-codecs").await.unwrap_or_default();
    let filter_listing = run_listing(&ffmpeg, "-filters").await.unwrap_or_default();

    let codecs: HashMap<String, bool> = REQUIRED_CODECS.iter().map(|c| (c.to_string(), codec_listing.contains(c))).collect();
    let filters: HashMap<String, bool> = REQUIRED_FILTERS.iter().map(|f| (f.to_string(), filter_listing.contains(f))).collect();

    let mut recommendations = Vec::new();
    for (name, available) in codecs.iter() {
        if !available {
            recommendations.push(format!("ffmpeg build is missing the '{name}' codec; rebuild with it enabled"));
        }
    }
    for (name, available) in filters.iter() {
        if !available {
            recommendations.push(format!("ffmpeg build is missing the '{name}' filter; rebuild with it enabled"));
        }
    }
    recommendations.sort();

    let capabilities_flags = HashMap::from([
        ("vertical_optimized".to_string(), filters.values().all(|v| *v)),
        ("split_screen".to_string(), *filters.get("crop").unwrap_or(&false) && *filters.get("vstack").unwrap_or(&false)),
        ("subtitle_burn_in".to_string(), *filters.get("subtitles").unwrap_or(&false)),
        ("audio_enhancement".to_string(), *filters.get("acompressor").unwrap_or(&false) && *filters.get("alimiter").unwrap_or(&false)),
    ]);

    FfmpegCapabilities {
        ffmpeg_available: true,
        codecs,
        filters,
        capabilities: capabilities_flags,
        recommendations,
    }
}

async fn run_listing(ffmpeg: &std::path::Path, flag: &str) -> Option<String> {
    let output = Command::new(ffmpeg).arg("-hide_banner").arg(flag).stdin(Stdio::null()).stderr(Stdio::null()).output().await.ok()?;
    Some(String::from_utf8_lossy(&output.stdout).to_lowercase())
}

fn unavailable_report() -> FfmpegCapabilities {
    FfmpegCapabilities {
        ffmpeg_available: false,
        codecs: HashMap::new(),
        filters: HashMap::new(),
        capabilities: HashMap::new(),
        recommendations: vec!["install ffmpeg and ensure it is on PATH".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_report_carries_a_recommendation_and_no_codecs() {
        let report = unavailable_report();
        assert!(!report.ffmpeg_available);
        assert!(report.codecs.is_empty());
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn required_codec_and_filter_lists_are_non_empty() {
        assert!(!REQUIRED_CODECS.is_empty());
        assert!(!REQUIRED_FILTERS.is_empty());
    }
}
