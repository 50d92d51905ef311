use std::path::Path;

use clipforge_models::video::{CodecTag, VideoInfo};
use serde::Deserialize;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Invokes `ffprobe`, parses its JSON, and tolerates absent fields with
/// zeros rather than failing outright.
pub async fn probe_video(path: &Path) -> MediaResult<VideoInfo> {
    let ffprobe = which::which("ffprobe").map_err(|_| MediaError::FfprobeUnavailable)?;

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::ProbeParseError(
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ));
    }

    let parsed: ProbeOutput = serde_json::from_slice(&output.stdout)
        .map_err(|e| MediaError::ProbeParseError(e.to_string()))?;

    Ok(parsed.into_video_info())
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: ProbeFormat,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    codec_name: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    r_frame_rate: Option<String>,
}

impl ProbeOutput {
    fn into_video_info(self) -> VideoInfo {
        let video_stream = self
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"));
        let has_audio = self
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some("audio"));

        let width = video_stream.and_then(|s| s.width).unwrap_or(0);
        let height = video_stream.and_then(|s| s.height).unwrap_or(0);
        let fps = video_stream
            .and_then(|s| s.r_frame_rate.as_deref())
            .and_then(parse_frame_rate)
            .unwrap_or(0.0);
        let codec = video_stream
            .and_then(|s| s.codec_name.as_deref())
            .map(CodecTag::from)
            .unwrap_or(CodecTag::Unknown);

        let duration_s = self
            .format
            .duration
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);
        let bitrate_bps = self
            .format
            .bit_rate
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        VideoInfo {
            width,
            height,
            fps,
            duration_s,
            bitrate_bps,
            has_audio,
            codec,
        }
    }
}

/// Parses FFmpeg's rational frame-rate notation (`num/den`).
fn parse_frame_rate(raw: &str) -> Option<f64> {
    let mut parts = raw.split('/');
    let num: f64 = parts.next()?.parse().ok()?;
    let den: f64 = parts.next()?.parse().ok()?;
    if den == 0.0 {
        None
    } else {
        Some(num / den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rational_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("30000/1001"), Some(30000.0 / 1001.0));
        assert_eq!(parse_frame_rate("30/0"), None);
        assert_eq!(parse_frame_rate("garbage"), None);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let output = ProbeOutput {
            streams: vec![],
            format: ProbeFormat::default(),
        };
        let info = output.into_video_info();
        assert_eq!(info.width, 0);
        assert_eq!(info.duration_s, 0.0);
        assert!(!info.has_audio);
    }
}
