use std::path::Path;
use std::time::Duration;

use clipforge_models::quality::{Quality, QualityProfile};
use clipforge_models::request::TransformOptions;

use crate::command::{FfmpegCommand, FfmpegRunner, ProgressCallback};
use crate::error::MediaResult;
use crate::filters::{build_split_graph, build_vertical_optimized_graph};

/// Single-pass scale-to-fit-then-pad conversion with no extra filters —
/// the fallback ladder's final rung and the default path when no
/// advanced option is set.
pub async fn convert_vertical_simple(
    input: &Path,
    output: &Path,
    quality: Quality,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> MediaResult<()> {
    let profile = quality.profile();
    let (w, h) = (profile.width, profile.height);

    let args = FfmpegCommand::new()
        .input(input)
        .arg("-vf")
        .arg(format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:black"
        ))
        .arg("-r")
        .arg("30")
        .arg("-c:v")
        .arg("libx264")
        .arg("-crf")
        .arg(profile.crf.to_string())
        .arg("-preset")
        .arg(profile.preset)
        .arg("-c:a")
        .arg("aac")
        .arg("-b:a")
        .arg(format!("{}k", profile.audio_bitrate_kbps))
        .arg("-ac")
        .arg("2")
        .arg("-movflags")
        .arg("+faststart")
        .output(output)
        .build_args();

    FfmpegRunner::new(timeout).run(args, output, on_progress).await
}

/// Full optimized pipeline: blurred background + Lanczos-scaled
/// foreground, optional denoise/sharpen/color filters, optional
/// subtitle burn-in, compressed-and-limited audio, x264 High@4.2 with an
/// explicit parameter set.
pub async fn convert_vertical_optimized(
    input: &Path,
    output: &Path,
    quality: Quality,
    opts: &TransformOptions,
    subtitle_path: Option<&str>,
    original_fps: f64,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> MediaResult<()> {
    let profile = quality.profile();
    let graph = build_vertical_optimized_graph(&profile, opts, subtitle_path);
    let target_fps = opts.target_fps.unwrap_or_else(|| original_fps.round().max(24.0) as u32);
    let gop = 2 * target_fps;

    let args = FfmpegCommand::new()
        .input(input)
        .arg("-filter_complex")
        .arg(graph.serialize())
        .arg("-map")
        .arg("[video_out]")
        .arg("-map")
        .arg("0:a?")
        .arg("-r")
        .arg(target_fps.to_string())
        .arg("-c:v")
        .arg("libx264")
        .arg("-profile:v")
        .arg("high")
        .arg("-level")
        .arg("4.2")
        .arg("-crf")
        .arg(profile.crf.to_string())
        .arg("-preset")
        .arg(profile.preset)
        .arg("-maxrate")
        .arg(format!("{}k", profile.maxrate_kbps))
        .arg("-bufsize")
        .arg(format!("{}k", profile.bufsize_kbps))
        .arg("-g")
        .arg(gop.to_string())
        .arg("-keyint_min")
        .arg(target_fps.to_string())
        .arg("-pix_fmt")
        .arg("yuv420p")
        .arg("-color_primaries")
        .arg("bt709")
        .arg("-color_trc")
        .arg("bt709")
        .arg("-colorspace")
        .arg("bt709")
        .arg("-af")
        .arg("acompressor,alimiter")
        .arg("-c:a")
        .arg("aac")
        .arg("-b:a")
        .arg(format!("{}k", profile.audio_bitrate_kbps))
        .arg("-ar")
        .arg("48000")
        .arg("-ac")
        .arg("2")
        .arg("-movflags")
        .arg("+faststart")
        .output(output)
        .build_args();

    FfmpegRunner::new(timeout).run(args, output, on_progress).await
}

/// Crops left and right halves, scales each to `W x H/2`, and stacks
/// them vertically, keeping the audio path identical to the optimized
/// pipeline.
pub async fn convert_split(
    input: &Path,
    output: &Path,
    quality: Quality,
    opts: &TransformOptions,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> MediaResult<()> {
    let profile = quality.profile();
    let graph = build_split_graph(&profile, opts);

    let args = FfmpegCommand::new()
        .input(input)
        .arg("-filter_complex")
        .arg(graph.serialize())
        .arg("-map")
        .arg("[video_out]")
        .arg("-map")
        .arg("0:a?")
        .arg("-c:v")
        .arg("libx264")
        .arg("-crf")
        .arg(profile.crf.to_string())
        .arg("-preset")
        .arg(profile.preset)
        .arg("-af")
        .arg("acompressor,alimiter")
        .arg("-c:a")
        .arg("aac")
        .arg("-b:a")
        .arg(format!("{}k", profile.audio_bitrate_kbps))
        .arg("-ar")
        .arg("48000")
        .arg("-ac")
        .arg("2")
        .arg("-movflags")
        .arg("+faststart")
        .output(output)
        .build_args();

    FfmpegRunner::new(timeout).run(args, output, on_progress).await
}

/// Stream-copies an m3u8 playlist to MP4 with an AAC bitstream fixup.
pub async fn convert_m3u8_to_mp4(url: &str, output: &Path, timeout: Duration, on_progress: Option<ProgressCallback>) -> MediaResult<()> {
    let args = FfmpegCommand::new()
        .input_url(url)
        .arg("-c:v")
        .arg("copy")
        .arg("-c:a")
        .arg("aac")
        .arg("-bsf:a")
        .arg("aac_adtstoasc")
        .arg("-movflags")
        .arg("+faststart")
        .output(output)
        .build_args();

    FfmpegRunner::new(timeout).run(args, output, on_progress).await
}

/// Rescales an m3u8 stream to 640x360 with preserve-aspect padding.
pub async fn convert_m3u8_to_mp4_360p(url: &str, output: &Path, timeout: Duration, on_progress: Option<ProgressCallback>) -> MediaResult<()> {
    let args = FfmpegCommand::new()
        .input_url(url)
        .arg("-vf")
        .arg("scale=640:360:force_original_aspect_ratio=decrease,pad=640:360:(ow-iw)/2:(oh-ih)/2:black")
        .arg("-c:v")
        .arg("libx264")
        .arg("-crf")
        .arg("28")
        .arg("-c:a")
        .arg("aac")
        .arg("-b:a")
        .arg("96k")
        .arg("-movflags")
        .arg("+faststart")
        .output(output)
        .build_args();

    FfmpegRunner::new(timeout).run(args, output, on_progress).await
}

/// Drops video and encodes to MP3 at the given bitrate variant (spec
/// names 192 kbps as the reference rate).
pub async fn convert_m3u8_to_mp3(url: &str, output: &Path, bitrate_kbps: u32, timeout: Duration, on_progress: Option<ProgressCallback>) -> MediaResult<()> {
    let args = FfmpegCommand::new()
        .input_url(url)
        .arg("-vn")
        .arg("-c:a")
        .arg("libmp3lame")
        .arg("-b:a")
        .arg(format!("{bitrate_kbps}k"))
        .output(output)
        .build_args();

    FfmpegRunner::new(timeout).run(args, output, on_progress).await
}

/// Extracts PCM 16-bit mono 16 kHz audio, used by the Transcriber and
/// Highlight Analyzer's segment transcription step.
pub async fn extract_pcm16_mono_16k(input: &Path, output: &Path, start_s: f64, duration_s: f64, timeout: Duration) -> MediaResult<()> {
    let args = FfmpegCommand::new()
        .arg("-ss")
        .arg(format!("{start_s:.3}"))
        .input(input)
        .arg("-t")
        .arg(format!("{duration_s:.3}"))
        .arg("-ac")
        .arg("1")
        .arg("-ar")
        .arg("16000")
        .arg("-c:a")
        .arg("pcm_s16le")
        .output(output)
        .build_args();

    FfmpegRunner::new(timeout).run(args, output, None).await
}

pub fn quality_profile(quality: Quality) -> QualityProfile {
    quality.profile()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_profile_round_trips() {
        let profile = quality_profile(Quality::High);
        assert_eq!(profile.crf, 20);
        assert_eq!(profile.width, 1080);
    }
}
