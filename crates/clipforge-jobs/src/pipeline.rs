use std::path::{Path, PathBuf};
use std::time::Duration;

use clipforge_media::convert;
use clipforge_media::error::MediaResult;
use clipforge_models::quality::Quality;
use clipforge_models::request::TransformOptions;
use tracing::warn;

/// Picks the convention-based subtitle file for a job's temp dir. No
/// TransformOptions field carries the SRT path itself; a caller that set
/// `add_subtitles` is expected to have already placed one at
/// `{temp_dir}/subtitles.srt`. Its absence just drops the subtitle
/// branch rather than failing the job.
pub fn subtitle_path_for(temp_dir: &Path, opts: &TransformOptions) -> Option<PathBuf> {
    if !opts.add_subtitles {
        return None;
    }
    let candidate = temp_dir.join("subtitles.srt");
    candidate.is_file().then_some(candidate)
}

/// Runs the conversion appropriate for `opts`, retrying down the
/// fallback ladder on any conversion failure:
/// advanced (split or optimized) -> subtitle-stripped retry -> simple.
/// Each rung is bounded by `timeout`; the final rung's error, if any, is
/// the one returned.
pub async fn run_pipeline(
    input: &Path,
    output: &Path,
    temp_dir: &Path,
    quality: Quality,
    opts: &TransformOptions,
    original_fps: f64,
    timeout: Duration,
) -> MediaResult<()> {
    if !opts.requires_advanced_pipeline() {
        return convert::convert_vertical_simple(input, output, quality, timeout, None).await;
    }

    match run_advanced(input, output, temp_dir, quality, opts, original_fps, timeout).await {
        Ok(()) => Ok(()),
        Err(err) if opts.add_subtitles => {
            warn!(error = %err, "advanced pipeline failed with subtitles, retrying without them");
            let stripped = opts.without_subtitles();
            match run_advanced(input, output, temp_dir, quality, &stripped, original_fps, timeout).await {
                Ok(()) => Ok(()),
                Err(err) => {
                    warn!(error = %err, "subtitle-stripped retry failed, falling back to simple pipeline");
                    convert::convert_vertical_simple(input, output, quality, timeout, None).await
                }
            }
        }
        Err(err) => {
            warn!(error = %err, "advanced pipeline failed, falling back to simple pipeline");
            convert::convert_vertical_simple(input, output, quality, timeout, None).await
        }
    }
}

async fn run_advanced(
    input: &Path,
    output: &Path,
    temp_dir: &Path,
    quality: Quality,
    opts: &TransformOptions,
    original_fps: f64,
    timeout: Duration,
) -> MediaResult<()> {
    if opts.split {
        return convert::convert_split(input, output, quality, opts, timeout, None).await;
    }

    let subtitle_path = subtitle_path_for(temp_dir, opts);
    let subtitle_path = subtitle_path.as_deref().and_then(|p| p.to_str());
    convert::convert_vertical_optimized(input, output, quality, opts, subtitle_path, original_fps, timeout, None).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtitle_path_is_none_without_add_subtitles() {
        let opts = TransformOptions::default();
        let dir = tempfile::tempdir().unwrap();
        assert!(subtitle_path_for(dir.path(), &opts).is_none());
    }

    #[test]
    fn subtitle_path_is_none_when_file_absent() {
        let opts = TransformOptions { add_subtitles: true, ..Default::default() };
        let dir = tempfile::tempdir().unwrap();
        assert!(subtitle_path_for(dir.path(), &opts).is_none());
    }

    #[test]
    fn subtitle_path_resolves_when_file_present() {
        let opts = TransformOptions { add_subtitles: true, ..Default::default() };
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("subtitles.srt"), "1\n00:00:00,000 --> 00:00:01,000\nhi\n").unwrap();
        assert!(subtitle_path_for(dir.path(), &opts).is_some());
    }
}
