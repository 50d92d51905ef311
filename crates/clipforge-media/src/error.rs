use std::path::PathBuf;

use thiserror::Error;

/// Typed failures from the FFmpeg Driver and Download Manager. Timeouts
/// and nonzero exits are returned here, not raised, so the Job Manager
/// can decide the fallback step.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("ffmpeg is not available on PATH")]
    FfmpegUnavailable,

    #[error("ffprobe is not available on PATH")]
    FfprobeUnavailable,

    #[error("ffmpeg exited with status {status}: {stderr_tail}")]
    ConversionFailed { status: i32, stderr_tail: String },

    #[error("ffmpeg timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("output file missing or empty: {0}")]
    EmptyOutput(PathBuf),

    #[error("failed to parse ffprobe output: {0}")]
    ProbeParseError(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("source exceeds max_video_size_mb ({size_mb} > {limit_mb})")]
    OversizedSource { size_mb: u64, limit_mb: u64 },

    #[error("insufficient free disk space: {free_mb} MB available, need at least {required_mb} MB")]
    InsufficientDisk { free_mb: u64, required_mb: u64 },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl MediaError {
    /// Whether this failure is safe to retry with the same conversion
    /// path, as opposed to one that should trigger the fallback ladder.
    pub fn is_transient(&self) -> bool {
        matches!(self, MediaError::Timeout(_) | MediaError::Http(_))
    }
}

pub type MediaResult<T> = Result<T, MediaError>;
