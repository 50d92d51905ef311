use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};
use crate::progress::{FfmpegProgress, ProgressParser};

pub type ProgressCallback = Box<dyn Fn(FfmpegProgress) + Send + Sync>;

/// Locates the `ffmpeg` binary on PATH, or reports `UnavailableDependency`.
pub fn check_ffmpeg() -> MediaResult<std::path::PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegUnavailable)
}

pub fn check_ffprobe() -> MediaResult<std::path::PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeUnavailable)
}

/// Builder for one FFmpeg invocation.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    args: Vec<String>,
}

impl FfmpegCommand {
    pub fn new() -> Self {
        Self { args: vec!["-y".to_string(), "-hide_banner".to_string()] }
    }

    pub fn input(mut self, path: &Path) -> Self {
        self.args.push("-i".to_string());
        self.args.push(path.to_string_lossy().into_owned());
        self
    }

    pub fn input_url(mut self, url: &str) -> Self {
        self.args.push("-i".to_string());
        self.args.push(url.to_string());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn output(mut self, path: &Path) -> Self {
        self.args.push(path.to_string_lossy().into_owned());
        self
    }

    pub fn build_args(self) -> Vec<String> {
        self.args
    }
}

impl Default for FfmpegCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one FFmpeg invocation to completion, enforcing a hard wall-clock
/// timeout and parsing stderr progress lines as they arrive. Returns a
/// typed failure on nonzero exit, timeout, or an empty output file — it
/// never raises; the caller (Job Manager) decides the fallback step.
pub struct FfmpegRunner {
    timeout: Duration,
}

impl FfmpegRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn run(
        &self,
        args: Vec<String>,
        output_path: &Path,
        on_progress: Option<ProgressCallback>,
    ) -> MediaResult<()> {
        let ffmpeg = check_ffmpeg()?;

        let mut child = Command::new(&ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child.stderr.take().expect("stderr was piped");
        let mut lines = BufReader::new(stderr).lines();

        let mut parser = ProgressParser::new();
        let read_task = async {
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(target: "ffmpeg", "{line}");
                if let Some(snapshot) = parser.feed(&line) {
                    if let Some(cb) = &on_progress {
                        cb(snapshot);
                    }
                }
            }
        };

        let wait_result = tokio::time::timeout(self.timeout, async {
            tokio::join!(read_task, child.wait())
        })
        .await;

        let status = match wait_result {
            Ok((_, status)) => status?,
            Err(_) => {
                warn!("ffmpeg invocation exceeded {:?}, killing", self.timeout);
                let _ = child.start_kill();
                let _ = child.wait().await;
                return Err(MediaError::Timeout(self.timeout));
            }
        };

        if !status.success() {
            return Err(MediaError::ConversionFailed {
                status: status.code().unwrap_or(-1),
                stderr_tail: String::new(),
            });
        }

        let metadata = tokio::fs::metadata(output_path).await.ok();
        let non_empty = metadata.map(|m| m.len() > 0).unwrap_or(false);
        if !non_empty {
            return Err(MediaError::EmptyOutput(output_path.to_path_buf()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_builder_places_input_before_output() {
        let args = FfmpegCommand::new()
            .input(Path::new("in.mp4"))
            .arg("-c:v")
            .arg("libx264")
            .output(Path::new("out.mp4"))
            .build_args();

        let i_pos = args.iter().position(|a| a == "-i").unwrap();
        let out_pos = args.len() - 1;
        assert!(i_pos < out_pos);
        assert_eq!(args[out_pos], "out.mp4");
    }
}
