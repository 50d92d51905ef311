use std::path::Path;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::{MediaError, MediaResult};
use crate::fs_utils::free_space_mb;

const MIN_FREE_DISK_MB: u64 = 1024;
const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;
const LOG_EVERY_MB: u64 = 25;

pub struct DownloadConfig {
    pub chunk_size: usize,
    pub max_video_size_mb: u64,
    pub connect_timeout: std::time::Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_video_size_mb: 2048,
            connect_timeout: std::time::Duration::from_secs(30),
        }
    }
}

/// Streams a remote file to `dest`, checking free disk and declared
/// content length before writing a byte, flushing after every chunk, and
/// unlinking on any mid-stream I/O failure.
pub async fn download_to_file(client: &reqwest::Client, url: &str, dest: &Path, config: &DownloadConfig) -> MediaResult<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    let free_mb = free_space_mb(parent)?;
    if free_mb < MIN_FREE_DISK_MB {
        return Err(MediaError::InsufficientDisk {
            free_mb,
            required_mb: MIN_FREE_DISK_MB,
        });
    }
    info!(free_mb, "preflight disk check passed");

    let response = client
        .get(url)
        .timeout(config.connect_timeout)
        .send()
        .await?
        .error_for_status()?;

    if let Some(len) = response.content_length() {
        let len_mb = len / (1024 * 1024);
        if len_mb > config.max_video_size_mb {
            return Err(MediaError::OversizedSource {
                size_mb: len_mb,
                limit_mb: config.max_video_size_mb,
            });
        }
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    let mut next_log_at = LOG_EVERY_MB * 1024 * 1024;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                warn!(offset = written, "download failed mid-stream: {e}");
                let _ = tokio::fs::remove_file(dest).await;
                return Err(MediaError::DownloadFailed(format!(
                    "mid-stream failure at byte offset {written}: {e}"
                )));
            }
        };

        if let Err(e) = file.write_all(&chunk).await {
            let _ = tokio::fs::remove_file(dest).await;
            return Err(e.into());
        }
        if let Err(e) = file.flush().await {
            let _ = tokio::fs::remove_file(dest).await;
            return Err(e.into());
        }

        written += chunk.len() as u64;
        if written >= next_log_at {
            info!(mb = written / (1024 * 1024), "download progress");
            next_log_at += LOG_EVERY_MB * 1024 * 1024;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn oversized_content_length_aborts_before_writing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-length", "999999999999").set_body_bytes(vec![0u8; 16]))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.mp4");
        let client = reqwest::Client::new();
        let config = DownloadConfig { max_video_size_mb: 10, ..Default::default() };

        let err = download_to_file(&client, &server.uri(), &dest, &config).await.unwrap_err();
        assert!(matches!(err, MediaError::OversizedSource { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn small_file_downloads_successfully() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 4096]))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.mp4");
        let client = reqwest::Client::new();
        let config = DownloadConfig::default();

        download_to_file(&client, &server.uri(), &dest, &config).await.unwrap();
        assert_eq!(tokio::fs::metadata(&dest).await.unwrap().len(), 4096);
    }
}
