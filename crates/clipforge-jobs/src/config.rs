use std::path::PathBuf;
use std::time::Duration;

use clipforge_media::download::DownloadConfig;

/// Recognized configuration keys: TTL cache, sweeper cadence, FFmpeg
/// and download bounds, and default request fields. Mirrors the
/// teacher's `WorkerConfig::from_env` shape.
#[derive(Debug, Clone)]
pub struct JobManagerConfig {
    pub temp_dir: PathBuf,
    pub cache_ttl_seconds: i64,
    pub cleanup_interval_seconds: u64,
    pub max_concurrent_jobs: usize,
    pub ffmpeg_timeout: Duration,
    pub download: DownloadConfig,
    pub default_quality: clipforge_models::Quality,
    pub default_platform: clipforge_models::Platform,
    pub default_fps: u32,
}

impl Default for JobManagerConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join("clipforge"),
            cache_ttl_seconds: 3600,
            cleanup_interval_seconds: 300,
            max_concurrent_jobs: 4,
            ffmpeg_timeout: Duration::from_secs(600),
            download: DownloadConfig::default(),
            default_quality: clipforge_models::Quality::Medium,
            default_platform: clipforge_models::Platform::General,
            default_fps: 30,
        }
    }
}

impl JobManagerConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            temp_dir: std::env::var("TEMP_DIR").map(PathBuf::from).unwrap_or(d.temp_dir),
            cache_ttl_seconds: env_i64("CACHE_EXPIRY_SECONDS", d.cache_ttl_seconds),
            cleanup_interval_seconds: env_u64("CLEANUP_INTERVAL_SECONDS", d.cleanup_interval_seconds),
            max_concurrent_jobs: env_usize("MAX_CONCURRENT_JOBS", d.max_concurrent_jobs),
            ffmpeg_timeout: Duration::from_secs(env_u64("FFMPEG_TIMEOUT", d.ffmpeg_timeout.as_secs())),
            download: DownloadConfig {
                chunk_size: env_usize("CHUNK_SIZE", d.download.chunk_size),
                max_video_size_mb: env_u64("MAX_VIDEO_SIZE_MB", d.download.max_video_size_mb),
                connect_timeout: Duration::from_secs(env_u64("DOWNLOAD_TIMEOUT", d.download.connect_timeout.as_secs())),
            },
            default_quality: std::env::var("DEFAULT_QUALITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(d.default_quality),
            default_platform: std::env::var("DEFAULT_PLATFORM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(d.default_platform),
            default_fps: env_u32("DEFAULT_FPS", d.default_fps),
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = JobManagerConfig::default();
        assert!(config.cache_ttl_seconds > 0);
        assert!(config.max_concurrent_jobs > 0);
    }
}
