//! Verifies the process can actually do its job before it is trusted
//! with traffic: FFmpeg/ffprobe on PATH, the temp-dir root writable, and
//! the required environment variables present.

use std::path::Path;

use clipforge_jobs::JobManagerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = JobManagerConfig::from_env();

    println!("clipforge-selfcheck: starting with temp_dir={}", config.temp_dir.display());
    ensure_workdir(&config.temp_dir).await?;
    ensure_ffmpeg()?;
    ensure_ffprobe()?;

    let report = clipforge_media::ffmpeg_capabilities().await;
    println!("capabilities: {}", serde_json::to_string_pretty(&report)?);

    let specs = clipforge_models::platform_specs();
    println!("platform specs: {}", serde_json::to_string_pretty(&specs)?);

    println!("clipforge-selfcheck: ok");
    Ok(())
}

async fn ensure_workdir<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(path.as_ref()).await?;
    Ok(())
}

fn ensure_ffmpeg() -> anyhow::Result<()> {
    clipforge_media::check_ffmpeg().map_err(|e| anyhow::anyhow!("ffmpeg not available: {e}"))?;
    Ok(())
}

fn ensure_ffprobe() -> anyhow::Result<()> {
    clipforge_media::check_ffprobe().map_err(|e| anyhow::anyhow!("ffprobe not available: {e}"))?;
    Ok(())
}
