//! Submits one transform request from the command line, polls the Job
//! Manager to completion, and prints the final status as JSON. Not an
//! HTTP server — the external interface this binary exercises is the
//! same submit/poll contract an HTTP adapter would sit in front of.

use clap::Parser;
use clipforge_jobs::{JobManager, JobManagerConfig};
use clipforge_models::{TransformOptions, TransformRequest};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "clipforge", about = "Submit a video for vertical-clip conversion")]
struct Args {
    /// Source video URL
    video_url: String,

    #[arg(long)]
    quality: Option<String>,

    #[arg(long)]
    platform: Option<String>,

    #[arg(long)]
    split: bool,

    #[arg(long)]
    add_subtitles: bool,

    #[arg(long)]
    subtitle_language: Option<String>,

    #[arg(long)]
    audio_enhancement: bool,

    #[arg(long)]
    denoise: bool,

    #[arg(long)]
    target_fps: Option<u32>,

    #[arg(long)]
    custom_bitrate_kbps: Option<u32>,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    poll_interval_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive("clipforge=info".parse().unwrap()))
        .init();

    install_metrics_exporter();

    let args = Args::parse();
    let config = JobManagerConfig::from_env();

    let manager = match JobManager::new(config) {
        Ok(m) => m,
        Err(err) => {
            error!(error = %err, "failed to start job manager");
            std::process::exit(1);
        }
    };
    manager.spawn_sweeper();

    let quality = match &args.quality {
        Some(q) => q.parse().unwrap_or(manager.default_quality()),
        None => manager.default_quality(),
    };
    let platform = match &args.platform {
        Some(p) => p.parse().unwrap_or(manager.default_platform()),
        None => manager.default_platform(),
    };

    let req = TransformRequest {
        video_url: args.video_url,
        quality,
        platform,
        options: TransformOptions {
            split: args.split,
            add_subtitles: args.add_subtitles,
            subtitle_language: args.subtitle_language,
            target_fps: args.target_fps,
            custom_bitrate_kbps: args.custom_bitrate_kbps,
            audio_enhancement: args.audio_enhancement,
            denoise: args.denoise,
            ..Default::default()
        },
    };

    let job = manager.submit(req);
    info!(video_id = %job.public_id, "submitted");

    let mut interval = tokio::time::interval(std::time::Duration::from_millis(args.poll_interval_ms));
    loop {
        interval.tick().await;
        let status = manager.status(&job.public_id)?;
        if status.ready || status.error.is_some() {
            println!("{}", serde_json::to_string_pretty(&status)?);
            if status.error.is_some() {
                std::process::exit(1);
            }
            break;
        }
    }

    Ok(())
}

/// Installs the Prometheus recorder and starts its scrape listener on
/// `METRICS_ADDR` (default `0.0.0.0:9898`). Job state-transition counters
/// and conversion-duration histograms (`clipforge-jobs`) are recorded
/// against whatever recorder is installed process-wide; if the listener
/// fails to bind, metrics recording becomes a no-op rather than a fatal
/// boot error.
fn install_metrics_exporter() {
    let addr = std::env::var("METRICS_ADDR").unwrap_or_else(|_| "0.0.0.0:9898".to_string());
    let socket_addr: std::net::SocketAddr = match addr.parse() {
        Ok(a) => a,
        Err(err) => {
            error!(error = %err, addr, "invalid METRICS_ADDR, metrics exporter disabled");
            return;
        }
    };

    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(socket_addr);
    if let Err(err) = builder.install() {
        error!(error = %err, "failed to install prometheus metrics exporter");
    } else {
        info!(%addr, "prometheus metrics exporter listening");
    }
}
