use std::sync::Arc;

use clipforge_media::{check_ffmpeg, check_ffprobe, probe_video};
use clipforge_models::{Job, JobFingerprint, JobState, Platform, Quality, TransformOptions, TransformRequest};
use metrics::{counter, gauge, histogram};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::cache::JobCache;
use crate::config::JobManagerConfig;
use crate::error::{JobsError, JobsResult};
use crate::pipeline::run_pipeline;
use crate::status::JobStatus;

/// The entry point: owns the cache, the concurrency permit pool, and the
/// background sweeper. One instance per process; cheap to clone (every
/// field is an `Arc` or `Clone`-cheap handle).
#[derive(Clone)]
pub struct JobManager {
    config: Arc<JobManagerConfig>,
    cache: JobCache,
    http: reqwest::Client,
    job_permits: Arc<Semaphore>,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl JobManager {
    pub fn new(config: JobManagerConfig) -> JobsResult<Self> {
        check_ffmpeg().map_err(|_| JobsError::UnavailableDependency("ffmpeg".into()))?;
        check_ffprobe().map_err(|_| JobsError::UnavailableDependency("ffprobe".into()))?;

        let job_permits = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        let (shutdown, _) = tokio::sync::watch::channel(false);

        Ok(Self {
            config: Arc::new(config),
            cache: JobCache::new(),
            http: reqwest::Client::new(),
            job_permits,
            shutdown,
        })
    }

    /// Spawns the TTL sweeper as a background task. Call once per process;
    /// the returned handle completes when `shutdown` is signaled.
    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let cache = self.cache.clone();
        let ttl = self.config.cache_ttl_seconds;
        let period = std::time::Duration::from_secs(self.config.cleanup_interval_seconds);
        let mut shutdown_rx = self.shutdown.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        let expired = cache.sweep_expired(ttl);
                        for entry in expired {
                            if let Some(dir) = &entry.temp_dir {
                                if let Err(err) = tokio::fs::remove_dir_all(dir).await {
                                    warn!(error = %err, dir = %dir.display(), "failed to remove expired temp dir");
                                }
                            }
                            info!(public_id = %entry.public_id, "swept expired job");
                        }
                    }
                }
            }
        })
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Submits a request, returning the freshly created or already-cached
    /// job immediately. Dispatches a worker task unless a non-expired
    /// cache entry for the same fingerprint already exists.
    pub fn submit(&self, mut req: TransformRequest) -> Job {
        req.quality = clipforge_models::quality::platform_adjusted(req.quality, req.platform);
        let fingerprint = JobFingerprint::derive(&req);

        if let Some(entry) = self.cache.get_by_fingerprint(&fingerprint) {
            if !entry.is_expired(chrono::Utc::now(), self.config.cache_ttl_seconds) {
                return entry.job;
            }
        }

        let public_id = clipforge_models::fingerprint::public_id(&req.video_url);
        let job = Job::new(fingerprint.clone(), public_id, req.video_url, req.quality, req.platform, req.options);
        self.cache.insert(job.clone());
        counter!("clipforge_jobs_submitted_total", "quality" => job.quality.as_str()).increment(1);
        gauge!("clipforge_jobs_active").increment(1.0);

        let manager = self.clone();
        tokio::spawn(async move {
            let permit = manager.job_permits.clone().acquire_owned().await;
            let _permit = match permit {
                Ok(p) => p,
                Err(_) => return,
            };
            manager.run_worker(fingerprint).await;
        });

        job
    }

    async fn run_worker(&self, fingerprint: JobFingerprint) {
        let Some(entry) = self.cache.get_by_fingerprint(&fingerprint) else {
            error!("worker dispatched for a fingerprint no longer in the cache");
            return;
        };
        let job = entry.job;

        let started_at = chrono::Utc::now();
        let temp_dir = self.config.temp_dir.join(job.public_id.clone()).join(job.id.to_string());
        if let Err(err) = tokio::fs::create_dir_all(&temp_dir).await {
            self.cache.update_job(&fingerprint, |j| j.fail(format!("could not create temp dir: {err}")));
            self.record_terminal(&job, started_at, false);
            return;
        }
        self.cache.update_job(&fingerprint, |j| {
            j.temp_dir = Some(temp_dir.clone());
            j.transition(JobState::Downloading);
        });

        let input_path = temp_dir.join("input");
        if let Err(err) = clipforge_media::download::download_to_file(&self.http, &job.video_url, &input_path, &self.config.download).await {
            warn!(error = %err, "download failed");
            self.cache.update_job(&fingerprint, |j| j.fail(err.to_string()));
            self.record_terminal(&job, started_at, false);
            return;
        }

        let original_info = match probe_video(&input_path).await {
            Ok(info) => info,
            Err(err) => {
                warn!(error = %err, "probing downloaded source failed");
                self.cache.update_job(&fingerprint, |j| j.fail(err.to_string()));
                self.record_terminal(&job, started_at, false);
                return;
            }
        };
        self.cache.update_job(&fingerprint, |j| {
            j.original_info = Some(original_info);
            j.transition(JobState::Converting);
        });

        let output_path = temp_dir.join(format!("{}.mp4", job.public_id));
        let result = run_pipeline(
            &input_path,
            &output_path,
            &temp_dir,
            job.quality,
            &job.options,
            original_info.fps,
            self.config.ffmpeg_timeout,
        )
        .await;

        if let Err(err) = result {
            warn!(error = %err, "conversion failed through every fallback rung");
            self.cache.update_job(&fingerprint, |j| j.fail(err.to_string()));
            self.record_terminal(&job, started_at, false);
            return;
        }

        let final_info = probe_video(&output_path).await.ok();
        let output_size = tokio::fs::metadata(&output_path).await.ok().map(|m| m.len());

        self.cache.update_job(&fingerprint, |j| {
            j.output_path = Some(output_path.clone());
            j.output_size_bytes = output_size;
            j.final_info = final_info;
            j.transition(JobState::Completed);
        });
        self.record_terminal(&job, started_at, true);
        info!(public_id = %job.public_id, "job completed");
    }

    /// Records the terminal outcome of one worker run: decrements the
    /// active-job gauge, increments the completed/error counter, and
    /// observes the end-to-end conversion duration.
    fn record_terminal(&self, job: &Job, started_at: chrono::DateTime<chrono::Utc>, success: bool) {
        gauge!("clipforge_jobs_active").decrement(1.0);
        let outcome = if success { "completed" } else { "error" };
        counter!("clipforge_jobs_finished_total", "quality" => job.quality.as_str(), "outcome" => outcome).increment(1);
        let elapsed_s = (chrono::Utc::now() - started_at).num_milliseconds() as f64 / 1000.0;
        histogram!("clipforge_job_duration_seconds", "outcome" => outcome).record(elapsed_s.max(0.0));
    }

    pub fn status(&self, video_id: &str) -> JobsResult<JobStatus> {
        let entry = self.cache.get_by_public_id(video_id).ok_or_else(|| JobsError::NotFound(video_id.to_string()))?;
        Ok(JobStatus::from_job(&entry.job))
    }

    /// Returns the completed output path for `download`/`inline` access.
    /// `download` and `inline` share the same readiness rule: only a
    /// completed job has a file to serve.
    pub fn output_path(&self, video_id: &str) -> JobsResult<std::path::PathBuf> {
        let entry = self.cache.get_by_public_id(video_id).ok_or_else(|| JobsError::NotFound(video_id.to_string()))?;
        match entry.job.state {
            JobState::Completed => entry.output_path.ok_or_else(|| JobsError::NotReady(video_id.to_string(), "completed but output path missing")),
            JobState::Error => Err(JobsError::NotReady(video_id.to_string(), "job errored")),
            _ => Err(JobsError::NotReady(video_id.to_string(), "job still in flight")),
        }
    }

    /// Clears expired cache entries immediately (rather than waiting for
    /// the sweeper's next tick) and deletes their temp dirs, returning
    /// the count removed. Non-expired, in-flight jobs are left untouched;
    /// purging when nothing has expired yet is a no-op.
    pub async fn purge(&self) -> usize {
        let entries = self.cache.sweep_expired(self.config.cache_ttl_seconds);
        let count = entries.len();
        for entry in entries {
            if let Some(dir) = entry.temp_dir {
                let _ = tokio::fs::remove_dir_all(dir).await;
            }
        }
        count
    }

    pub fn default_quality(&self) -> Quality {
        self.config.default_quality
    }

    pub fn default_platform(&self) -> Platform {
        self.config.default_platform
    }

    pub fn default_fps(&self) -> u32 {
        self.config.default_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accessors_reflect_config() {
        let config = JobManagerConfig { default_quality: Quality::High, ..Default::default() };
        let ttl = config.cache_ttl_seconds;
        assert!(ttl > 0);
        assert_eq!(config.default_quality, Quality::High);
    }
}
