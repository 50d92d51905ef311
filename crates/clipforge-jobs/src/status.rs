use chrono::{DateTime, Utc};
use clipforge_models::{Job, JobState, Platform, Quality};
use serde::Serialize;

/// The poll-status response shape: `{video_id, state, quality, created_at,
/// ready, message|error, file_size?, conversion_time?}`.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub video_id: String,
    pub state: JobState,
    pub quality: Quality,
    pub platform: Platform,
    pub created_at: DateTime<Utc>,
    pub ready: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub file_size: Option<u64>,
    pub conversion_time_s: Option<i64>,
}

impl JobStatus {
    pub fn from_job(job: &Job) -> Self {
        let ready = job.state == JobState::Completed;
        let message = (!ready && job.state != JobState::Error).then(|| progress_message(job.state));
        let conversion_time_s = job.completed_at.map(|done| (done - job.created_at).num_seconds());

        Self {
            video_id: job.public_id.clone(),
            state: job.state,
            quality: job.quality,
            platform: job.platform,
            created_at: job.created_at,
            ready,
            message,
            error: job.error_message.clone(),
            file_size: job.output_size_bytes,
            conversion_time_s,
        }
    }
}

fn progress_message(state: JobState) -> String {
    match state {
        JobState::Queued => "queued".to_string(),
        JobState::Downloading => "downloading source".to_string(),
        JobState::Converting => "converting".to_string(),
        JobState::Completed | JobState::Error => unreachable!("terminal states carry no progress message"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_models::{JobFingerprint, TransformOptions, TransformRequest};

    fn sample_job() -> Job {
        let req = TransformRequest {
            video_url: "https://host/a.mp4".into(),
            quality: Quality::Medium,
            platform: Platform::General,
            options: TransformOptions::default(),
        };
        let fingerprint = JobFingerprint::derive(&req);
        Job::new(fingerprint, "abc123".into(), req.video_url, req.quality, req.platform, req.options)
    }

    #[test]
    fn queued_job_is_not_ready_and_carries_a_message() {
        let job = sample_job();
        let status = JobStatus::from_job(&job);
        assert!(!status.ready);
        assert!(status.message.is_some());
        assert!(status.error.is_none());
    }

    #[test]
    fn completed_job_is_ready_with_no_message() {
        let mut job = sample_job();
        job.transition(JobState::Downloading);
        job.transition(JobState::Converting);
        job.output_size_bytes = Some(1024);
        job.transition(JobState::Completed);
        let status = JobStatus::from_job(&job);
        assert!(status.ready);
        assert!(status.message.is_none());
        assert_eq!(status.file_size, Some(1024));
        assert!(status.conversion_time_s.is_some());
    }

    #[test]
    fn errored_job_carries_error_not_message() {
        let mut job = sample_job();
        job.fail("disk full");
        let status = JobStatus::from_job(&job);
        assert!(!status.ready);
        assert!(status.message.is_none());
        assert_eq!(status.error.as_deref(), Some("disk full"));
    }
}
