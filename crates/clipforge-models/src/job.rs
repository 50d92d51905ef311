use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fingerprint::JobFingerprint;
use crate::quality::{Platform, Quality};
use crate::request::TransformOptions;
use crate::video::VideoInfo;

/// Internal identifier for a job, distinct from its externally visible
/// public id (which is derived from the source URL alone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Finite, monotonic job-state enum: `queued -> downloading -> converting
/// -> completed|error`. No reverse transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Downloading,
    Converting,
    Completed,
    Error,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Error)
    }

    /// True if `next` is a legal forward transition from `self` (or a
    /// no-op repeat of the current state).
    pub fn can_advance_to(self, next: JobState) -> bool {
        use JobState::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Queued, Downloading)
                | (Queued, Error)
                | (Downloading, Converting)
                | (Downloading, Error)
                | (Converting, Completed)
                | (Converting, Error)
        )
    }
}

/// A unit of async transformation work. Created on submit, mutated only
/// by its worker, and reclaimed by the TTL sweeper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub fingerprint: JobFingerprint,
    pub public_id: String,
    pub video_url: String,
    pub quality: Quality,
    pub platform: Platform,
    pub options: TransformOptions,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub temp_dir: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub output_size_bytes: Option<u64>,
    pub original_info: Option<VideoInfo>,
    pub final_info: Option<VideoInfo>,
    pub error_message: Option<String>,
}

impl Job {
    pub fn new(
        fingerprint: JobFingerprint,
        public_id: String,
        video_url: String,
        quality: Quality,
        platform: Platform,
        options: TransformOptions,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            fingerprint,
            public_id,
            video_url,
            quality,
            platform,
            options,
            state: JobState::Queued,
            created_at: now,
            updated_at: now,
            completed_at: None,
            temp_dir: None,
            output_path: None,
            output_size_bytes: None,
            original_info: None,
            final_info: None,
            error_message: None,
        }
    }

    /// Advance to a new state. Panics on an illegal backward transition —
    /// state monotonicity is enforced at this single choke point, not by
    /// caller discipline.
    pub fn transition(&mut self, next: JobState) {
        assert!(
            self.state.can_advance_to(next),
            "illegal job state transition: {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
        self.updated_at = Utc::now();
        if next.is_terminal() {
            self.completed_at = Some(self.updated_at);
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.transition(JobState::Error);
    }

    pub fn seconds_since_creation(&self) -> i64 {
        (Utc::now() - self.created_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> Job {
        Job::new(
            JobFingerprint::derive(&crate::request::TransformRequest {
                video_url: "https://host/x.mp4".into(),
                quality: Quality::Medium,
                platform: Platform::General,
                options: TransformOptions::default(),
            }),
            "abc123".into(),
            "https://host/x.mp4".into(),
            Quality::Medium,
            Platform::General,
            TransformOptions::default(),
        )
    }

    #[test]
    fn legal_transitions_advance_state() {
        let mut job = sample_job();
        job.transition(JobState::Downloading);
        job.transition(JobState::Converting);
        job.transition(JobState::Completed);
        assert_eq!(job.state, JobState::Completed);
        assert!(job.completed_at.is_some());
    }

    #[test]
    #[should_panic(expected = "illegal job state transition")]
    fn backward_transition_panics() {
        let mut job = sample_job();
        job.transition(JobState::Downloading);
        job.transition(JobState::Converting);
        job.transition(JobState::Downloading);
    }

    #[test]
    fn error_is_terminal_from_any_non_terminal_state() {
        let mut job = sample_job();
        job.fail("disk full");
        assert_eq!(job.state, JobState::Error);
        assert!(job.error_message.is_some());
    }
}
