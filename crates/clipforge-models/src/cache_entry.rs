use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::fingerprint::JobFingerprint;
use crate::job::Job;

/// A cache slot: a job plus the disk artifacts it owns. Inserted on
/// submit, removed by the TTL sweeper or an explicit purge.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fingerprint: JobFingerprint,
    pub public_id: String,
    pub job: Job,
    pub temp_dir: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(job: Job) -> Self {
        Self {
            fingerprint: job.fingerprint.clone(),
            public_id: job.public_id.clone(),
            temp_dir: job.temp_dir.clone(),
            output_path: job.output_path.clone(),
            created_at: job.created_at,
            job,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl_seconds: i64) -> bool {
        (now - self.created_at).num_seconds() > ttl_seconds
    }
}
