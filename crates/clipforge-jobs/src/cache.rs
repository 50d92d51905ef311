use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use clipforge_models::{CacheEntry, Job, JobFingerprint};
use parking_lot::RwLock;

/// The Job cache: a keyed map guarded by a single lock. All reads and
/// writes under the lock; no value mutated outside it. No sharding —
/// every operation takes the whole-map lock.
#[derive(Clone)]
pub struct JobCache {
    inner: Arc<RwLock<HashMap<JobFingerprint, CacheEntry>>>,
}

impl JobCache {
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub fn insert(&self, job: Job) {
        let entry = CacheEntry::new(job);
        self.inner.write().insert(entry.fingerprint.clone(), entry);
    }

    pub fn get_by_fingerprint(&self, fingerprint: &JobFingerprint) -> Option<CacheEntry> {
        self.inner.read().get(fingerprint).cloned()
    }

    /// Resolves by fingerprint first; falls back to a linear scan for a
    /// matching `public_id`, since several fingerprints may share one
    /// public id.
    pub fn get_by_public_id(&self, public_id: &str) -> Option<CacheEntry> {
        let map = self.inner.read();
        map.values().find(|e| e.public_id == public_id).cloned()
    }

    /// Applies `f` to the entry's job under the lock and writes the
    /// updated entry back — the whole-entry merge the concurrency model
    /// requires, never a partial mutation visible to another reader.
    pub fn update_job<F: FnOnce(&mut Job)>(&self, fingerprint: &JobFingerprint, f: F) {
        let mut map = self.inner.write();
        if let Some(entry) = map.get_mut(fingerprint) {
            f(&mut entry.job);
            entry.temp_dir = entry.job.temp_dir.clone();
            entry.output_path = entry.job.output_path.clone();
        }
    }

    /// Removes every entry older than `ttl_seconds`, returning the
    /// removed entries so the caller can delete their temp dirs outside
    /// the lock — long-running work is never held under it.
    pub fn sweep_expired(&self, ttl_seconds: i64) -> Vec<CacheEntry> {
        let now = Utc::now();
        let mut map = self.inner.write();
        let expired: Vec<JobFingerprint> = map.iter().filter(|(_, e)| e.is_expired(now, ttl_seconds)).map(|(k, _)| k.clone()).collect();
        expired.into_iter().filter_map(|fp| map.remove(&fp)).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for JobCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_models::{Platform, Quality, TransformOptions, TransformRequest};

    fn sample_job(url: &str) -> Job {
        let req = TransformRequest { video_url: url.to_string(), quality: Quality::Medium, platform: Platform::General, options: TransformOptions::default() };
        let fingerprint = JobFingerprint::derive(&req);
        let public_id = clipforge_models::fingerprint::public_id(&req.video_url);
        Job::new(fingerprint, public_id, req.video_url, req.quality, req.platform, req.options)
    }

    #[test]
    fn insert_and_resolve_by_fingerprint() {
        let cache = JobCache::new();
        let job = sample_job("https://host/a.mp4");
        let fingerprint = job.fingerprint.clone();
        cache.insert(job);
        assert!(cache.get_by_fingerprint(&fingerprint).is_some());
    }

    #[test]
    fn resolve_by_public_id_scans_linearly() {
        let cache = JobCache::new();
        let job = sample_job("https://host/b.mp4");
        let public_id = job.public_id.clone();
        cache.insert(job);
        assert!(cache.get_by_public_id(&public_id).is_some());
        assert!(cache.get_by_public_id("nonexistent").is_none());
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let cache = JobCache::new();
        cache.insert(sample_job("https://host/c.mp4"));
        let removed = cache.sweep_expired(3600);
        assert!(removed.is_empty());
        assert_eq!(cache.len(), 1);

        let removed = cache.sweep_expired(-1);
        assert_eq!(removed.len(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn purge_style_sweep_leaves_in_flight_jobs_untouched() {
        let cache = JobCache::new();
        cache.insert(sample_job("https://host/in-flight.mp4"));
        // Mirrors JobManager::purge: sweeping with the live TTL, not `-1`,
        // must not evict an entry that has not actually expired yet.
        let removed = cache.sweep_expired(3600);
        assert!(removed.is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn update_job_merges_whole_entry() {
        let cache = JobCache::new();
        let job = sample_job("https://host/d.mp4");
        let fingerprint = job.fingerprint.clone();
        cache.insert(job);

        cache.update_job(&fingerprint, |job| {
            job.transition(clipforge_models::JobState::Downloading);
        });

        let entry = cache.get_by_fingerprint(&fingerprint).unwrap();
        assert_eq!(entry.job.state, clipforge_models::JobState::Downloading);
    }
}
