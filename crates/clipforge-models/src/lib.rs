//! Shared data model for the ClipForge pipeline: requests, jobs, video
//! metadata, quality profiles, and highlight/viral scoring types.

pub mod cache_entry;
pub mod error;
pub mod fingerprint;
pub mod highlight;
pub mod job;
pub mod quality;
pub mod request;
pub mod video;
pub mod viral;

pub use cache_entry::CacheEntry;
pub use error::ModelsError;
pub use fingerprint::JobFingerprint;
pub use highlight::{Highlight, HighlightCandidate, HighlightMetadata};
pub use job::{Job, JobId, JobState};
pub use quality::{platform_specs, Platform, PlatformSpecs, Quality, QualityProfile};
pub use request::{TransformOptions, TransformRequest};
pub use video::VideoInfo;
pub use viral::ViralMetrics;
