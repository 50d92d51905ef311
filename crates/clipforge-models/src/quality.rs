use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelsError;

/// A named encoding preset. Matches the seven-entry catalog exactly; no
/// other quality tags are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    High,
    Ultra,
    Tiktok,
    Instagram,
    Youtube,
}

impl FromStr for Quality {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            "ultra" => Ok(Quality::Ultra),
            "tiktok" => Ok(Quality::Tiktok),
            "instagram" => Ok(Quality::Instagram),
            "youtube" => Ok(Quality::Youtube),
            other => Err(ModelsError::InvalidQuality(other.to_string())),
        }
    }
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
            Quality::Ultra => "ultra",
            Quality::Tiktok => "tiktok",
            Quality::Instagram => "instagram",
            Quality::Youtube => "youtube",
        }
    }

    /// The static encoding profile for this quality tag.
    pub fn profile(self) -> QualityProfile {
        match self {
            Quality::Low => QualityProfile {
                crf: 28,
                preset: "fast",
                width: 720,
                height: 1280,
                bitrate_kbps: 1200,
                maxrate_kbps: 1800,
                bufsize_kbps: 2400,
                audio_bitrate_kbps: 96,
            },
            Quality::Medium => QualityProfile {
                crf: 23,
                preset: "medium",
                width: 1080,
                height: 1920,
                bitrate_kbps: 2800,
                maxrate_kbps: 4200,
                bufsize_kbps: 5600,
                audio_bitrate_kbps: 128,
            },
            Quality::High => QualityProfile {
                crf: 20,
                preset: "medium",
                width: 1080,
                height: 1920,
                bitrate_kbps: 5000,
                maxrate_kbps: 7500,
                bufsize_kbps: 10000,
                audio_bitrate_kbps: 192,
            },
            Quality::Ultra => QualityProfile {
                crf: 16,
                preset: "slow",
                width: 1080,
                height: 1920,
                bitrate_kbps: 8000,
                maxrate_kbps: 12000,
                bufsize_kbps: 16000,
                audio_bitrate_kbps: 256,
            },
            Quality::Tiktok => QualityProfile {
                crf: 22,
                preset: "medium",
                width: 1080,
                height: 1920,
                bitrate_kbps: 2500,
                maxrate_kbps: 3500,
                bufsize_kbps: 5000,
                audio_bitrate_kbps: 128,
            },
            Quality::Instagram => QualityProfile {
                crf: 21,
                preset: "medium",
                width: 1080,
                height: 1920,
                bitrate_kbps: 3200,
                maxrate_kbps: 4800,
                bufsize_kbps: 6400,
                audio_bitrate_kbps: 160,
            },
            Quality::Youtube => QualityProfile {
                crf: 20,
                preset: "medium",
                width: 1080,
                height: 1920,
                bitrate_kbps: 4000,
                maxrate_kbps: 6000,
                bufsize_kbps: 8000,
                audio_bitrate_kbps: 192,
            },
        }
    }
}

/// A named destination platform. Drives quality adjustment only; has no
/// other effect on the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    General,
    Tiktok,
    Instagram,
    Facebook,
    Youtube,
}

impl FromStr for Platform {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" => Ok(Platform::General),
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" => Ok(Platform::Instagram),
            "facebook" => Ok(Platform::Facebook),
            "youtube" => Ok(Platform::Youtube),
            other => Err(ModelsError::InvalidPlatform(other.to_string())),
        }
    }
}

/// Given a requested quality and destination platform, compute the
/// quality actually used for encoding. Facebook borrows Instagram's
/// profile; the platform-specific tags map to themselves; `general`
/// passes the request through unchanged. Idempotent: applying this twice
/// with the platform held fixed returns the same quality both times.
pub fn platform_adjusted(quality: Quality, platform: Platform) -> Quality {
    match platform {
        Platform::General => quality,
        Platform::Tiktok => Quality::Tiktok,
        Platform::Instagram => Quality::Instagram,
        Platform::Facebook => Quality::Instagram,
        Platform::Youtube => Quality::Youtube,
    }
}

/// Static encoding preset for a quality tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityProfile {
    pub crf: u8,
    pub preset: &'static str,
    pub width: u32,
    pub height: u32,
    pub bitrate_kbps: u32,
    pub maxrate_kbps: u32,
    pub bufsize_kbps: u32,
    pub audio_bitrate_kbps: u32,
}

/// One row of the "get platform specs" catalog: a quality tag paired
/// with its static encoding profile.
#[derive(Debug, Clone, Serialize)]
pub struct QualityCatalogEntry {
    pub quality: Quality,
    pub profile: QualityProfile,
}

/// One row of the platform-to-quality adjustment table.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformMappingEntry {
    pub platform: Platform,
    pub adjusted_quality: Quality,
}

/// The full static catalog backing the "get platform specs" operation
/// (spec §6): every quality profile plus the platform adjustment table,
/// neither of which depends on any request.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformSpecs {
    pub qualities: Vec<QualityCatalogEntry>,
    pub platform_mapping: Vec<PlatformMappingEntry>,
}

const ALL_QUALITIES: [Quality; 7] =
    [Quality::Low, Quality::Medium, Quality::High, Quality::Ultra, Quality::Tiktok, Quality::Instagram, Quality::Youtube];

const ALL_PLATFORMS: [Platform; 5] = [Platform::General, Platform::Tiktok, Platform::Instagram, Platform::Facebook, Platform::Youtube];

/// Builds the static "get platform specs" catalog. `platform_mapping`
/// reports the quality a request at each platform resolves to when it
/// asks for [`Quality::Medium`] (the representative case — the mapping
/// itself, per [`platform_adjusted`], ignores the requested quality for
/// every platform but `general`).
pub fn platform_specs() -> PlatformSpecs {
    PlatformSpecs {
        qualities: ALL_QUALITIES.iter().map(|&quality| QualityCatalogEntry { quality, profile: quality.profile() }).collect(),
        platform_mapping: ALL_PLATFORMS
            .iter()
            .map(|&platform| PlatformMappingEntry { platform, adjusted_quality: platform_adjusted(Quality::Medium, platform) })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_quality_tags() {
        for tag in ["low", "medium", "high", "ultra", "tiktok", "instagram", "youtube"] {
            assert!(Quality::from_str(tag).is_ok());
        }
        assert!(Quality::from_str("potato").is_err());
    }

    #[test]
    fn facebook_borrows_instagram_profile() {
        let adjusted = platform_adjusted(Quality::Medium, Platform::Facebook);
        assert_eq!(adjusted, Quality::Instagram);
    }

    #[test]
    fn platform_adjustment_is_idempotent() {
        for platform in [
            Platform::General,
            Platform::Tiktok,
            Platform::Instagram,
            Platform::Facebook,
            Platform::Youtube,
        ] {
            let once = platform_adjusted(Quality::High, platform);
            let twice = platform_adjusted(once, platform);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn platform_specs_catalog_covers_every_quality_and_platform() {
        let specs = platform_specs();
        assert_eq!(specs.qualities.len(), 7);
        assert_eq!(specs.platform_mapping.len(), 5);
        let facebook_row = specs.platform_mapping.iter().find(|r| r.platform == Platform::Facebook).unwrap();
        assert_eq!(facebook_row.adjusted_quality, Quality::Instagram);
    }

    #[test]
    fn every_dimension_pair_is_even() {
        for q in [
            Quality::Low,
            Quality::Medium,
            Quality::High,
            Quality::Ultra,
            Quality::Tiktok,
            Quality::Instagram,
            Quality::Youtube,
        ] {
            let p = q.profile();
            assert_eq!(p.width % 2, 0);
            assert_eq!(p.height % 2, 0);
        }
    }
}
