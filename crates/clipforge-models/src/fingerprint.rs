use sha2::{Digest, Sha256};

use crate::quality::{Platform, Quality};
use crate::request::{TransformOptions, TransformRequest};

/// Deduplication key: a base name derived from the source URL plus a
/// sorted set of processing-affecting option tokens. Two requests that
/// differ only in continuous tuning knobs (brightness/contrast/
/// saturation/gamma/sharpen — see DESIGN.md "cache key scope") share a
/// fingerprint and therefore a cached output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobFingerprint(String);

impl JobFingerprint {
    pub fn derive(req: &TransformRequest) -> Self {
        let base = public_id(&req.video_url);
        let mut tokens = option_tokens(req.quality, req.platform, &req.options);
        tokens.sort();
        Self(format!("{base}::{}", tokens.join(",")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The externally visible identifier of a job: a stable derivation of the
/// source URL alone, independent of processing variants. Several cache
/// entries (one per distinct fingerprint) may share a public id.
pub fn public_id(video_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(video_url.trim().as_bytes());
    let digest = hasher.finalize();
    hex_prefix(&digest, 16)
}

fn hex_prefix(bytes: &[u8], chars: usize) -> String {
    let mut out = String::with_capacity(chars);
    for byte in bytes {
        if out.len() >= chars {
            break;
        }
        out.push_str(&format!("{byte:02x}"));
    }
    out.truncate(chars);
    out
}

fn option_tokens(quality: Quality, platform: Platform, opts: &TransformOptions) -> Vec<String> {
    let mut tokens = vec![
        format!("q={}", quality.as_str()),
        format!("p={:?}", platform),
        format!("split={}", opts.split),
        format!("subs={}", opts.add_subtitles),
        format!("audio_enh={}", opts.audio_enhancement),
        format!("denoise={}", opts.denoise),
    ];
    if let Some(lang) = &opts.subtitle_language {
        tokens.push(format!("lang={lang}"));
    }
    if let Some(fps) = opts.target_fps {
        tokens.push(format!("fps={fps}"));
    }
    if let Some(bitrate) = opts.custom_bitrate_kbps {
        tokens.push(format!("bitrate={bitrate}"));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(url: &str) -> TransformRequest {
        TransformRequest {
            video_url: url.to_string(),
            quality: Quality::Medium,
            platform: Platform::General,
            options: TransformOptions::default(),
        }
    }

    #[test]
    fn fingerprint_is_a_pure_function_of_input() {
        let a = JobFingerprint::derive(&req("https://host/x.mp4"));
        let b = JobFingerprint::derive(&req("https://host/x.mp4"));
        assert_eq!(a, b);
    }

    #[test]
    fn public_id_ignores_processing_options() {
        let mut r1 = req("https://host/x.mp4");
        let mut r2 = req("https://host/x.mp4");
        r1.quality = Quality::Ultra;
        r2.options.split = true;
        assert_eq!(public_id(&r1.video_url), public_id(&r2.video_url));
    }

    #[test]
    fn brightness_tweak_alone_does_not_change_fingerprint() {
        let mut r1 = req("https://host/x.mp4");
        let mut r2 = req("https://host/x.mp4");
        r1.options.brightness = Some(0.1);
        r2.options.brightness = Some(0.9);
        assert_eq!(JobFingerprint::derive(&r1), JobFingerprint::derive(&r2));
    }

    #[test]
    fn split_flag_changes_fingerprint() {
        let mut r1 = req("https://host/x.mp4");
        let mut r2 = req("https://host/x.mp4");
        r2.options.split = true;
        assert_ne!(JobFingerprint::derive(&r1), JobFingerprint::derive(&r2));
    }
}
