use serde::{Deserialize, Serialize};

/// Probed properties of a media file, produced once by the FFmpeg Driver's
/// `probe` operation and read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub duration_s: f64,
    pub bitrate_bps: u64,
    pub has_audio: bool,
    pub codec: CodecTag,
}

impl VideoInfo {
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.height > self.width
    }
}

/// A small closed set of codecs this pipeline recognizes by name; unknown
/// codecs are tolerated and stored verbatim rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodecTag {
    H264,
    H265,
    Vp9,
    Av1,
    Unknown,
}

impl From<&str> for CodecTag {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "h264" | "avc" | "avc1" => CodecTag::H264,
            "h265" | "hevc" => CodecTag::H265,
            "vp9" => CodecTag::Vp9,
            "av1" => CodecTag::Av1,
            _ => CodecTag::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_zero_height_does_not_panic() {
        let info = VideoInfo {
            width: 1080,
            height: 0,
            fps: 30.0,
            duration_s: 10.0,
            bitrate_bps: 0,
            has_audio: false,
            codec: CodecTag::Unknown,
        };
        assert_eq!(info.aspect(), 0.0);
    }

    #[test]
    fn codec_tag_falls_back_to_unknown() {
        assert_eq!(CodecTag::from("vorbis"), CodecTag::Unknown);
        assert_eq!(CodecTag::from("H264"), CodecTag::H264);
    }
}
