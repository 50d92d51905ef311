use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use crate::error::{TranscribeError, TranscribeResult};

const EXTRACT_TIMEOUT: Duration = Duration::from_secs(30);
const EXTRACT_RETRIES: u32 = 2;

/// Extracts a PCM 16-bit mono 16 kHz window for transcription, retrying
/// once at the subprocess level on transient failure. Bounded by a 30 s
/// subprocess timeout.
pub async fn extract_window(source: &Path, temp_dir: &Path, start_s: f64, duration_s: f64) -> TranscribeResult<PathBuf> {
    let out_path = temp_dir.join(format!("segment_{}.wav", Uuid::new_v4()));

    let mut last_err = None;
    for attempt in 0..=EXTRACT_RETRIES {
        match clipforge_media::convert::extract_pcm16_mono_16k(source, &out_path, start_s, duration_s, EXTRACT_TIMEOUT).await {
            Ok(()) => return Ok(out_path),
            Err(e) => {
                warn!(attempt, "pcm extraction failed: {e}");
                last_err = Some(e);
            }
        }
    }

    Err(TranscribeError::Media(last_err.expect("loop ran at least once")))
}
