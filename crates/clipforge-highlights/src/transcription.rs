//! Phase 1+2 orchestration: extracts each segment's audio window and
//! transcribes it, grounded on `deepseek_analyzer.py::_transcribe_segment`.

use std::path::Path;

use clipforge_transcribe::TranscriptionClient;
use tracing::warn;

use crate::config::AnalyzerConfig;
use crate::segmentation::Segment;

#[derive(Debug, Clone)]
pub struct TranscribedSegment {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub transcription: String,
}

/// Extracts and transcribes every segment, skipping (with a warning)
/// any segment whose extraction or transcription fails. A segment whose
/// transcript comes back empty is also skipped — it carries no signal
/// for Phase 3.
pub async fn transcribe_segments(
    source: &Path,
    temp_dir: &Path,
    segments: &[Segment],
    client: &TranscriptionClient,
    config: &AnalyzerConfig,
) -> Vec<TranscribedSegment> {
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments {
        let window = match clipforge_transcribe::audio::extract_window(source, temp_dir, segment.start, segment.end - segment.start) {
            Ok(path) => path,
            Err(err) => {
                warn!(segment = segment.index, error = %err, "failed to extract audio window");
                continue;
            }
        };

        let text = match client.transcribe(&window, &config.language_hint).await {
            Ok(chunks) => chunks.into_iter().map(|c| c.text).collect::<Vec<_>>().join(" "),
            Err(err) => {
                warn!(segment = segment.index, error = %err, "failed to transcribe segment");
                let _ = std::fs::remove_file(&window);
                continue;
            }
        };
        let _ = std::fs::remove_file(&window);

        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        out.push(TranscribedSegment { index: segment.index, start: segment.start, end: segment.end, transcription: trimmed.to_string() });
    }

    out
}
