//! Highlight analyzer: segments a source video, transcribes each
//! window, asks a remote model to reason about which moments are worth
//! clipping, scores and deduplicates the candidates it returns, and
//! falls back to a deterministic distributed split whenever any earlier
//! phase comes up empty. Grounded end-to-end on `deepseek_analyzer.py`.

pub mod config;
pub mod error;
pub mod fallback;
pub mod patterns;
pub mod reasoning;
pub mod scoring;
pub mod segmentation;
pub mod selection;
pub mod timecode;
pub mod transcription;
pub mod util;

use std::path::Path;

use clipforge_models::{Highlight, HighlightMetadata};
use clipforge_transcribe::TranscriptionClient;
use tracing::{info, warn};

pub use config::AnalyzerConfig;
pub use error::{HighlightError, HighlightResult};
pub use reasoning::{ReasoningClient, ReasoningConfig};

/// Runs the full five-phase analysis and returns the selected
/// highlights in start-time order. Never returns an error: every
/// recoverable failure (transcription, remote reasoning, empty results)
/// degrades to [`fallback::fallback_clips`] instead of propagating.
pub async fn analyze_video(
    source: &Path,
    temp_dir: &Path,
    duration_s: f64,
    transcribe_client: &TranscriptionClient,
    reasoning_client: Option<&ReasoningClient>,
    config: &AnalyzerConfig,
) -> Vec<Highlight> {
    if duration_s <= 0.0 {
        return Vec::new();
    }

    let Some(reasoning_client) = reasoning_client else {
        info!("no reasoning endpoint configured, using distributed fallback");
        return fallback::fallback_clips(duration_s, config);
    };

    let segments = segmentation::build_segments(duration_s, config);
    let transcribed = transcription::transcribe_segments(source, temp_dir, &segments, transcribe_client, config).await;
    if transcribed.is_empty() {
        warn!("no segment produced a usable transcript, using distributed fallback");
        return fallback::fallback_clips(duration_s, config);
    }

    let mapped = match reasoning_client.analyze(&transcribed, config).await {
        Ok(mapped) if !mapped.is_empty() => mapped,
        Ok(_) => {
            info!("reasoning endpoint returned no highlights, using distributed fallback");
            return fallback::fallback_clips(duration_s, config);
        }
        Err(err) => {
            warn!(error = %err, "reasoning endpoint call failed, using distributed fallback");
            return fallback::fallback_clips(duration_s, config);
        }
    };

    let candidates = scoring::build_candidates(&mapped, config);
    let selected = selection::select_optimal(candidates, config);

    selected
        .into_iter()
        .map(|c| {
            let duration_optimality = scoring::duration_optimality(c.duration(), config);
            let final_score = c.final_score(duration_optimality);
            Highlight {
                start: c.start,
                end: c.end,
                final_score,
                reason: format!("{} (score: {:.3}, confidence: {:.3})", c.reason, final_score, c.confidence),
                transcription: c.transcription,
                metadata: HighlightMetadata {
                    emotional_intensity: c.emotional_intensity,
                    speech_clarity: c.speech_clarity,
                    keyword_density: c.keyword_density,
                    conversation_flow: c.conversation_flow,
                    confidence: c.confidence,
                },
            }
        })
        .collect()
}
