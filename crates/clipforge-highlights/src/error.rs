use thiserror::Error;

/// Typed failures from the Highlight Analyzer. None of these abort the
/// pipeline on their own — callers route every variant here to the
/// distributed fallback path; the analyzer degrades gracefully rather
/// than surfacing a hard failure.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("audio extraction/transcription failed: {0}")]
    Transcribe(#[from] clipforge_transcribe::TranscribeError),

    #[error("remote reasoning http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote reasoning endpoint returned status {0}")]
    RemoteStatus(String),

    #[error("remote reasoning response was not valid JSON: {0}")]
    BadJson(String),
}

pub type HighlightResult<T> = Result<T, HighlightError>;
