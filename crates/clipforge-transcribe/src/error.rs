use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("speech-to-text model is unavailable: {0}")]
    ModelUnavailable(String),

    #[error("audio extraction failed: {0}")]
    Media(#[from] clipforge_media::MediaError),

    #[error("speech-to-text request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("speech-to-text http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unparseable speech-to-text response: {0}")]
    BadResponse(String),
}

impl TranscribeError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TranscribeError::Timeout(_) | TranscribeError::Http(_))
    }
}

pub type TranscribeResult<T> = Result<T, TranscribeError>;
