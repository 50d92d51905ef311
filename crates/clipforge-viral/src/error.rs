use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViralError {
    #[error("clip transcript is empty, cannot score")]
    EmptyTranscript,
}

pub type ViralResult<T> = Result<T, ViralError>;
