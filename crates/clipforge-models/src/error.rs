use thiserror::Error;

/// Errors raised while validating or normalizing a request at the model
/// boundary, before any I/O is attempted.
#[derive(Debug, Error)]
pub enum ModelsError {
    #[error("unknown quality '{0}'")]
    InvalidQuality(String),

    #[error("unknown platform '{0}'")]
    InvalidPlatform(String),

    #[error("malformed video url '{0}'")]
    InvalidUrl(String),
}
