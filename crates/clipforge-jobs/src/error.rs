use thiserror::Error;

/// Errors surfaced by the Job Manager's public contract. Worker-internal
/// failures are recorded on the `Job` itself as a terminal state instead;
/// this enum is only for failures the caller of `submit`/`status`/
/// `download`/`inline` needs to react to directly.
#[derive(Debug, Error)]
pub enum JobsError {
    #[error("required external dependency unavailable: {0}")]
    UnavailableDependency(String),

    #[error("invalid request: {0}")]
    InvalidInput(#[from] clipforge_models::ModelsError),

    #[error(transparent)]
    Media(#[from] clipforge_media::MediaError),

    #[error("no job found for id '{0}'")]
    NotFound(String),

    #[error("job '{0}' is not ready: {1}")]
    NotReady(String, &'static str),
}

pub type JobsResult<T> = Result<T, JobsError>;
