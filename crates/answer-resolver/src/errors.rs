use thiserror::Error;

/// Failures from the generative completion service.
///
/// All of these are treated as best-effort misses by the resolver; none of
/// them ever fail an application attempt.
#[derive(Debug, Error)]
pub enum CompleterError {
    #[error("completion request timed out")]
    Timeout,

    #[error("completion transport error: {0}")]
    Transport(String),

    #[error("completion response was malformed: {0}")]
    Malformed(String),
}
