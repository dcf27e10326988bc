use thiserror::Error;

/// Failure kinds for the scheduling resolvers. All of these are local and
/// non-fatal: the caller decides whether to retry with clarified input,
/// apply a default, or surface the message to the end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("could not make sense of scheduling phrase: \"{0}\"")]
    UnrecognizedPhrase(String),

    #[error("phrase \"{0}\" has no explicit time and no time-of-day keyword")]
    MissingTime(String),

    #[error("unknown timezone: \"{0}\"")]
    InvalidTimezone(String),

    #[error("could not make sense of duration: \"{0}\"")]
    UnrecognizedDuration(String),

    #[error("no contact matched \"{0}\"")]
    ContactNotFound(String),
}
