// error.rs - Error taxonomy for the montage client
use thiserror::Error;

/// Errors surfaced by the submission controller and job service.
///
/// `Validation` never reaches the network; `Submission` re-enables the form
/// with no automatic retry. Every error returned from a status check
/// (`StatusCheck`, `Transport`, `Decode`) is transient by policy: the poll
/// loop logs it and waits for the next tick. A backend-reported terminal
/// error status is not a variant here - it is surfaced through the UI as the
/// final job state.
#[derive(Error, Debug)]
pub enum MontageError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Submission(String),

    #[error("Server response successful, but task ID missing")]
    MissingTaskId,

    #[error("{0}")]
    StatusCheck(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
