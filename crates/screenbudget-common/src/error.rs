use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Caller-visible failure taxonomy. `NotFound`, `InvalidArgument` and
/// `AlreadyExists` stay distinct so a transport layer can map them to
/// specific status codes. `Upstream` is absorbed inside challenge
/// generation and never reaches callers of `generate`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("upstream unavailable: {0}")]
    Upstream(String),

    #[error("storage error: {0}")]
    Storage(String),
}
