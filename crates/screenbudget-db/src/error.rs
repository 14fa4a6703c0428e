use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("UUID error: {0}")]
    Uuid(#[from] uuid::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Promote storage failures into the caller-visible taxonomy. NotFound and
/// Duplicate keep their identity; everything else is an opaque storage
/// fault.
impl From<DbError> for screenbudget_common::Error {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => screenbudget_common::Error::NotFound(msg),
            DbError::Duplicate(msg) => screenbudget_common::Error::AlreadyExists(msg),
            DbError::InvalidData(msg) => screenbudget_common::Error::InvalidArgument(msg),
            other => screenbudget_common::Error::Storage(other.to_string()),
        }
    }
}
