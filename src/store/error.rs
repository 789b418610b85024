use thiserror::Error;

/// Failure talking to a document store, search service or other collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach the service at all
    #[error("service unreachable: {0}")]
    Unreachable(String),
    /// The service answered, but refused the request
    #[error("service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The service answered with data we could not decode
    #[error("malformed data: {0}")]
    Malformed(String),
}

impl StoreError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unreachable(err.to_string())
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::rejected(
                err.status().map(|s| s.as_u16()).unwrap_or(0),
                err.to_string(),
            )
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::Unreachable(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::Malformed(err.to_string())
            }
            other => Self::rejected(0, other.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
