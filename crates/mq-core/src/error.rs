//! Unified error type for the marquee application.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`]
//! and a client-safe message via [`Error::public_message`].

/// Unified error type covering all failure modes in marquee.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request data failed validation (bad id, bad body field).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The movie provider answered with a non-success status, could not be
    /// reached, or returned a body that could not be decoded.
    #[error("Upstream error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream {
        /// HTTP status returned by the provider, if a response was received.
        status: Option<u16>,
        /// Human-readable error description.
        message: String,
    },

    /// One request of a concurrent fan-out failed, failing the whole group.
    #[error("Fan-out of {total} requests failed at movie {failed}: {source}")]
    Aggregate {
        /// The movie id whose fetch failed first.
        failed: u64,
        /// Number of requests in the group.
        total: usize,
        /// The failure of the individual request.
        source: Box<Error>,
    },

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    ///
    /// Upstream failures forward the provider's status when one was received
    /// and it is an error status; fan-out failures report the status of the
    /// item that failed.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Upstream { status, .. } => status
                .filter(|s| (400..=599).contains(s))
                .unwrap_or(500),
            Error::Aggregate { source, .. } => source.http_status(),
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Message that is safe to hand to API clients.
    ///
    /// Validation messages are returned verbatim; upstream and fan-out
    /// failures collapse into one generic message so individual provider
    /// failures are not distinguished to the caller.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::Upstream { .. } | Error::Aggregate { .. } => {
                "Movie provider request failed".to_string()
            }
            Error::Database { .. } | Error::Io { .. } | Error::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// The canonical rejection for anything that is not a usable movie id.
    pub fn invalid_id() -> Self {
        Error::Validation("Invalid id".into())
    }

    /// Convenience constructor for [`Error::Upstream`].
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
