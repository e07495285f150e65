//! Error-to-HTTP response conversion.
//!
//! Wraps [`mq_core::Error`] so route handlers can return
//! `Result<T, AppError>` and have failures rendered as
//! `{"error": ..., "code": ..., "request_id": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::middleware::request_id::RequestId;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: mq_core::Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: mq_core::Error) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: &RequestId) -> Self {
        self.request_id = Some(id.as_str().to_string());
        self
    }
}

impl From<mq_core::Error> for AppError {
    fn from(e: mq_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        let code = match &self.inner {
            mq_core::Error::Validation(_) => "validation_error",
            mq_core::Error::Upstream { .. } => "upstream_error",
            mq_core::Error::Aggregate { .. } => "upstream_error",
            mq_core::Error::Database { .. } => "database_error",
            mq_core::Error::Io { .. } => "io_error",
            mq_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.public_message(),
            "code": code,
            "request_id": self.request_id,
        });

        (status, axum::Json(body)).into_response()
    }
}
