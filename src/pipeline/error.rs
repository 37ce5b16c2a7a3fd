//! Unrecoverable per-request failures.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// A stage failed; the request gets no descriptor.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A scripted status that cannot be put on the status line.
    #[error("invalid status code: {0:?}")]
    InvalidStatus(String),

    /// The request payload could not be drained.
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONNECTION, "close")],
            self.to_string(),
        )
            .into_response()
    }
}
