//! Error types for the HTTP server.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use inkpost_render::{RenderError, ResolveError, ShellError};

/// Failure while rendering a page the server owns.
///
/// Converted into a 500 response. The server keeps running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Template could not be resolved.
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    /// Resolved template failed to render.
    #[error("{0}")]
    Render(#[from] RenderError),

    /// Page shell could not be read or filled in.
    #[error("{0}")]
    Shell(#[from] ShellError),

    /// Rendering task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Internal Server Error\n\n{self}"),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_is_internal() {
        let response = ServerError::Shell(ShellError::MissingMarker).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
