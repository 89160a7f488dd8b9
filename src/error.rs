//! Request-path error type.
//!
//! Startup failures have their own error types (`ConfigError`, `ServerError`);
//! this covers failures while serving a request, currently limited to the
//! plugin pipeline buffering a response body.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to buffer response body: {0}")]
    Body(#[from] axum::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Internal error: {:?}", self);

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {}</title>
</head>
<body>
    <h1>Error {}</h1>
    <p>Internal server error</p>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16()
        );

        (status, Html(body)).into_response()
    }
}
