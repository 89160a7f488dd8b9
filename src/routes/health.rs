//! Health check endpoint.
//!
//! Provides a simple liveness probe that returns 200 OK when the process is
//! running. Useful for editor tooling and scripts that wait for the dev
//! server to come up.

/// Health check handler.
///
/// Returns a simple "ok" response to indicate the server is running.
pub async fn health() -> &'static str {
    "ok"
}
