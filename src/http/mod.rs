//! HTTP server module with TLS support.
//!
//! The dev server runs in three modes:
//! - **none (default)**: Plain HTTP on the dev port
//! - **inline**: HTTPS with PEM material embedded in the configuration
//! - **manual**: HTTPS with key/certificate files read from disk
//!
//! The server includes:
//! - HTTP to HTTPS redirect (when TLS enabled)
//! - Graceful shutdown on SIGTERM/SIGINT
//! - Certificate hot-reload via SIGHUP (manual mode)

mod redirect;
mod server;
mod shutdown;
pub mod static_files;

pub use server::{start_server, ServerError};
