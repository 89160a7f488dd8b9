//! focust-dev: a local development server for the Focust web client.
//!
//! Serves the built client assets over HTTP or HTTPS, runs an ordered plugin
//! pipeline over served responses, and applies the configured security
//! headers. Configuration comes from a TOML file with an explicitly selected
//! TLS mode (plain, inline PEM, or certificates from disk).

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod plugins;
pub mod routes;
pub mod state;

pub use error::AppError;
