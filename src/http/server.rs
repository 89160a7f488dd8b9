//! HTTP/HTTPS server startup logic.
//!
//! Dispatches on the configured TLS mode:
//! - None: Plain HTTP
//! - Inline: PEM key/certificate from the configuration file
//! - Manual: PEM key/certificate files read from disk

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;

use crate::config::{DevConfig, TlsConfig, TlsMode};

use super::redirect;
use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Failed to load TLS configuration: {0}")]
    TlsConfig(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// Start the dev server based on configuration.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &DevConfig) -> Result<(), ServerError> {
    let addr = config.server.bind_addr();
    let handle = Handle::new();

    match config.server.tls.mode {
        TlsMode::None => {
            tracing::info!(%addr, "Starting HTTP dev server (no TLS)");

            shutdown::setup_shutdown_handler(handle.clone());

            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .map_err(|e| ServerError::Server(e.to_string()))
        }
        TlsMode::Inline => start_inline_tls_server(app, config, handle).await,
        TlsMode::Manual => start_manual_tls_server(app, config, handle).await,
    }
}

/// Start HTTPS with PEM material embedded in the configuration.
async fn start_inline_tls_server(
    app: Router,
    config: &DevConfig,
    handle: Handle,
) -> Result<(), ServerError> {
    let addr = config.server.bind_addr();
    let tls = &config.server.tls;

    // Presence is validated at config load
    let key_pem = tls
        .key_pem
        .as_ref()
        .ok_or_else(|| ServerError::TlsConfig("Missing key_pem for inline mode".to_string()))?;
    let cert_pem = tls
        .cert_pem
        .as_ref()
        .ok_or_else(|| ServerError::TlsConfig("Missing cert_pem for inline mode".to_string()))?;

    tracing::info!(%addr, "Starting HTTPS dev server (inline certs)");

    let rustls_config = RustlsConfig::from_pem(
        cert_pem.clone().into_bytes(),
        key_pem.clone().into_bytes(),
    )
    .await
    .map_err(|e| ServerError::TlsConfig(format!("Invalid inline PEM material: {}", e)))?;

    shutdown::setup_shutdown_handler(handle.clone());
    spawn_redirect_if_enabled(tls, addr.port());

    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))
}

/// Start HTTPS with key/certificate files read from disk.
async fn start_manual_tls_server(
    app: Router,
    config: &DevConfig,
    handle: Handle,
) -> Result<(), ServerError> {
    let addr = config.server.bind_addr();
    let tls = &config.server.tls;

    // Presence is validated at config load
    let key_path = tls
        .key_path
        .as_ref()
        .ok_or_else(|| ServerError::TlsConfig("Missing key_path for manual mode".to_string()))?;
    let cert_path = tls
        .cert_path
        .as_ref()
        .ok_or_else(|| ServerError::TlsConfig("Missing cert_path for manual mode".to_string()))?;

    tracing::info!(%addr, cert = %cert_path, key = %key_path, "Starting HTTPS dev server (certs from disk)");

    // A missing or unreadable file fails startup here
    let rustls_config = RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|e| ServerError::TlsConfig(format!("Failed to load certificates: {}", e)))?;

    shutdown::setup_shutdown_handler(handle.clone());
    shutdown::setup_reload_handler(rustls_config.clone(), tls);
    spawn_redirect_if_enabled(tls, addr.port());

    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))
}

fn spawn_redirect_if_enabled(tls: &TlsConfig, https_port: u16) {
    if tls.redirect_http {
        redirect::spawn_redirect_server(tls.redirect_port, https_port);
    }
}
