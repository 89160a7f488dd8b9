//! Graceful shutdown and signal handling.
//!
//! Handles:
//! - SIGTERM/SIGINT: Graceful shutdown with connection draining
//! - SIGHUP: Certificate reload (manual TLS mode only)

use std::time::Duration;

use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;

use crate::config::TlsConfig;

/// Drain window for in-flight requests during shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Setup graceful shutdown on SIGTERM and SIGINT.
///
/// When either signal is received, the server stops accepting connections,
/// waits for in-flight requests up to the drain window, and exits.
pub fn setup_shutdown_handler(handle: Handle) {
    tokio::spawn(async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }

        handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        tracing::info!(
            grace_secs = SHUTDOWN_GRACE.as_secs(),
            "Graceful shutdown initiated"
        );
    });
}

/// Setup SIGHUP handler for certificate reload.
///
/// Only manual mode has files to re-read, so configurations without both
/// paths get no handler. On SIGHUP the key and certificate are re-read from
/// disk without restarting the server; a failed reload keeps the previous
/// certificates.
#[cfg(unix)]
pub fn setup_reload_handler(rustls: RustlsConfig, tls: &TlsConfig) {
    let (Some(cert_path), Some(key_path)) = (tls.cert_path.clone(), tls.key_path.clone()) else {
        return;
    };

    tokio::spawn(async move {
        let mut sighup = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())
            .expect("Failed to install SIGHUP handler");

        while sighup.recv().await.is_some() {
            tracing::info!(cert = %cert_path, key = %key_path, "SIGHUP: reloading TLS certificates");

            if let Err(e) = rustls.reload_from_pem_file(&cert_path, &key_path).await {
                tracing::error!(error = %e, "Certificate reload failed, keeping previous certificates");
            } else {
                tracing::info!("TLS certificates reloaded");
            }
        }
    });
}

/// No-op reload handler for non-Unix platforms.
#[cfg(not(unix))]
pub fn setup_reload_handler(_rustls: RustlsConfig, _tls: &TlsConfig) {
    tracing::warn!("Certificate hot-reload via SIGHUP not supported on this platform");
}
