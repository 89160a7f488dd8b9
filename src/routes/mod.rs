//! Router assembly for the dev server.
//!
//! The router is mostly a static file service over the built client assets,
//! wrapped by the plugin pipeline and the configured response headers. The
//! Strict-Transport-Security header is applied whenever TLS is active;
//! user-configured headers of the same name take precedence.
//!
//! Request tracing is enabled via middleware that generates a unique request
//! ID for each incoming request.

pub mod health;

use axum::{middleware, routing::get, Router};
use http::header::{self, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{ConfigError, HSTS_HEADER_VALUE};
use crate::http::static_files::asset_service;
use crate::middleware::request_id_layer;
use crate::plugins::apply_transforms;
use crate::state::AppState;

/// Creates the router: health endpoint, asset service with the plugin
/// pipeline, configured response headers, and request tracing.
pub fn create_router(state: AppState) -> Result<Router, ConfigError> {
    // Assets go through the plugin pipeline; /health does not
    let asset_routes = Router::new()
        .fallback_service(asset_service(&state.config.assets))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            apply_transforms,
        ));

    let mut app = Router::new()
        .route("/health", get(health::health))
        .merge(asset_routes);

    // Extra headers first so they win over the HSTS default below
    for (name, value) in state.config.server.header_pairs()? {
        app = app.layer(SetResponseHeaderLayer::if_not_present(name, value));
    }

    if state.config.server.tls.mode.enabled() {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_HEADER_VALUE),
        ));
    }

    // Request ID middleware - creates root span with request_id for correlation
    Ok(app.layer(middleware::from_fn(request_id_layer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DevConfig;
    use crate::plugins::build_chain;

    fn state_from(toml: &str) -> AppState {
        let config = DevConfig::from_toml(toml).unwrap();
        let chain = build_chain(&config.plugins).unwrap();
        AppState::new(config, chain)
    }

    #[test]
    fn router_builds_for_plain_config() {
        let state = state_from("");
        assert!(create_router(state).is_ok());
    }

    #[test]
    fn router_builds_with_headers_and_tls() {
        let state = state_from(
            r#"
            [server.tls]
            mode = "manual"
            key_path = "/etc/ssl/certs/focust-react-client.key"
            cert_path = "/etc/ssl/certs/focust-react-client.crt"

            [server.headers]
            "X-Frame-Options" = "DENY"
            "#,
        );
        assert!(create_router(state).is_ok());
    }
}
