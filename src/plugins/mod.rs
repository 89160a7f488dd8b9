//! Plugin pipeline for served responses.
//!
//! Plugins are declared as ordered `[[plugin]]` entries in the configuration
//! and resolved by name through the registry in [`build_chain`]. Each plugin
//! is a response-transform hook: the heavy tooling (framework compiler, CSS
//! framework) runs outside this process, and plugins only prepare served
//! responses for it. The pipeline runs in declaration order.

mod react;
mod tailwind;

pub use react::ReactPlugin;
pub use tailwind::TailwindPlugin;

use axum::{
    body::{to_bytes, Body, HttpBody},
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{header, HeaderMap};

use crate::config::{ConfigError, PluginConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Largest response body the pipeline will buffer for rewriting.
/// Responses declaring a larger length skip the pipeline and stream through
/// untransformed.
const MAX_TRANSFORM_BYTES: usize = 8 * 1024 * 1024;

/// A response-transform hook applied to served assets.
pub trait DevPlugin: Send + Sync {
    /// Registry name, as written in `[[plugin]]` sections.
    fn name(&self) -> &'static str;

    /// Whether this plugin rewrites responses of the given content type.
    fn wants(&self, content_type: &str) -> bool;

    /// Rewrite the response. Receives the buffered body and may also adjust
    /// response headers.
    fn transform(&self, headers: &mut HeaderMap, body: Vec<u8>) -> Vec<u8>;
}

/// The resolved plugin pipeline, in configuration order.
pub struct PluginChain {
    plugins: Vec<Box<dyn DevPlugin>>,
}

impl std::fmt::Debug for PluginChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginChain")
            .field("plugins", &self.names())
            .finish()
    }
}

impl PluginChain {
    /// Plugin names in pipeline order.
    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run the pipeline over a response.
    ///
    /// The body is buffered only when at least one plugin claims the
    /// response's content type and the declared length fits the transform
    /// buffer; everything else streams through untouched.
    pub async fn rewrite(&self, response: Response) -> Result<Response, AppError> {
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .unwrap_or_default();

        if !self.plugins.iter().any(|p| p.wants(&content_type)) {
            return Ok(response);
        }

        // Serving the asset beats transforming it: anything too large to
        // buffer streams through untouched
        if let Some(len) = HttpBody::size_hint(response.body()).exact() {
            if len > MAX_TRANSFORM_BYTES as u64 {
                tracing::debug!(
                    len,
                    limit = MAX_TRANSFORM_BYTES,
                    content_type = %content_type,
                    "Response exceeds transform buffer, passing through"
                );
                return Ok(response);
            }
        }

        let (mut parts, body) = response.into_parts();
        let bytes = to_bytes(body, MAX_TRANSFORM_BYTES).await?;

        let mut buf = bytes.to_vec();
        for plugin in &self.plugins {
            if plugin.wants(&content_type) {
                tracing::debug!(
                    plugin = plugin.name(),
                    content_type = %content_type,
                    "Applying plugin transform"
                );
                buf = plugin.transform(&mut parts.headers, buf);
            }
        }

        // Transforms may change the body length
        parts.headers.remove(header::CONTENT_LENGTH);

        Ok(Response::from_parts(parts, Body::from(buf)))
    }
}

/// Resolve configured plugin entries into a pipeline.
///
/// Unknown names are a configuration error; the pipeline preserves the
/// declaration order of the `[[plugin]]` sections.
pub fn build_chain(configs: &[PluginConfig]) -> Result<PluginChain, ConfigError> {
    let mut plugins: Vec<Box<dyn DevPlugin>> = Vec::with_capacity(configs.len());

    for entry in configs {
        let plugin: Box<dyn DevPlugin> = match entry.name.as_str() {
            react::NAME => Box::new(ReactPlugin),
            tailwind::NAME => Box::new(TailwindPlugin),
            other => {
                return Err(ConfigError::Validation(format!(
                    "Unknown plugin '{}' (available: {}, {})",
                    other,
                    react::NAME,
                    tailwind::NAME
                )))
            }
        };

        tracing::info!(
            plugin = plugin.name(),
            position = plugins.len(),
            "Registered plugin"
        );
        plugins.push(plugin);
    }

    Ok(PluginChain { plugins })
}

/// Middleware that runs the plugin pipeline over outgoing responses.
pub async fn apply_transforms(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let response = next.run(request).await;
    state.plugins.rewrite(response).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DevConfig;

    #[test]
    fn default_chain_has_two_plugins_in_order() {
        let config = DevConfig::from_toml("").unwrap();
        let chain = build_chain(&config.plugins).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.names(), ["react", "tailwindcss"]);
    }

    #[test]
    fn configured_order_carries_into_chain() {
        let config =
            DevConfig::from_toml("[[plugin]]\nname = \"tailwindcss\"\n[[plugin]]\nname = \"react\"")
                .unwrap();
        let chain = build_chain(&config.plugins).unwrap();
        assert_eq!(chain.names(), ["tailwindcss", "react"]);
    }

    #[test]
    fn unknown_plugin_name_is_rejected() {
        let config = DevConfig::from_toml("[[plugin]]\nname = \"svelte\"").unwrap();
        let err = build_chain(&config.plugins).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[tokio::test]
    async fn untouched_content_types_pass_through() {
        let config = DevConfig::from_toml("").unwrap();
        let chain = build_chain(&config.plugins).unwrap();

        let response = Response::builder()
            .header(header::CONTENT_TYPE, "application/javascript")
            .body(Body::from("export const x = 1;"))
            .unwrap();
        let rewritten = chain.rewrite(response).await.unwrap();
        let body = to_bytes(rewritten.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"export const x = 1;");
    }

    #[tokio::test]
    async fn oversized_responses_pass_through_untransformed() {
        let config = DevConfig::from_toml("").unwrap();
        let chain = build_chain(&config.plugins).unwrap();

        let big = vec![b'a'; MAX_TRANSFORM_BYTES + 1];
        let len = big.len();
        let response = Response::builder()
            .header(header::CONTENT_TYPE, "text/css")
            .body(Body::from(big))
            .unwrap();
        let rewritten = chain.rewrite(response).await.unwrap();
        // Too large to buffer: served as-is, so no transform headers either
        assert!(rewritten.headers().get(header::CACHE_CONTROL).is_none());
        let body = to_bytes(rewritten.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.len(), len);
    }

    #[tokio::test]
    async fn html_responses_get_the_refresh_stub() {
        let config = DevConfig::from_toml("").unwrap();
        let chain = build_chain(&config.plugins).unwrap();

        let response = Response::builder()
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .header(header::CONTENT_LENGTH, "34")
            .body(Body::from("<html><head></head><body></body></html>"))
            .unwrap();
        let rewritten = chain.rewrite(response).await.unwrap();
        assert!(rewritten.headers().get(header::CONTENT_LENGTH).is_none());
        let body = to_bytes(rewritten.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("$RefreshReg$"));
    }
}
