//! Static serving of the built client assets.
//!
//! Serves files from the configured asset root. Unknown paths fall back to
//! the index document so client-side routes resolve after a full page load
//! (single-page-app behavior).

use tower_http::services::{ServeDir, ServeFile};

use crate::config::AssetConfig;

/// Create the asset file service with SPA index fallback.
///
/// Requests that match a file under the asset root are served directly;
/// anything else gets the index document, leaving routing to the client.
pub fn asset_service(assets: &AssetConfig) -> ServeDir<ServeFile> {
    ServeDir::new(&assets.root).fallback(ServeFile::new(assets.index_path()))
}
