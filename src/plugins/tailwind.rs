//! Tailwind CSS plugin.
//!
//! The CSS framework's watcher regenerates the stylesheet on disk while the
//! dev server runs. Browsers must never cache stylesheet responses, or edits
//! would not show up until a hard reload, so this plugin marks every CSS
//! response `Cache-Control: no-store`.

use http::{header, HeaderMap, HeaderValue};

use super::DevPlugin;

pub const NAME: &str = "tailwindcss";

/// Forces CSS responses to be re-fetched on every load.
pub struct TailwindPlugin;

impl DevPlugin for TailwindPlugin {
    fn name(&self) -> &'static str {
        NAME
    }

    fn wants(&self, content_type: &str) -> bool {
        content_type.starts_with("text/css")
    }

    fn transform(&self, headers: &mut HeaderMap, body: Vec<u8>) -> Vec<u8> {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        body
    }
}
