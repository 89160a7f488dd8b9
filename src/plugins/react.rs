//! React framework plugin.
//!
//! The framework compiler itself runs outside this process; what served pages
//! need from the dev server is the refresh runtime globals that compiled dev
//! modules call into. This plugin injects a stub for those globals into every
//! HTML document, ahead of any module scripts.

use http::HeaderMap;

use super::DevPlugin;

pub const NAME: &str = "react";

/// Inline stub for the react-refresh globals referenced by dev builds.
const REFRESH_RUNTIME_STUB: &str = "<script>window.$RefreshReg$ = function () {}; \
window.$RefreshSig$ = function () { return function (type) { return type; }; };</script>";

/// Injects the refresh runtime stub into served HTML documents.
pub struct ReactPlugin;

impl DevPlugin for ReactPlugin {
    fn name(&self) -> &'static str {
        NAME
    }

    fn wants(&self, content_type: &str) -> bool {
        content_type.starts_with("text/html")
    }

    fn transform(&self, _headers: &mut HeaderMap, body: Vec<u8>) -> Vec<u8> {
        match String::from_utf8(body) {
            Ok(html) => inject_into_head(&html).into_bytes(),
            // Mislabeled binary content, leave it alone
            Err(e) => e.into_bytes(),
        }
    }
}

/// Insert the stub just before `</head>`, falling back to the top of the
/// document when no head element is present.
fn inject_into_head(html: &str) -> String {
    let lowered = html.to_ascii_lowercase();
    match lowered.find("</head>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + REFRESH_RUNTIME_STUB.len());
            out.push_str(&html[..pos]);
            out.push_str(REFRESH_RUNTIME_STUB);
            out.push_str(&html[pos..]);
            out
        }
        None => format!("{}{}", REFRESH_RUNTIME_STUB, html),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_lands_before_closing_head() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        let out = inject_into_head(html);
        let stub_pos = out.find("$RefreshReg$").unwrap();
        let head_pos = out.find("</head>").unwrap();
        assert!(stub_pos < head_pos);
    }

    #[test]
    fn headless_documents_get_the_stub_prepended() {
        let out = inject_into_head("<p>hello</p>");
        assert!(out.starts_with("<script>"));
        assert!(out.ends_with("<p>hello</p>"));
    }

    #[test]
    fn uppercase_head_tag_is_found() {
        let out = inject_into_head("<HTML><HEAD></HEAD><BODY></BODY></HTML>");
        let stub_pos = out.find("$RefreshReg$").unwrap();
        let head_pos = out.find("</HEAD>").unwrap();
        assert!(stub_pos < head_pos);
    }

    #[test]
    fn wants_only_html() {
        let plugin = ReactPlugin;
        assert!(plugin.wants("text/html; charset=utf-8"));
        assert!(!plugin.wants("text/css"));
        assert!(!plugin.wants("application/javascript"));
    }
}
