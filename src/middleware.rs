//! Request tracing middleware.
//!
//! Tags every incoming request with a UUID v4 and wraps its processing in a
//! tracing span, so all logs emitted while serving an asset carry the same
//! request_id. The completion log records the response status and duration.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Request ID, available from request extensions in handlers.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Middleware that tags requests and logs their completion.
///
/// Mount as the outermost layer so the span covers the plugin pipeline and
/// header layers as well as the handler itself.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    request.extensions_mut().insert(RequestId(request_id));

    let start = Instant::now();
    async move {
        let response = next.run(request).await;

        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request served"
        );

        response
    }
    .instrument(span)
    .await
}
