//! Request logging for the router and the redirect chain behind it.

use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// `TraceLayer` applied around the whole router.
///
/// The span is opened before routing, so resolver logs (`debug!` on a match or
/// pass-through, `warn!` on a store failure) are nested inside the span of the
/// request that triggered them, and the closing line carries the final status:
/// `302` for a redirect, `200` for the greeting, `502` when the store failure
/// policy answers.
///
/// ```text
/// INFO request{method=GET uri=/urlshort-bolt version=HTTP/1.1}: finished processing request latency=0 ms status=302
/// DEBUG request{method=GET uri=/docs version=HTTP/1.1}: urlshort::application::chain: No match for /docs, passing through resolver="store"
/// INFO request{method=GET uri=/docs version=HTTP/1.1}: finished processing request latency=0 ms status=200
/// ```
///
/// Query strings show up in `uri` but never take part in resolution.
pub fn layer()
-> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
