//! Fallback chain composing resolvers into one request handler.
//!
//! Each resolver is turned into a [`tower::Layer`] that wraps the next handler.
//! Per request, the wrapped service asks its resolver about the path:
//!
//! - **Match**: respond `302 Found` with `Location` set to the destination
//! - **No match**: pass the request, unchanged, to the next handler
//! - **Failure**: pass through or answer `502`, per [`FailurePolicy`]
//!
//! The chain is built by folding right to left over a terminal handler, so the
//! first resolver given is the outermost one and wins on overlapping paths:
//!
//! ```text
//! store -> yaml -> static map -> default handler
//! ```

use crate::domain::{Resolution, Resolver};
use crate::error::AppError;
use crate::infrastructure::persistence::ServingStore;
use crate::infrastructure::resolvers::{
    ConfigParseError, StaticMapResolver, StoreResolver, yaml_resolver,
};
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::util::BoxCloneSyncService;
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Type-erased request handler: a link of the chain or its terminal.
pub type RequestHandler = BoxCloneSyncService<Request, Response, Infallible>;

/// What a resolver layer does when its resolver reports a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Treat the failure like a miss and try the next handler.
    #[default]
    PassThrough,
    /// Answer `502 Bad Gateway` (JSON error body) without consulting the rest of the chain.
    BadGateway,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pass-through" | "passthrough" => Ok(Self::PassThrough),
            "bad-gateway" | "502" => Ok(Self::BadGateway),
            other => Err(format!(
                "expected 'pass-through' or 'bad-gateway', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PassThrough => write!(f, "pass-through"),
            Self::BadGateway => write!(f, "bad-gateway"),
        }
    }
}

/// Layer wrapping a handler with one resolver.
#[derive(Clone)]
pub struct ResolverLayer {
    resolver: Arc<dyn Resolver>,
    policy: FailurePolicy,
}

impl ResolverLayer {
    pub fn new(resolver: Arc<dyn Resolver>, policy: FailurePolicy) -> Self {
        Self { resolver, policy }
    }
}

impl<S> Layer<S> for ResolverLayer {
    type Service = ResolverService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ResolverService {
            resolver: self.resolver.clone(),
            policy: self.policy,
            inner,
        }
    }
}

/// A resolver in front of the next handler.
#[derive(Clone)]
pub struct ResolverService<S> {
    resolver: Arc<dyn Resolver>,
    policy: FailurePolicy,
    inner: S,
}

impl<S> Service<Request> for ResolverService<S>
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let resolver = self.resolver.clone();
        let policy = self.policy;
        // The ready service handles this request; a fresh clone stays behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let path = req.uri().path().to_owned();
            let name = resolver.name();

            match resolver.resolve(&path).await {
                Resolution::Match(destination) => match found(&destination) {
                    Some(response) => return Ok(response),
                    None => warn!(
                        resolver = name,
                        "Destination for {} is not a valid Location header, passing through",
                        path
                    ),
                },
                Resolution::NoMatch => {
                    debug!(resolver = name, "No match for {}, passing through", path);
                }
                Resolution::Failure(reason) => match policy {
                    FailurePolicy::PassThrough => {
                        warn!(resolver = name, "Lookup of {} failed ({}), passing through", path, reason);
                    }
                    FailurePolicy::BadGateway => {
                        warn!(resolver = name, "Lookup of {} failed ({}), answering 502", path, reason);
                        return Ok(AppError::bad_gateway(
                            "Redirect source unavailable",
                            json!({ "resolver": name }),
                        )
                        .into_response());
                    }
                },
            }

            inner.call(req).await
        })
    }
}

/// `302 Found` to `destination`, or `None` if it cannot be sent as a header.
fn found(destination: &str) -> Option<Response> {
    let location = HeaderValue::try_from(destination).ok()?;
    Some((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Wraps `next` with a single resolver.
pub fn resolver_handler(
    resolver: Arc<dyn Resolver>,
    policy: FailurePolicy,
    next: RequestHandler,
) -> RequestHandler {
    RequestHandler::new(ResolverLayer::new(resolver, policy).layer(next))
}

/// Handler redirecting the paths of `paths_to_urls`, delegating everything else to `next`.
pub fn map_handler(paths_to_urls: HashMap<String, String>, next: RequestHandler) -> RequestHandler {
    resolver_handler(
        Arc::new(StaticMapResolver::new(paths_to_urls)),
        FailurePolicy::PassThrough,
        next,
    )
}

/// Handler over a YAML document.
///
/// On a parse error the handler is still returned (it passes every request to
/// `next`) together with the error.
pub fn yaml_handler(
    document: &[u8],
    next: RequestHandler,
) -> (RequestHandler, Option<ConfigParseError>) {
    let (resolver, error) = yaml_resolver(document);
    let handler = resolver_handler(Arc::new(resolver), FailurePolicy::PassThrough, next);
    (handler, error)
}

/// Handler reading from the serving store.
pub fn store_handler(
    store: ServingStore,
    policy: FailurePolicy,
    next: RequestHandler,
) -> RequestHandler {
    resolver_handler(Arc::new(StoreResolver::new(store)), policy, next)
}

/// Folds `resolvers` right to left over `terminal`.
///
/// `resolvers[0]` becomes the outermost link and is consulted first.
pub fn build_chain(
    resolvers: Vec<Arc<dyn Resolver>>,
    policy: FailurePolicy,
    terminal: RequestHandler,
) -> RequestHandler {
    resolvers
        .into_iter()
        .rev()
        .fold(terminal, |next, resolver| {
            resolver_handler(resolver, policy, next)
        })
}

/// Wires the production chain: store, then YAML document, then the built-in
/// static map, then `terminal`.
///
/// The YAML parse error, if any, is returned next to the handler.
pub fn standard_chain(
    store: ServingStore,
    document: &[u8],
    policy: FailurePolicy,
    terminal: RequestHandler,
) -> (RequestHandler, Option<ConfigParseError>) {
    let (yaml, parse_error) = yaml_resolver(document);

    let resolvers: Vec<Arc<dyn Resolver>> = vec![
        Arc::new(StoreResolver::new(store)),
        Arc::new(yaml),
        Arc::new(StaticMapResolver::defaults()),
    ];

    (build_chain(resolvers, policy, terminal), parse_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockResolver;
    use axum::body::{Body, to_bytes};
    use axum::http::Method;
    use tower::ServiceExt;

    /// Terminal echoing the method and path it received.
    fn echo_terminal() -> RequestHandler {
        RequestHandler::new(tower::service_fn(|req: Request| async move {
            let body = format!("{} {}", req.method(), req.uri().path());
            Ok::<_, Infallible>((StatusCode::IM_A_TEAPOT, body).into_response())
        }))
    }

    fn mock(name: &'static str, outcome: Resolution) -> Arc<dyn Resolver> {
        let mut resolver = MockResolver::new();
        resolver.expect_name().return_const(name);
        resolver
            .expect_resolve()
            .returning(move |_| outcome.clone());
        Arc::new(resolver)
    }

    fn never_called(name: &'static str) -> Arc<dyn Resolver> {
        let mut resolver = MockResolver::new();
        resolver.expect_name().return_const(name);
        resolver.expect_resolve().never();
        Arc::new(resolver)
    }

    fn request(method: Method, path: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_match_redirects_with_found() {
        let handler = resolver_handler(
            mock("m", Resolution::Match("https://x.test".to_string())),
            FailurePolicy::PassThrough,
            echo_terminal(),
        );

        let response = handler.oneshot(request(Method::GET, "/a")).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://x.test");
    }

    #[tokio::test]
    async fn test_no_match_delegates_request_unchanged() {
        let handler = resolver_handler(
            mock("m", Resolution::NoMatch),
            FailurePolicy::PassThrough,
            echo_terminal(),
        );

        let response = handler
            .oneshot(request(Method::POST, "/b?q=1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(body_text(response).await, "POST /b");
    }

    #[tokio::test]
    async fn test_resolver_sees_path_without_query() {
        let mut resolver = MockResolver::new();
        resolver.expect_name().return_const("m");
        resolver
            .expect_resolve()
            .withf(|path| path == "/search")
            .times(1)
            .returning(|_| Resolution::NoMatch);

        let handler = resolver_handler(Arc::new(resolver), FailurePolicy::PassThrough, echo_terminal());
        handler
            .oneshot(request(Method::GET, "/search?q=rust"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failure_passes_through_by_default() {
        let handler = resolver_handler(
            mock("m", Resolution::Failure("disk on fire".to_string())),
            FailurePolicy::default(),
            echo_terminal(),
        );

        let response = handler.oneshot(request(Method::GET, "/a")).await.unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_failure_answers_bad_gateway_when_configured() {
        let handler = resolver_handler(
            mock("m", Resolution::Failure("disk on fire".to_string())),
            FailurePolicy::BadGateway,
            echo_terminal(),
        );

        let response = handler.oneshot(request(Method::GET, "/a")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert!(response.headers().get(header::LOCATION).is_none());

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["code"], "bad_gateway");
        assert_eq!(body["error"]["message"], "Redirect source unavailable");
        assert_eq!(body["error"]["details"]["resolver"], "m");
    }

    #[tokio::test]
    async fn test_unencodable_destination_passes_through() {
        let handler = resolver_handler(
            mock("m", Resolution::Match("https://x.test/\nbad".to_string())),
            FailurePolicy::PassThrough,
            echo_terminal(),
        );

        let response = handler.oneshot(request(Method::GET, "/a")).await.unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_outermost_match_short_circuits() {
        let chain = build_chain(
            vec![
                mock("outer", Resolution::Match("https://outer.test".to_string())),
                never_called("inner"),
            ],
            FailurePolicy::PassThrough,
            echo_terminal(),
        );

        let response = chain.oneshot(request(Method::GET, "/a")).await.unwrap();

        assert_eq!(response.headers()[header::LOCATION], "https://outer.test");
    }

    #[tokio::test]
    async fn test_chain_falls_forward_to_inner_match() {
        let chain = build_chain(
            vec![
                mock("outer", Resolution::NoMatch),
                mock("middle", Resolution::Failure("unavailable".to_string())),
                mock("inner", Resolution::Match("https://inner.test".to_string())),
            ],
            FailurePolicy::PassThrough,
            echo_terminal(),
        );

        let response = chain.oneshot(request(Method::GET, "/a")).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://inner.test");
    }

    #[tokio::test]
    async fn test_empty_chain_is_terminal() {
        let chain = build_chain(Vec::new(), FailurePolicy::PassThrough, echo_terminal());

        let response = chain.oneshot(request(Method::GET, "/x")).await.unwrap();

        assert_eq!(body_text(response).await, "GET /x");
    }

    #[tokio::test]
    async fn test_map_handler_scenario() {
        let mapping = HashMap::from([("/a".to_string(), "https://x.test".to_string())]);
        let handler = map_handler(mapping, echo_terminal());

        let response = handler
            .clone()
            .oneshot(request(Method::GET, "/a"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://x.test");

        let response = handler.oneshot(request(Method::GET, "/b")).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_yaml_handler_malformed_always_delegates() {
        let (handler, error) = yaml_handler(b"- path: [oops", echo_terminal());

        assert!(error.is_some());
        let response = handler.oneshot(request(Method::GET, "/oops")).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!(
            "pass-through".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::PassThrough
        );
        assert_eq!(
            "Bad-Gateway".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::BadGateway
        );
        assert!("retry".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::BadGateway.to_string(), "bad-gateway");
    }
}
