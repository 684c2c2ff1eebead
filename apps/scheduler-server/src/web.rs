//! Process-wide HTTP plumbing: health probe, request ids, tracing, limits.

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware::{from_fn, Next},
    response::{Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::field::Empty;

use runtime::ServerConfig;

const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        Some(RequestId::new(id.parse().ok()?))
    }
}

/// Stores the request id in request extensions and records it on the current span.
async fn push_req_id_to_extensions(mut req: Request<Body>, next: Next) -> Response {
    let rid = req
        .headers()
        .get(request_id_header())
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| "n/a".to_string());

    req.extensions_mut().insert(XRequestId(rid.clone()));
    tracing::Span::current().record("request_id", tracing::field::display(&rid));

    next.run(req).await
}

fn request_span(req: &Request<Body>) -> tracing::Span {
    let rid = req
        .headers()
        .get(request_id_header())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("n/a");
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        uri = %req.uri().path(),
        version = ?req.version(),
        request_id = %rid,
        status = Empty,
        latency_ms = Empty
    )
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Add the health route and wrap `router` in the global middleware stack.
///
/// Outermost first: SetRequestId, PropagateRequestId, Trace, request id to
/// extensions, Timeout (when configured), CORS, BodyLimit. SetRequestId is
/// outermost so every inner layer sees the id.
pub fn finalize_router(router: Router, server: &ServerConfig) -> Router {
    let x_request_id = request_id_header();

    let mut router = router
        .route("/health", get(health_check))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(CorsLayer::permissive());

    if server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(server.timeout_sec)));
    }

    router
        .layer(from_fn(push_req_id_to_extensions))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeReqId))
}
