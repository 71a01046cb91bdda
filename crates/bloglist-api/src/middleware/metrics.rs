//! Metrics tracking middleware
//!
//! Tracks request latency, counts, and status codes for Prometheus metrics
//!
//! Author: hephaex@gmail.com

use crate::state::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use lazy_static::lazy_static;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;

/// Endpoint label for requests no route matched
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

lazy_static! {
    /// Process-wide registry served at `/metrics`
    pub static ref REGISTRY: Registry = Registry::new();

    static ref HTTP_REQUESTS: IntCounterVec = {
        let counter = IntCounterVec::new(
            Opts::new(
                "bloglist_http_requests_total",
                "HTTP requests by endpoint and status",
            ),
            &["method", "endpoint", "status"],
        )
        .expect("metric options are valid");
        REGISTRY
            .register(Box::new(counter.clone()))
            .expect("metric registered once");
        counter
    };

    static ref HTTP_LATENCY: HistogramVec = {
        let histogram = HistogramVec::new(
            HistogramOpts::new(
                "bloglist_http_request_duration_seconds",
                "HTTP request latency by endpoint",
            ),
            &["method", "endpoint"],
        )
        .expect("metric options are valid");
        REGISTRY
            .register(Box::new(histogram.clone()))
            .expect("metric registered once");
        histogram
    };
}

/// Metrics tracking middleware
///
/// Records:
/// - Request count per endpoint and status
/// - Request latency distribution
pub async fn metrics_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = method_label(request.method());
    let endpoint = endpoint_label(request.extensions().get::<MatchedPath>());

    let response = next.run(request).await;

    state.increment_requests();
    let status = response.status().as_u16().to_string();
    HTTP_REQUESTS
        .with_label_values(&[method, endpoint.as_str(), status.as_str()])
        .inc();
    HTTP_LATENCY
        .with_label_values(&[method, endpoint.as_str()])
        .observe(start.elapsed().as_secs_f64());

    response
}

/// Render every registered metric in the Prometheus text format
pub fn render() -> Result<String, prometheus::Error> {
    // Touch the lazies so they appear before the first request
    lazy_static::initialize(&HTTP_REQUESTS);
    lazy_static::initialize(&HTTP_LATENCY);

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Route template such as `/api/blogs/:id`, never the raw path
fn endpoint_label(matched: Option<&MatchedPath>) -> String {
    matched
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_string())
}

fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}
