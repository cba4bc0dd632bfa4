//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in
//! middleware (push model). Domain-level gauges (users by role,
//! submissions by status, total votes) are updated on each `/metrics`
//! scrape (pull model) — see the metrics handler in `lib.rs`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    core::Collector, Encoder, GaugeVec, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // -- HTTP middleware metrics (push model) --
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // -- Domain gauges (pull model, updated on /metrics scrape) --
    users_total: GaugeVec,
    submissions_total: GaugeVec,
    votes_total: prometheus::Gauge,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("court_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "court_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let http_errors_total = IntCounterVec::new(
            Opts::new("court_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let users_total = GaugeVec::new(
            Opts::new("court_users_total", "Registered users by role"),
            &["role"],
        )
        .expect("metric can be created");

        let submissions_total = GaugeVec::new(
            Opts::new("court_submissions_total", "Case submissions by status"),
            &["status"],
        )
        .expect("metric can be created");

        let votes_total =
            prometheus::Gauge::new("court_votes_total", "Total votes in the ledger")
                .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_errors_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(users_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(submissions_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(votes_total.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                users_total,
                submissions_total,
                votes_total,
            }),
        }
    }

    /// Current total request count (sum across all labels).
    pub fn requests(&self) -> u64 {
        let mut total = 0u64;
        for mf in &self.inner.http_requests_total.collect() {
            for m in mf.get_metric() {
                total += m.get_counter().get_value() as u64;
            }
        }
        total
    }

    /// Current total error count (sum across all labels).
    pub fn errors(&self) -> u64 {
        let mut total = 0u64;
        for mf in &self.inner.http_errors_total.collect() {
            for m in mf.get_metric() {
                total += m.get_counter().get_value() as u64;
            }
        }
        total
    }

    /// Record an HTTP request (called by the middleware).
    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();

        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);

        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    // -- Domain gauge accessors (used by the /metrics handler) --

    /// Access the users-by-role gauge for updating.
    pub fn users_total(&self) -> &GaugeVec {
        &self.inner.users_total
    }

    /// Access the submissions-by-status gauge for updating.
    pub fn submissions_total(&self) -> &GaugeVec {
        &self.inner.submissions_total
    }

    /// Access the total votes gauge for updating.
    pub fn votes_total(&self) -> &prometheus::Gauge {
        &self.inner.votes_total
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer)
            .map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a request path into its route template.
///
/// Prevents cardinality explosion in Prometheus labels: numeric id
/// segments become `{id}`, and the free-form trailing segments of the
/// name-search and jury routes become their template parameter.
fn normalize_path(path: &str) -> String {
    for (prefix, template) in [
        ("/case/by-name/", "/case/by-name/{name}"),
        ("/jury/vote/", "/jury/vote/{case_id}"),
        ("/jury/results/", "/jury/results/{case_id}"),
    ] {
        if path.len() > prefix.len() && path.starts_with(prefix) {
            return template.to_string();
        }
    }
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware that records HTTP request metrics via Prometheus.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        let status = response.status().as_u16();
        m.record_request(&method, &path, status, duration);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_metrics_new_starts_at_zero() {
        let m = ApiMetrics::new();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn requests_increments() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/case/all", 200, 0.01);
        assert_eq!(m.requests(), 1);
        m.record_request("POST", "/case/submit", 201, 0.02);
        m.record_request("GET", "/case/all", 200, 0.005);
        assert_eq!(m.requests(), 3);
    }

    #[test]
    fn errors_increment_on_4xx_and_5xx() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/case/all", 500, 0.1);
        m.record_request("GET", "/case/all", 403, 0.05);
        m.record_request("GET", "/case/all", 200, 0.05);
        assert_eq!(m.errors(), 2);
        assert_eq!(m.requests(), 3);
    }

    #[test]
    fn normalize_replaces_numeric_ids() {
        assert_eq!(normalize_path("/case/edit/123"), "/case/edit/{id}");
        assert_eq!(normalize_path("/case/delete/9999"), "/case/delete/{id}");
        assert_eq!(normalize_path("/case/all"), "/case/all");
    }

    #[test]
    fn normalize_templates_free_form_segments() {
        assert_eq!(normalize_path("/case/by-name/Smith"), "/case/by-name/{name}");
        assert_eq!(normalize_path("/jury/vote/CASE-1"), "/jury/vote/{case_id}");
        assert_eq!(normalize_path("/jury/results/CASE-1"), "/jury/results/{case_id}");
    }

    #[test]
    fn gather_and_encode_produces_text_format() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/case/all", 200, 0.01);
        let text = m.gather_and_encode().unwrap();
        assert!(text.contains("court_http_requests_total"));
    }
}
