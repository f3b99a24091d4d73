use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Handle used to render the /metrics endpoint.
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install the Prometheus recorder. When disabled (or on install failure)
/// metric macros stay no-ops and request handling is unaffected.
pub fn init_metrics(enabled: bool) -> Option<PrometheusMetrics> {
    if !enabled {
        tracing::info!("metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(PrometheusMetrics {
            handle: Arc::new(handle),
        }),
        Err(e) => {
            tracing::error!(error = %e, "failed to install metrics recorder");
            None
        }
    }
}

/// Record request count and elapsed time for every route.
pub async fn track_http(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    record_http_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_without_recorder_is_a_noop() {
        // No recorder installed in tests; emission must never panic or fail.
        record_http_request("GET", "/healthz", 200, Duration::from_millis(3));
        record_http_request("POST", "/v1/user", 400, Duration::from_millis(12));
    }
}
