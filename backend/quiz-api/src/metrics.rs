use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Upstream Metrics (spreadsheet data source)
    pub static ref UPSTREAM_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "upstream_operations_total",
        "Total number of upstream data source operations",
        &["operation", "status"]
    )
    .unwrap();

    pub static ref UPSTREAM_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "upstream_operation_duration_seconds",
        "Upstream data source operation duration in seconds",
        &["operation"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Cache Metrics
    pub static ref QUESTIONS_CACHE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "questions_cache_total",
        "Questions cache lookups by result",
        &["result"]
    )
    .unwrap();

    // Business Metrics
    pub static ref ANSWERS_RECORDED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_recorded_total",
        "Total number of answers recorded",
        &["correct"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track upstream operation with metrics
pub async fn track_upstream_operation<F, T, E>(operation: &str, future: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    UPSTREAM_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();

    UPSTREAM_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);

    result
}

/// Record cache hit
pub fn record_cache_hit() {
    QUESTIONS_CACHE_TOTAL.with_label_values(&["hit"]).inc();
}

/// Record cache miss
pub fn record_cache_miss() {
    QUESTIONS_CACHE_TOTAL.with_label_values(&["miss"]).inc();
}

pub fn record_answer_recorded(correct: bool) {
    let label = if correct { "true" } else { "false" };
    ANSWERS_RECORDED_TOTAL.with_label_values(&[label]).inc();
}
