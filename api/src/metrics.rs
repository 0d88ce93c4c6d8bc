use once_cell::sync::Lazy;
use prometheus::{
    opts, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Registry, TextEncoder,
};
use raffle_core::ValidationErrors;
use raffle_core::validator::{INVALID_ADDRESS, INVALID_CODE, INVALID_SIZE_OF_RAFFLE_LIST};

macro_rules! counter_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| IntCounterVec::new(opts!($name, $help), $labels).unwrap())
    };
}
macro_rules! histogram_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| {
            HistogramVec::new(HistogramOpts::new($name, $help).buckets(LATENCY_BUCKETS.to_vec()), $labels)
                .unwrap()
        })
    };
}
macro_rules! gauge {
    ($name:expr, $help:expr) => {
        Lazy::new(|| IntGauge::new($name, $help).unwrap())
    };
}

const LATENCY_BUCKETS: [f64; 10] = [0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0];

// ── HTTP ────────────────────────────────────────────────────────────────────
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> =
    counter_vec!("http_requests_total", "Total HTTP requests", &["method", "path", "status"]);
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> =
    histogram_vec!("http_request_duration_seconds", "HTTP request latency", &["method", "path"]);

// ── Raffles ─────────────────────────────────────────────────────────────────
pub static RAFFLE_SUBMISSIONS: Lazy<IntCounterVec> =
    counter_vec!("raffle_submissions_total", "Raffle submissions by outcome", &["outcome"]);
pub static RAFFLE_VALIDATION_ERRORS: Lazy<IntCounterVec> = counter_vec!(
    "raffle_validation_errors_total",
    "Validation errors reported to clients",
    &["kind"]
);
pub static RAFFLE_LOOKUPS: Lazy<IntCounterVec> =
    counter_vec!("raffle_lookups_total", "Raffle lookups by address", &["result"]);
pub static RAFFLES_STORED: Lazy<IntGauge> = gauge!("raffles_stored", "Raffles currently stored");

pub fn register_all(r: &Registry) -> prometheus::Result<()> {
    r.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    r.register(Box::new(HTTP_REQUEST_DURATION.clone()))?;
    r.register(Box::new(RAFFLE_SUBMISSIONS.clone()))?;
    r.register(Box::new(RAFFLE_VALIDATION_ERRORS.clone()))?;
    r.register(Box::new(RAFFLE_LOOKUPS.clone()))?;
    r.register(Box::new(RAFFLES_STORED.clone()))?;
    Ok(())
}

pub fn gather_metrics(r: &Registry) -> String {
    let encoder = TextEncoder::new();
    let families = r.gather();
    let mut buf = Vec::new();
    encoder.encode(&families, &mut buf).unwrap_or_default();
    String::from_utf8(buf).unwrap_or_default()
}

pub fn observe_http(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

pub fn observe_submission(errors: &ValidationErrors, stored: usize) {
    if errors.is_empty() {
        RAFFLE_SUBMISSIONS.with_label_values(&["approved"]).inc();
    } else {
        RAFFLE_SUBMISSIONS.with_label_values(&["rejected"]).inc();
    }

    for (_, reason) in errors.iter() {
        let kind = match reason {
            INVALID_ADDRESS => "address",
            INVALID_SIZE_OF_RAFFLE_LIST => "size",
            INVALID_CODE => "code",
            _ => "other",
        };
        RAFFLE_VALIDATION_ERRORS.with_label_values(&[kind]).inc();
    }

    RAFFLES_STORED.set(stored as i64);
}

pub fn observe_lookup(found: bool) {
    let result = if found { "hit" } else { "miss" };
    RAFFLE_LOOKUPS.with_label_values(&[result]).inc();
}
