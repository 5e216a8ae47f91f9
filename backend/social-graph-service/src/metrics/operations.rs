use std::future::Future;
use std::time::Instant;

use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

use crate::error::Result;

lazy_static! {
    /// Total graph operations segmented by operation and outcome (ok or error kind).
    pub static ref OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "social_graph_operations_total",
        "Social graph operations segmented by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("failed to register social_graph_operations_total");

    /// Latency of graph operations.
    pub static ref OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "social_graph_operation_duration_seconds",
        "Social graph operation duration segmented by operation",
        &["operation"]
    )
    .expect("failed to register social_graph_operation_duration_seconds");
}

/// Run a service call and record its latency and outcome under `operation`.
pub async fn track<T, F>(operation: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let result = fut.await;

    OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(started.elapsed().as_secs_f64());

    let outcome = match &result {
        Ok(_) => "ok",
        Err(err) => err.kind(),
    };
    OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();

    result
}
