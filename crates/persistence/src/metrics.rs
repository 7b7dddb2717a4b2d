//! Gateway metrics collection.
//!
//! Provides functions for recording gateway-related metrics.

use metrics::{counter, histogram};
use std::time::Instant;

use crate::latency::Operation;

/// Record the duration of one gateway operation, simulated latency included.
pub fn record_operation_duration(resource: &'static str, operation: Operation, duration_secs: f64) {
    histogram!(
        "gateway_operation_duration_seconds",
        "resource" => resource,
        "operation" => operation.as_str()
    )
    .record(duration_secs);
}

/// Record a published change event.
pub fn record_change(resource: &'static str, kind: &'static str) {
    counter!(
        "gateway_changes_total",
        "resource" => resource,
        "kind" => kind
    )
    .increment(1);
}

/// A helper to time gateway operations and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = GatewayTimer::new(User::NAME, Operation::Get);
/// let result = self.store.get(id).await;
/// timer.record();
/// result
/// ```
pub struct GatewayTimer {
    resource: &'static str,
    operation: Operation,
    start: Instant,
}

impl GatewayTimer {
    pub fn new(resource: &'static str, operation: Operation) -> Self {
        Self {
            resource,
            operation,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_operation_duration(self.resource, self.operation, duration);
    }
}
