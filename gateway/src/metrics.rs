//! # Prometheus Metrics
//!
//! Operational counters for the dispatchers, registered in a dedicated
//! [`prometheus::Registry`] so they never collide with a host process's
//! default registry. The node serves them at `/metrics`.
//!
//! `va_rows_missing_number_total` is the alert signal for rows that can
//! never dispatch (update/delete without a stored number): their status is
//! deliberately left untouched, so this counter, not a status change,
//! is what makes the stall operator-visible.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Holds all Prometheus metric handles for the gateway.
///
/// Handles are clone-friendly internally; share the struct behind an `Arc`.
pub struct GatewayMetrics {
    /// Registry that owns every metric below.
    registry: Registry,
    /// VA requests successfully published, labelled by queue kind.
    pub va_requests_published: IntCounterVec,
    /// Update/delete rows skipped because no usable VA number is stored.
    pub va_rows_missing_number: IntCounter,
    /// Billing reminders successfully published.
    pub reminders_sent: IntCounter,
    /// Payment-fact records successfully published.
    pub payment_facts_sent: IntCounter,
    /// Human payment notices successfully published (payer + copies).
    pub payment_notices_sent: IntCounter,
    /// Failed publishes, labelled by flow.
    pub dispatch_failures: IntCounterVec,
}

impl GatewayMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("arta".into()), None)
            .expect("failed to create prometheus registry");

        let va_requests_published = IntCounterVec::new(
            Opts::new(
                "va_requests_published_total",
                "VA provisioning requests published, by queue kind",
            ),
            &["kind"],
        )
        .expect("metric creation");
        registry
            .register(Box::new(va_requests_published.clone()))
            .expect("metric registration");

        let va_rows_missing_number = IntCounter::new(
            "va_rows_missing_number_total",
            "Update/delete rows skipped for lack of a stored VA number",
        )
        .expect("metric creation");
        registry
            .register(Box::new(va_rows_missing_number.clone()))
            .expect("metric registration");

        let reminders_sent = IntCounter::new(
            "reminders_sent_total",
            "Billing reminders published to the notification topic",
        )
        .expect("metric creation");
        registry
            .register(Box::new(reminders_sent.clone()))
            .expect("metric registration");

        let payment_facts_sent = IntCounter::new(
            "payment_facts_sent_total",
            "Payment-fact records published to the reconciliation topic",
        )
        .expect("metric creation");
        registry
            .register(Box::new(payment_facts_sent.clone()))
            .expect("metric registration");

        let payment_notices_sent = IntCounter::new(
            "payment_notices_sent_total",
            "Human payment notices published (payer, finance, IT)",
        )
        .expect("metric creation");
        registry
            .register(Box::new(payment_notices_sent.clone()))
            .expect("metric registration");

        let dispatch_failures = IntCounterVec::new(
            Opts::new("dispatch_failures_total", "Failed dispatch attempts, by flow"),
            &["flow"],
        )
        .expect("metric creation");
        registry
            .register(Box::new(dispatch_failures.clone()))
            .expect("metric registration");

        Self {
            registry,
            va_requests_published,
            va_rows_missing_number,
            reminders_sent,
            payment_facts_sent,
            payment_notices_sent,
            dispatch_failures,
        }
    }

    /// Encodes all registered metrics in the Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .expect("metrics encoding");
        String::from_utf8(buffer).expect("metrics are valid UTF-8")
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_encoded_output() {
        let metrics = GatewayMetrics::new();
        metrics.va_rows_missing_number.inc();
        metrics
            .va_requests_published
            .with_label_values(&["CREATE"])
            .inc();

        let text = metrics.encode();
        assert!(text.contains("arta_va_rows_missing_number_total 1"));
        assert!(text.contains("va_requests_published_total"));
    }
}
