//! # Gateway Configuration
//!
//! Immutable configuration structs, one per component, injected at
//! construction. There is no ambient configuration lookup anywhere in the
//! crate. A dispatcher sees exactly the values it was built with, and
//! tests can build dispatchers with whatever values they need.
//!
//! Defaults mirror the institutional deployment this gateway replaced:
//! one-second VA polls, a one-minute reminder sweep over batches of 50,
//! and a 60-minute grace window for VA activation before the first
//! reminder goes out.

use std::time::Duration;

// ---------------------------------------------------------------------------
// KafkaConfig
// ---------------------------------------------------------------------------

/// Connection parameters for the Kafka publisher.
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Comma-separated bootstrap broker list.
    pub brokers: String,
    /// Transport-level send timeout. Past this, a publish fails and the
    /// owning poller retries the row on its next tick.
    pub message_timeout: Duration,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            message_timeout: Duration::from_secs(5),
        }
    }
}

// ---------------------------------------------------------------------------
// VaDispatcherConfig
// ---------------------------------------------------------------------------

/// Tunables for the VA lifecycle pollers.
///
/// All three queues (create/update/delete) share one interval; they run as
/// independent tasks, so a slow publish on one queue never delays another.
#[derive(Debug, Clone)]
pub struct VaDispatcherConfig {
    /// Fixed delay between ticks of each queue's poller.
    pub poll_interval: Duration,
    /// Topic carrying outbound VA provisioning requests.
    pub topic: String,
}

impl Default for VaDispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            topic: "va.request".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationConfig
// ---------------------------------------------------------------------------

/// Tunables for the notification dispatcher (reminder poller and payment
/// notifier).
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Fixed delay between reminder sweeps.
    pub reminder_interval: Duration,
    /// Maximum bills considered per sweep.
    pub batch_size: usize,
    /// Minutes to wait after a bill's last update before reminding:
    /// the grace period that lets VA activation land first.
    pub delay_minutes: i64,
    /// Template key for billing reminders, forwarded as `konfigurasi`.
    pub reminder_template: String,
    /// Template key for payment notices, forwarded as `konfigurasi`.
    pub payment_template: String,
    /// Short contact-info line included in every notification payload.
    pub contact_info: String,
    /// HTML contact-info block included in every notification payload.
    pub contact_info_full: String,
    /// Finance mailbox for payment-notice copies.
    pub finance_email: String,
    /// Whether finance receives a copy of every payment notice.
    pub send_finance_copy: bool,
    /// IT mailbox for payment-notice copies.
    pub it_email: String,
    /// Whether IT receives a copy of every payment notice.
    pub send_it_copy: bool,
    /// Topic carrying outbound notification requests.
    pub notification_topic: String,
    /// Topic carrying payment-fact records for reconciliation.
    pub payment_fact_topic: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            reminder_interval: Duration::from_secs(60),
            batch_size: 50,
            delay_minutes: 60,
            reminder_template: "tagihan".to_string(),
            payment_template: "pembayaran".to_string(),
            contact_info: String::new(),
            contact_info_full: String::new(),
            finance_email: String::new(),
            send_finance_copy: false,
            it_email: String::new(),
            send_it_copy: false,
            notification_topic: "notification.request".to_string(),
            payment_fact_topic: "tagihan.payment".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// RelayConfig
// ---------------------------------------------------------------------------

/// Topics for the opaque pass-through responses.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Topic for bill-status responses forwarded verbatim.
    pub bill_status_topic: String,
    /// Topic for payer responses forwarded verbatim.
    pub payer_topic: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bill_status_topic: "tagihan.response".to_string(),
            payer_topic: "debitur.response".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
