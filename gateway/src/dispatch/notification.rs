//! # Notification Dispatcher
//!
//! Two flows share this component:
//!
//! - **Billing reminders** run on a periodic sweep. A bill is reminded
//!   only once (the `NotSent` → `Sent` flip is the gate), only after a
//!   grace window from its last update has elapsed, and only if it has at
//!   least one active virtual account. A reminder pointing at no payable
//!   account would just generate support tickets.
//! - **Payment notices** are pushed synchronously by the payment-recording
//!   flow. Four publishes per payment (reconciliation fact, payer notice,
//!   optional finance copy, optional IT copy), each failing independently:
//!   a dead reconciliation topic must not silence the payer's receipt, and
//!   vice versa.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::messages::{NotificationEnvelope, PaymentFact, PaymentNoticePayload, ReminderPayload};
use super::DispatchError;
use crate::bus::MessagePublisher;
use crate::config::NotificationConfig;
use crate::metrics::GatewayMetrics;
use crate::model::{Bill, NotificationStatus, Payment, VirtualAccount};
use crate::store::BillingStore;

/// Dispatches billing reminders and payment notices.
pub struct NotificationDispatcher {
    store: Arc<dyn BillingStore>,
    publisher: Arc<dyn MessagePublisher>,
    metrics: Arc<GatewayMetrics>,
    config: NotificationConfig,
}

impl NotificationDispatcher {
    pub fn new(
        store: Arc<dyn BillingStore>,
        publisher: Arc<dyn MessagePublisher>,
        metrics: Arc<GatewayMetrics>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            store,
            publisher,
            metrics,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Billing reminders
    // -----------------------------------------------------------------------

    /// Runs the reminder sweep until the shutdown signal fires.
    pub async fn run_reminders(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval = ?self.config.reminder_interval,
            batch = self.config.batch_size,
            delay_minutes = self.config.delay_minutes,
            "reminder poller starting"
        );

        loop {
            if *shutdown.borrow() {
                info!("reminder poller received shutdown signal");
                return;
            }

            match self.reminder_tick().await {
                Ok(0) => debug!("no bills due for a reminder"),
                Ok(sent) => info!(sent, "billing reminders published"),
                Err(err) => warn!(error = %err, "reminder sweep failed"),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.reminder_interval) => {}
                _ = shutdown.changed() => {
                    info!("reminder poller shutting down during sleep");
                    return;
                }
            }
        }
    }

    /// Considers one batch of unsent bills; returns how many reminders
    /// went out.
    ///
    /// Per-bill failures are contained: a bill whose publish fails stays
    /// `NotSent` and the sweep moves on to the next bill.
    pub async fn reminder_tick(&self) -> Result<usize, DispatchError> {
        let bills = self.store.find_unsent_bills(self.config.batch_size).await?;
        let now = Utc::now();
        let mut sent = 0;

        for bill in bills {
            // Grace window: give VA activation time to land before
            // pointing the payer at an account.
            if now < bill.updated_at + Duration::minutes(self.config.delay_minutes) {
                continue;
            }

            let active = self.store.find_active_vas_for_bill(&bill.number).await?;
            if active.is_empty() {
                continue;
            }

            let invoice = bill.number.clone();
            match self.send_reminder(bill, &active).await {
                Ok(()) => sent += 1,
                Err(err) => {
                    self.metrics
                        .dispatch_failures
                        .with_label_values(&["reminder"])
                        .inc();
                    warn!(invoice = %invoice, error = %err, "reminder publish failed, bill stays unsent");
                }
            }
        }

        Ok(sent)
    }

    async fn send_reminder(
        &self,
        mut bill: Bill,
        active: &[VirtualAccount],
    ) -> Result<(), DispatchError> {
        let payload = ReminderPayload::new(
            &bill,
            active,
            &self.config.contact_info,
            &self.config.contact_info_full,
        );
        let envelope = NotificationEnvelope {
            email: bill.payer.email.clone(),
            mobile: Some(bill.payer.mobile.clone()),
            template: self.config.reminder_template.clone(),
            data: payload,
        };

        let json = serde_json::to_string(&envelope)?;
        self.publisher
            .publish(&self.config.notification_topic, &json)
            .await?;

        // The flip happens only after a successful publish; this is the
        // sole idempotency gate for reminders.
        bill.notification_status = NotificationStatus::Sent;
        self.store.save_bill(bill).await?;
        self.metrics.reminders_sent.inc();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Payment notices
    // -----------------------------------------------------------------------

    /// Publishes everything a recorded payment owes the outside world.
    ///
    /// Called synchronously by the payment-recording flow. Never fails the
    /// caller: each of the four publishes is attempted regardless of the
    /// others' outcome, and failures surface in logs and counters only.
    pub async fn notify_payment(&self, payment: &Payment) {
        if let Err(err) = self.send_payment_fact(payment).await {
            self.metrics
                .dispatch_failures
                .with_label_values(&["payment.fact"])
                .inc();
            warn!(
                invoice = %payment.bill.number,
                reference = %payment.reference,
                error = %err,
                "payment fact publish failed"
            );
        }

        let payer = &payment.bill.payer;
        self.send_payment_notice(payment, &payer.email, Some(payer.mobile.clone()))
            .await;

        if self.config.send_finance_copy {
            let email = self.config.finance_email.clone();
            self.send_payment_notice(payment, &email, None).await;
        }

        if self.config.send_it_copy {
            let email = self.config.it_email.clone();
            self.send_payment_notice(payment, &email, None).await;
        }
    }

    async fn send_payment_fact(&self, payment: &Payment) -> Result<(), DispatchError> {
        let fact = PaymentFact::new(payment);
        let json = serde_json::to_string(&fact)?;
        self.publisher
            .publish(&self.config.payment_fact_topic, &json)
            .await?;
        self.metrics.payment_facts_sent.inc();
        Ok(())
    }

    async fn send_payment_notice(&self, payment: &Payment, email: &str, mobile: Option<String>) {
        let result: Result<(), DispatchError> = async {
            let payload = PaymentNoticePayload::new(
                payment,
                &self.config.contact_info,
                &self.config.contact_info_full,
            );
            let envelope = NotificationEnvelope {
                email: email.to_string(),
                mobile,
                template: self.config.payment_template.clone(),
                data: payload,
            };
            let json = serde_json::to_string(&envelope)?;
            self.publisher
                .publish(&self.config.notification_topic, &json)
                .await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => self.metrics.payment_notices_sent.inc(),
            Err(err) => {
                self.metrics
                    .dispatch_failures
                    .with_label_values(&["payment.notice"])
                    .inc();
                warn!(
                    invoice = %payment.bill.number,
                    recipient = %email,
                    error = %err,
                    "payment notice publish failed"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemoryPublisher;
    use crate::model::{Bank, BillStatus, BillType, Payer, VaStatus, VirtualAccount};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use uuid::Uuid;

    // -----------------------------------------------------------------------
    // Test Helpers
    // -----------------------------------------------------------------------

    struct Harness {
        store: Arc<MemoryStore>,
        publisher: Arc<MemoryPublisher>,
        dispatcher: NotificationDispatcher,
    }

    fn setup() -> Harness {
        setup_with_config(NotificationConfig {
            contact_info: "call 123".into(),
            contact_info_full: "<b>call 123</b>".into(),
            ..NotificationConfig::default()
        })
    }

    fn setup_with_config(config: NotificationConfig) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let publisher = Arc::new(MemoryPublisher::new());
        let dispatcher = NotificationDispatcher::new(
            Arc::clone(&store) as Arc<dyn BillingStore>,
            Arc::clone(&publisher) as Arc<dyn MessagePublisher>,
            Arc::new(GatewayMetrics::new()),
            config,
        );
        Harness {
            store,
            publisher,
            dispatcher,
        }
    }

    fn bank(name: &str) -> Bank {
        Bank {
            id: Uuid::new_v4(),
            code: name.to_uppercase(),
            name: name.into(),
            settlement_account: "0123456789".into(),
            settlement_account_holder: "Yayasan Arta".into(),
            va_digits: 10,
            va_prefix_digits: 2,
        }
    }

    /// A bill whose grace window has already elapsed.
    fn ripe_bill(number: &str) -> Bill {
        Bill {
            number: number.into(),
            payer: Payer {
                number: "10001".into(),
                name: "Budi Santoso".into(),
                email: "budi@example.com".into(),
                mobile: "081234567890".into(),
            },
            bill_type: BillType {
                code: "SPP".into(),
                name: "Tuition".into(),
                payment_type: "CLOSED".into(),
            },
            amount: dec!(500000),
            amount_paid: dec!(0),
            bill_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            description: "Tuition January".into(),
            status: BillStatus::Active,
            notification_status: NotificationStatus::NotSent,
            updated_at: Utc::now() - Duration::minutes(61),
        }
    }

    fn active_va(bill: &Bill, bank_name: &str, number: &str) -> VirtualAccount {
        let mut va = VirtualAccount::new(bank(bank_name), bill.clone());
        va.status = VaStatus::Active;
        va.number = Some(number.into());
        va
    }

    fn payment(bill: Bill) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            bank: bank("Bank One"),
            amount: dec!(200000),
            transaction_time: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            reference: "REF-7".into(),
            bill,
        }
    }

    // -----------------------------------------------------------------------
    // 1. A ripe bill with an active VA is reminded and flipped
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn ripe_bill_with_active_va_is_reminded() {
        let h = setup();
        let bill = ripe_bill("INV-001");
        h.store.insert_va(active_va(&bill, "Bank One", "9912345678"));
        h.store.insert_bill(bill);

        let sent = h.dispatcher.reminder_tick().await.unwrap();
        assert_eq!(sent, 1);

        let messages = h.publisher.on_topic("notification.request");
        assert_eq!(messages.len(), 1);
        let envelope: Value = serde_json::from_str(&messages[0]).unwrap();
        assert_eq!(envelope["email"], "budi@example.com");
        assert_eq!(envelope["mobile"], "081234567890");
        assert_eq!(envelope["konfigurasi"], "tagihan");
        assert_eq!(envelope["data"]["rekening"], "Bank One 9912345678");
        assert_eq!(
            envelope["data"]["rekeningFull"],
            "<ul><li>Bank One 9912345678</li></ul>"
        );
        assert_eq!(envelope["data"]["contactinfo"], "call 123");

        assert_eq!(
            h.store.bill("INV-001").unwrap().notification_status,
            NotificationStatus::Sent
        );
    }

    // -----------------------------------------------------------------------
    // 2. The grace window holds reminders back
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn bill_inside_grace_window_is_skipped() {
        let h = setup();
        let mut bill = ripe_bill("INV-001");
        bill.updated_at = Utc::now() - Duration::minutes(10);
        h.store.insert_va(active_va(&bill, "Bank One", "9912345678"));
        h.store.insert_bill(bill);

        assert_eq!(h.dispatcher.reminder_tick().await.unwrap(), 0);
        assert!(h.publisher.published().is_empty());
        assert_eq!(
            h.store.bill("INV-001").unwrap().notification_status,
            NotificationStatus::NotSent
        );
    }

    // -----------------------------------------------------------------------
    // 3. No active VA, no reminder, no matter how old the bill is
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn bill_without_active_va_is_never_reminded() {
        let h = setup();
        let mut bill = ripe_bill("INV-001");
        bill.updated_at = Utc::now() - Duration::days(30);

        // An in-flight VA is not an active one.
        let mut va = VirtualAccount::new(bank("Bank One"), bill.clone());
        va.status = VaStatus::InFlight;
        h.store.insert_va(va);
        h.store.insert_bill(bill);

        assert_eq!(h.dispatcher.reminder_tick().await.unwrap(), 0);
        assert!(h.publisher.published().is_empty());
        assert_eq!(
            h.store.bill("INV-001").unwrap().notification_status,
            NotificationStatus::NotSent
        );
    }

    // -----------------------------------------------------------------------
    // 4. The flip is monotone: a second sweep sends nothing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn reminder_goes_out_at_most_once() {
        let h = setup();
        let bill = ripe_bill("INV-001");
        h.store.insert_va(active_va(&bill, "Bank One", "9912345678"));
        h.store.insert_bill(bill);

        assert_eq!(h.dispatcher.reminder_tick().await.unwrap(), 1);
        assert_eq!(h.dispatcher.reminder_tick().await.unwrap(), 0);
        assert_eq!(h.publisher.on_topic("notification.request").len(), 1);
    }

    // -----------------------------------------------------------------------
    // 5. Publish failure leaves the bill unsent for the next sweep
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn publish_failure_keeps_bill_unsent() {
        let h = setup();
        let bill = ripe_bill("INV-001");
        h.store.insert_va(active_va(&bill, "Bank One", "9912345678"));
        h.store.insert_bill(bill);

        h.publisher.set_failing(true);
        assert_eq!(h.dispatcher.reminder_tick().await.unwrap(), 0);
        assert_eq!(
            h.store.bill("INV-001").unwrap().notification_status,
            NotificationStatus::NotSent
        );

        h.publisher.set_failing(false);
        assert_eq!(h.dispatcher.reminder_tick().await.unwrap(), 1);
        assert_eq!(
            h.store.bill("INV-001").unwrap().notification_status,
            NotificationStatus::Sent
        );
    }

    // -----------------------------------------------------------------------
    // 6. Multiple active VAs are joined with "/" and listed in the HTML
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn reminder_lists_every_active_account() {
        let h = setup();
        let bill = ripe_bill("INV-001");
        h.store.insert_va(active_va(&bill, "Bank One", "9911111111"));
        h.store.insert_va(active_va(&bill, "Bank Two", "8822222222"));
        h.store.insert_bill(bill);

        h.dispatcher.reminder_tick().await.unwrap();
        let messages = h.publisher.on_topic("notification.request");
        let envelope: Value = serde_json::from_str(&messages[0]).unwrap();
        assert_eq!(
            envelope["data"]["rekening"],
            "Bank One 9911111111/Bank Two 8822222222"
        );
        assert_eq!(
            envelope["data"]["rekeningFull"],
            "<ul><li>Bank One 9911111111</li><li>Bank Two 8822222222</li></ul>"
        );
    }

    // -----------------------------------------------------------------------
    // 7. A payment always yields the fact and the payer notice
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn payment_emits_fact_and_payer_notice() {
        let h = setup();
        let payment = payment(ripe_bill("INV-001"));

        h.dispatcher.notify_payment(&payment).await;

        let facts = h.publisher.on_topic("tagihan.payment");
        assert_eq!(facts.len(), 1);
        let fact: Value = serde_json::from_str(&facts[0]).unwrap();
        assert_eq!(fact["nomorTagihan"], "INV-001");
        assert_eq!(fact["nilaiPembayaran"].as_i64(), Some(200000));
        assert_eq!(fact["waktuPembayaran"], "2024-01-15 09:30:00");

        let notices = h.publisher.on_topic("notification.request");
        assert_eq!(notices.len(), 1);
        let notice: Value = serde_json::from_str(&notices[0]).unwrap();
        assert_eq!(notice["email"], "budi@example.com");
        assert_eq!(notice["mobile"], "081234567890");
        assert_eq!(notice["konfigurasi"], "pembayaran");
        assert_eq!(notice["data"]["rekening"], "Bank One");
    }

    // -----------------------------------------------------------------------
    // 8. Finance and IT copies follow their flags, without a mobile
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn finance_and_it_copies_follow_flags() {
        let h = setup_with_config(NotificationConfig {
            finance_email: "finance@arta.example".into(),
            send_finance_copy: true,
            it_email: "it@arta.example".into(),
            send_it_copy: true,
            ..NotificationConfig::default()
        });
        let payment = payment(ripe_bill("INV-001"));

        h.dispatcher.notify_payment(&payment).await;

        let notices = h.publisher.on_topic("notification.request");
        assert_eq!(notices.len(), 3);

        let finance: Value = serde_json::from_str(&notices[1]).unwrap();
        assert_eq!(finance["email"], "finance@arta.example");
        assert!(finance.as_object().unwrap().get("mobile").is_none());

        let it: Value = serde_json::from_str(&notices[2]).unwrap();
        assert_eq!(it["email"], "it@arta.example");
        assert!(it.as_object().unwrap().get("mobile").is_none());
    }

    #[tokio::test]
    async fn disabled_flags_send_no_copies() {
        let h = setup();
        let payment = payment(ripe_bill("INV-001"));

        h.dispatcher.notify_payment(&payment).await;

        // Exactly one fact and one payer notice, nothing else.
        assert_eq!(h.publisher.published().len(), 2);
    }

    // -----------------------------------------------------------------------
    // 9. A dead reconciliation topic does not silence the payer notice
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fact_failure_does_not_suppress_notices() {
        let h = setup();
        h.publisher.fail_topic("tagihan.payment");
        let payment = payment(ripe_bill("INV-001"));

        h.dispatcher.notify_payment(&payment).await;

        assert!(h.publisher.on_topic("tagihan.payment").is_empty());
        assert_eq!(h.publisher.on_topic("notification.request").len(), 1);
    }

    #[tokio::test]
    async fn notice_failure_does_not_suppress_fact() {
        let h = setup();
        h.publisher.fail_topic("notification.request");
        let payment = payment(ripe_bill("INV-001"));

        h.dispatcher.notify_payment(&payment).await;

        assert_eq!(h.publisher.on_topic("tagihan.payment").len(), 1);
        assert!(h.publisher.on_topic("notification.request").is_empty());
    }
}
