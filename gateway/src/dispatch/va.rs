//! # VA Lifecycle Dispatcher
//!
//! Three independent pollers (one per queue) that each pick at most one
//! pending virtual-account row per tick, publish the corresponding bank
//! request, and advance the row to `InFlight`. Rows come back out of
//! `InFlight` only through the bank-response consumer, never through this
//! module.
//!
//! ## One row per tick
//!
//! Matching the ledger's cadence: a queue drains at one row per poll
//! interval. This bounds the blast radius of a bad row (the next tick is
//! never starved) and keeps the bank-side bridge from being flooded after
//! a backlog builds up.
//!
//! ## Retry model
//!
//! There is no retry state. A row whose publish fails simply remains in
//! its queue status and is re-selected on a later tick. Update/delete rows
//! without a usable stored number are skipped the same way, with a warning
//! and an alert counter. Their status is never changed here.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::messages::{RequestKind, VaRequest};
use super::DispatchError;
use crate::bus::MessagePublisher;
use crate::config::VaDispatcherConfig;
use crate::metrics::GatewayMetrics;
use crate::model::VaStatus;
use crate::numbering;
use crate::store::BillingStore;

// ---------------------------------------------------------------------------
// VaQueue
// ---------------------------------------------------------------------------

/// One of the three dispatch queues. Each queue selects rows by its own
/// status, so no two queues ever contend for the same row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaQueue {
    Create,
    Update,
    Delete,
}

impl VaQueue {
    /// All queues, for spawning one poller each.
    pub const ALL: [VaQueue; 3] = [VaQueue::Create, VaQueue::Update, VaQueue::Delete];

    /// The row status this queue polls for.
    pub fn target_status(self) -> VaStatus {
        match self {
            Self::Create => VaStatus::Create,
            Self::Update => VaStatus::Update,
            Self::Delete => VaStatus::Delete,
        }
    }

    /// The request kind published for rows of this queue.
    pub fn request_kind(self) -> RequestKind {
        match self {
            Self::Create => RequestKind::Create,
            Self::Update => RequestKind::Update,
            Self::Delete => RequestKind::Delete,
        }
    }

    fn as_label(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for VaQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

// ---------------------------------------------------------------------------
// TickOutcome
// ---------------------------------------------------------------------------

/// What a single poll tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No pending row in the queue.
    Idle,
    /// A request was published and the row advanced to `InFlight`.
    Published,
    /// A row was selected but skipped (missing/short stored number);
    /// its status is unchanged and it will be re-selected.
    Skipped,
}

// ---------------------------------------------------------------------------
// VaDispatcher
// ---------------------------------------------------------------------------

/// Polls pending virtual-account rows and publishes bank requests.
pub struct VaDispatcher {
    store: Arc<dyn BillingStore>,
    publisher: Arc<dyn MessagePublisher>,
    metrics: Arc<GatewayMetrics>,
    config: VaDispatcherConfig,
}

impl VaDispatcher {
    pub fn new(
        store: Arc<dyn BillingStore>,
        publisher: Arc<dyn MessagePublisher>,
        metrics: Arc<GatewayMetrics>,
        config: VaDispatcherConfig,
    ) -> Self {
        Self {
            store,
            publisher,
            metrics,
            config,
        }
    }

    /// Runs one queue's poll loop until the shutdown signal fires.
    ///
    /// Tick errors are logged and absorbed; the loop only exits on
    /// shutdown.
    pub async fn run(&self, queue: VaQueue, mut shutdown: watch::Receiver<bool>) {
        info!(%queue, interval = ?self.config.poll_interval, "VA poller starting");

        loop {
            if *shutdown.borrow() {
                info!(%queue, "VA poller received shutdown signal");
                return;
            }

            match self.tick(queue).await {
                Ok(TickOutcome::Published) => {}
                Ok(TickOutcome::Skipped) => {}
                Ok(TickOutcome::Idle) => debug!(%queue, "no pending rows"),
                Err(err) => {
                    self.metrics
                        .dispatch_failures
                        .with_label_values(&[queue.as_label()])
                        .inc();
                    warn!(%queue, error = %err, "VA tick failed, row left for retry");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval) => {}
                _ = shutdown.changed() => {
                    info!(%queue, "VA poller shutting down during sleep");
                    return;
                }
            }
        }
    }

    /// Executes a single poll tick for one queue.
    ///
    /// Publishes at most one request. The row's status is advanced only
    /// after the publish succeeds, so any failure leaves the row where the
    /// next tick will find it again.
    pub async fn tick(&self, queue: VaQueue) -> Result<TickOutcome, DispatchError> {
        let Some(mut va) = self.store.find_pending_va(queue.target_status()).await? else {
            return Ok(TickOutcome::Idle);
        };

        let account_number = match queue {
            VaQueue::Create => {
                numbering::generate(&numbering::va_seed(&va.bill), va.bank.va_digits)
            }
            VaQueue::Update | VaQueue::Delete => {
                let stripped = va
                    .number
                    .as_deref()
                    .and_then(|stored| {
                        numbering::strip_bank_prefix(stored, va.bank.va_prefix_digits)
                    })
                    .map(str::to_owned);

                match stripped {
                    Some(number) => number,
                    None => {
                        self.metrics.va_rows_missing_number.inc();
                        warn!(
                            %queue,
                            invoice = %va.bill.number,
                            bank = %va.bank.code,
                            "pending row has no usable stored VA number, skipping"
                        );
                        return Ok(TickOutcome::Skipped);
                    }
                }
            }
        };

        let request = VaRequest::new(&va, queue.request_kind(), account_number);
        let payload = serde_json::to_string(&request)?;
        debug!(%queue, invoice = %request.invoice_number, "publishing VA request");

        self.publisher.publish(&self.config.topic, &payload).await?;

        va.status = VaStatus::InFlight;
        self.store.save_va(va).await?;

        self.metrics
            .va_requests_published
            .with_label_values(&[queue.as_label()])
            .inc();

        Ok(TickOutcome::Published)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
