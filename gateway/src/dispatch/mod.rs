//! # Dispatchers
//!
//! The core of the gateway: the pollers and notifiers that move work from
//! the billing store onto the message bus.
//!
//! - [`VaDispatcher`] — three independent pollers (create/update/delete)
//!   advancing the virtual-account state machine.
//! - [`NotificationDispatcher`] — the periodic billing-reminder sweep and
//!   the synchronous payment notifier.
//! - [`ResponseRelay`] — verbatim pass-through of upstream response
//!   payloads.
//!
//! ## Delivery semantics
//!
//! Every flow publishes first and persists second, and the two are not
//! atomic. A crash between them replays the message on the next tick:
//! at-least-once, never exactly-once. Consumers must deduplicate on their
//! own keys: `(invoiceNumber, requestType)` for VA requests,
//! `(nomorTagihan, konfigurasi)` for notifications.
//!
//! ## Failure containment
//!
//! No error escapes a tick. Store, serialization, and transport failures
//! are logged at warning level, counted, and left for the next tick to
//! retry; one poisoned row never halts a queue, and one queue never blocks
//! another.

pub mod messages;
mod notification;
mod relay;
mod va;

pub use notification::NotificationDispatcher;
pub use relay::ResponseRelay;
pub use va::{TickOutcome, VaDispatcher, VaQueue};

use crate::bus::PublishError;
use crate::store::StoreError;

/// Errors a dispatcher tick can run into. All of them are retried by the
/// next tick; none of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
