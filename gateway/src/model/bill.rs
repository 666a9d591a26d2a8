//! Bills and their lifecycle flags.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::payer::Payer;

// ---------------------------------------------------------------------------
// BillType
// ---------------------------------------------------------------------------

/// Category of a bill (tuition, registration fee, dormitory, ...).
///
/// `payment_type` is a downstream tag the bank rail uses to route the
/// provisioning request; it flows into the VA request's `accountType`
/// field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillType {
    /// Unique short code, participates in VA-number derivation.
    pub code: String,
    /// Display name, used as the human description in notifications.
    pub name: String,
    /// Bank-side account type tag, e.g. `"OPEN"` or `"CLOSED"`.
    pub payment_type: String,
}

// ---------------------------------------------------------------------------
// BillStatus
// ---------------------------------------------------------------------------

/// Ledger status of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillStatus {
    /// Open and collectible.
    Active,
    /// Fully settled.
    Paid,
    /// Voided by the institution; no further collection.
    Cancelled,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Paid => write!(f, "PAID"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationStatus
// ---------------------------------------------------------------------------

/// Whether the billing reminder for a bill has gone out.
///
/// Monotone: `NotSent` → `Sent`, never back. The flip is the reminder
/// poller's idempotency gate and happens only after a successful publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationStatus {
    /// Reminder not yet published; the poller will keep considering it.
    NotSent,
    /// Reminder published; the poller never selects this bill again.
    Sent,
}

// ---------------------------------------------------------------------------
// Bill
// ---------------------------------------------------------------------------

/// An amount owed by a payer, trackable to partial payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Institutional invoice number, unique per bill.
    pub number: String,
    /// The payer owing this bill.
    pub payer: Payer,
    /// Category of the bill.
    pub bill_type: BillType,
    /// Total amount due.
    pub amount: Decimal,
    /// Cumulative amount paid so far.
    pub amount_paid: Decimal,
    /// Date the bill was issued.
    pub bill_date: NaiveDate,
    /// Date the bill falls due; sent to the bank as the VA expiry.
    pub due_date: NaiveDate,
    /// Free-form description shown to the payer and the bank.
    pub description: String,
    /// Ledger status.
    pub status: BillStatus,
    /// Reminder dispatch flag.
    pub notification_status: NotificationStatus,
    /// Last time the ledger touched this record. The reminder delay window
    /// is measured from here.
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// The balance still owed: `amount - amount_paid`.
    ///
    /// This is the figure sent to the bank on VA create/update, so a
    /// partially paid bill re-provisions with only the remainder.
    pub fn outstanding(&self) -> Decimal {
        self.amount - self.amount_paid
    }
}
