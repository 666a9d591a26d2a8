//! Confirmed bank settlements.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bank::Bank;
use super::bill::Bill;

/// A settlement confirmed by a partner bank against a bill.
///
/// Created by the payment-recording flow (outside this crate) after a bank
/// callback is verified; handed to the notification dispatcher synchronously
/// so the payer hears about the payment in the same unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Surrogate id.
    pub id: Uuid,
    /// The bill the settlement applies to, with `amount_paid` already
    /// advanced by the recording flow.
    pub bill: Bill,
    /// The bank the payer transferred through.
    pub bank: Bank,
    /// Amount of this settlement.
    pub amount: Decimal,
    /// Bank-side transaction time (bank local time, no zone).
    pub transaction_time: NaiveDateTime,
    /// Bank-side reference code for reconciliation.
    pub reference: String,
}
