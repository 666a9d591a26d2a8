//! Virtual accounts and their dispatch state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::bank::Bank;
use super::bill::Bill;

// ---------------------------------------------------------------------------
// VaStatus
// ---------------------------------------------------------------------------

/// Dispatch state of a virtual account row.
///
/// The gateway's pollers move rows `Create`/`Update`/`Delete` → `InFlight`
/// on a successful publish, and never touch `InFlight` rows again. Moving
/// a row out of `InFlight` (to `Active`, or back to `Update`/`Delete`) is
/// the bank-response consumer's job, outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VaStatus {
    /// Waiting for a provisioning request to be sent to the bank.
    Create,
    /// Request published, bank response pending.
    InFlight,
    /// Confirmed usable on the bank's rail.
    Active,
    /// Waiting for an amount/detail update to be sent to the bank.
    Update,
    /// Waiting for a deprovisioning request to be sent to the bank.
    Delete,
}

impl fmt::Display for VaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::InFlight => write!(f, "IN_FLIGHT"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

// ---------------------------------------------------------------------------
// VirtualAccount
// ---------------------------------------------------------------------------

/// One provisioning attempt of a bank virtual account against a bill.
///
/// A bill may carry several rows (one per bank); only `Active` rows are
/// payable and only they appear in payer notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualAccount {
    /// Surrogate id; the store's upsert key.
    pub id: Uuid,
    /// The bank rail this row provisions on.
    pub bank: Bank,
    /// The bill being made payable.
    pub bill: Bill,
    /// The full stored VA number. `None` until the bank confirms creation;
    /// update/delete requests require it.
    pub number: Option<String>,
    /// Dispatch state.
    pub status: VaStatus,
}

impl VirtualAccount {
    /// Creates a fresh row queued for provisioning.
    pub fn new(bank: Bank, bill: Bill) -> Self {
        Self {
            id: Uuid::new_v4(),
            bank,
            bill,
            number: None,
            status: VaStatus::Create,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn va_status_display_matches_ledger_vocabulary() {
        assert_eq!(VaStatus::Create.to_string(), "CREATE");
        assert_eq!(VaStatus::InFlight.to_string(), "IN_FLIGHT");
        assert_eq!(VaStatus::Active.to_string(), "ACTIVE");
    }
}
