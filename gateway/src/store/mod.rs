//! # Billing Store Contract
//!
//! The gateway treats persistence as an external collaborator reached
//! through this five-operation contract. Anything that can answer these
//! queries (the institutional ledger database, a read replica, or the
//! in-memory store used in tests and dry runs) can back the dispatchers.
//!
//! The contract is deliberately narrow: dispatchers never browse bills or
//! payers directly. Rows come back with their full object graph embedded,
//! so one query yields everything an outbound message needs.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::model::{Bill, VaStatus, VirtualAccount};

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors surfaced by a billing store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached or timed out.
    #[error("billing store unavailable: {0}")]
    Unavailable(String),

    /// The store returned data the gateway cannot work with.
    #[error("billing store returned inconsistent data: {0}")]
    Inconsistent(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// BillingStore
// ---------------------------------------------------------------------------

/// Query/command contract the dispatchers rely on.
///
/// Ordering guarantees are intentionally weak: `find_pending_va` and
/// `find_unsent_bills` must return oldest work first, but beyond
/// "eventually every pending row is selected" no fairness is promised.
#[async_trait]
pub trait BillingStore: Send + Sync {
    /// At most one virtual account currently in `status`, oldest first.
    async fn find_pending_va(&self, status: VaStatus) -> StoreResult<Option<VirtualAccount>>;

    /// Upserts a virtual account row by id.
    async fn save_va(&self, va: VirtualAccount) -> StoreResult<()>;

    /// All `Active` virtual accounts provisioned against the given bill.
    async fn find_active_vas_for_bill(&self, bill_number: &str)
        -> StoreResult<Vec<VirtualAccount>>;

    /// Up to `batch` bills whose reminder has not been sent,
    /// oldest-updated first.
    async fn find_unsent_bills(&self, batch: usize) -> StoreResult<Vec<Bill>>;

    /// Upserts a bill by bill number.
    async fn save_bill(&self, bill: Bill) -> StoreResult<()>;
}
