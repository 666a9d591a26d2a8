//! # Domain Model
//!
//! The entity vocabulary of the gateway: banks, payers, bill types, bills,
//! virtual accounts, and payments. These mirror the institutional ledger's
//! records closely; the gateway does not own them, it reads and advances
//! them through the [`crate::store::BillingStore`] contract.
//!
//! Entities embed their collaborators (a [`VirtualAccount`] carries its
//! [`Bank`] and [`Bill`]) so a single store query hands a dispatcher
//! everything it needs to build an outbound message.

mod bank;
mod bill;
mod payer;
mod payment;
mod virtual_account;

pub use bank::Bank;
pub use bill::{Bill, BillStatus, BillType, NotificationStatus};
pub use payer::Payer;
pub use payment::Payment;
pub use virtual_account::{VaStatus, VirtualAccount};
