//! # Arta Gateway — Core Library
//!
//! Arta sits between an institutional billing ledger and partner banks'
//! virtual-account rails. Bills get bank VA numbers provisioned against
//! them so payers can settle by transfer; the bank side is reachable only
//! through asynchronous messages, so everything here is built around
//! polling, publishing, and retrying.
//!
//! ## Architecture
//!
//! - **model** — The entity vocabulary: banks, payers, bills, virtual
//!   accounts, payments.
//! - **numbering** — Deterministic VA-number derivation. Same bill, same
//!   number, every time.
//! - **store** — The five-operation query contract the dispatchers poll,
//!   plus the in-memory reference implementation.
//! - **bus** — Publish-only sink over Kafka, with a recording stand-in for
//!   tests and dry runs.
//! - **dispatch** — The core: VA lifecycle pollers, the reminder sweep,
//!   the payment notifier, and the response relay.
//! - **config** — Immutable per-component configuration.
//! - **metrics** — Prometheus counters, including the alert signal for
//!   rows that can never dispatch.
//!
//! ## Design Philosophy
//!
//! 1. At-least-once, acknowledged openly: consumers deduplicate.
//! 2. A failed row waits for the next tick; it never takes the loop down.
//! 3. State advances only after the side effect that justifies it.

pub mod bus;
pub mod config;
pub mod dispatch;
pub mod metrics;
pub mod model;
pub mod numbering;
pub mod store;
