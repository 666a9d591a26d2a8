//! In-memory billing store.
//!
//! Reference implementation of [`BillingStore`] backed by plain vectors
//! behind a `parking_lot::RwLock`. Insertion order doubles as age order,
//! which is exactly the oldest-first guarantee the contract asks for.
//! Used by the test suites and by the node's dry-run mode; a production
//! deployment points the dispatchers at the ledger database instead.

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{BillingStore, StoreResult};
use crate::model::{Bill, NotificationStatus, VaStatus, VirtualAccount};

/// Vec-backed store. Cheap to clone rows out of, never errors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    vas: RwLock<Vec<VirtualAccount>>,
    bills: RwLock<Vec<Bill>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a virtual account row, preserving insertion order.
    pub fn insert_va(&self, va: VirtualAccount) {
        self.vas.write().push(va);
    }

    /// Seeds a bill, preserving insertion order.
    pub fn insert_bill(&self, bill: Bill) {
        self.bills.write().push(bill);
    }

    /// Snapshot of a VA row by id, for assertions.
    pub fn va(&self, id: uuid::Uuid) -> Option<VirtualAccount> {
        self.vas.read().iter().find(|v| v.id == id).cloned()
    }

    /// Snapshot of a bill by number, for assertions.
    pub fn bill(&self, number: &str) -> Option<Bill> {
        self.bills.read().iter().find(|b| b.number == number).cloned()
    }
}

#[async_trait]
impl BillingStore for MemoryStore {
    async fn find_pending_va(&self, status: VaStatus) -> StoreResult<Option<VirtualAccount>> {
        Ok(self
            .vas
            .read()
            .iter()
            .find(|va| va.status == status)
            .cloned())
    }

    async fn save_va(&self, va: VirtualAccount) -> StoreResult<()> {
        let mut vas = self.vas.write();
        match vas.iter().position(|existing| existing.id == va.id) {
            Some(i) => vas[i] = va,
            None => vas.push(va),
        }
        Ok(())
    }

    async fn find_active_vas_for_bill(
        &self,
        bill_number: &str,
    ) -> StoreResult<Vec<VirtualAccount>> {
        Ok(self
            .vas
            .read()
            .iter()
            .filter(|va| va.status == VaStatus::Active && va.bill.number == bill_number)
            .cloned()
            .collect())
    }

    async fn find_unsent_bills(&self, batch: usize) -> StoreResult<Vec<Bill>> {
        let mut unsent: Vec<Bill> = self
            .bills
            .read()
            .iter()
            .filter(|bill| bill.notification_status == NotificationStatus::NotSent)
            .cloned()
            .collect();
        unsent.sort_by_key(|bill| bill.updated_at);
        unsent.truncate(batch);
        Ok(unsent)
    }

    async fn save_bill(&self, bill: Bill) -> StoreResult<()> {
        let mut bills = self.bills.write();
        match bills.iter().position(|existing| existing.number == bill.number) {
            Some(i) => bills[i] = bill,
            None => bills.push(bill),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bank, BillStatus, BillType, Payer};
    use chrono::{Duration, NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn bank() -> Bank {
        Bank {
            id: Uuid::new_v4(),
            code: "BNI".into(),
            name: "Bank Negara Indonesia".into(),
            settlement_account: "0123456789".into(),
            settlement_account_holder: "Yayasan Arta".into(),
            va_digits: 10,
            va_prefix_digits: 2,
        }
    }

    fn bill(number: &str) -> Bill {
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
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn find_pending_va_returns_oldest_matching_row() {
        let store = MemoryStore::new();
        let first = VirtualAccount::new(bank(), bill("INV-001"));
        let second = VirtualAccount::new(bank(), bill("INV-002"));
        store.insert_va(first.clone());
        store.insert_va(second);

        let found = store.find_pending_va(VaStatus::Create).await.unwrap();
        assert_eq!(found.map(|va| va.id), Some(first.id));
    }

    #[tokio::test]
    async fn find_pending_va_filters_by_status() {
        let store = MemoryStore::new();
        let mut row = VirtualAccount::new(bank(), bill("INV-001"));
        row.status = VaStatus::InFlight;
        store.insert_va(row);

        assert!(store
            .find_pending_va(VaStatus::Create)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn save_va_upserts_by_id() {
        let store = MemoryStore::new();
        let mut row = VirtualAccount::new(bank(), bill("INV-001"));
        store.insert_va(row.clone());

        row.status = VaStatus::InFlight;
        row.number = Some("9912345678".into());
        store.save_va(row.clone()).await.unwrap();

        let stored = store.va(row.id).unwrap();
        assert_eq!(stored.status, VaStatus::InFlight);
        assert_eq!(stored.number.as_deref(), Some("9912345678"));
    }

    #[tokio::test]
    async fn active_vas_exclude_other_bills_and_statuses() {
        let store = MemoryStore::new();

        let mut active = VirtualAccount::new(bank(), bill("INV-001"));
        active.status = VaStatus::Active;
        active.number = Some("9911111111".into());
        store.insert_va(active);

        let mut in_flight = VirtualAccount::new(bank(), bill("INV-001"));
        in_flight.status = VaStatus::InFlight;
        store.insert_va(in_flight);

        let mut other_bill = VirtualAccount::new(bank(), bill("INV-002"));
        other_bill.status = VaStatus::Active;
        store.insert_va(other_bill);

        let found = store.find_active_vas_for_bill("INV-001").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number.as_deref(), Some("9911111111"));
    }

    #[tokio::test]
    async fn unsent_bills_come_back_oldest_updated_first_and_batched() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let mut newest = bill("INV-003");
        newest.updated_at = now;
        let mut oldest = bill("INV-001");
        oldest.updated_at = now - Duration::minutes(90);
        let mut middle = bill("INV-002");
        middle.updated_at = now - Duration::minutes(30);

        store.insert_bill(newest);
        store.insert_bill(oldest);
        store.insert_bill(middle);

        let found = store.find_unsent_bills(2).await.unwrap();
        let numbers: Vec<&str> = found.iter().map(|b| b.number.as_str()).collect();
        assert_eq!(numbers, vec!["INV-001", "INV-002"]);
    }

    #[tokio::test]
    async fn sent_bills_are_never_selected() {
        let store = MemoryStore::new();
        let mut sent = bill("INV-001");
        sent.notification_status = NotificationStatus::Sent;
        store.insert_bill(sent);

        assert!(store.find_unsent_bills(50).await.unwrap().is_empty());
    }
}
