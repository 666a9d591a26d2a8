//! Wire messages.
//!
//! The exact JSON shapes the downstream consumers key on. Field names are
//! a compatibility contract with the bank-side bridge and the notification
//! renderer. Several are Indonesian because that is what those consumers
//! were built against. Do not rename them.
//!
//! Date fields are ISO dates (`2024-01-31`); the payment timestamp uses
//! the bank's `2024-01-31 14:05:00` convention. Amounts serialize as JSON
//! numbers.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::model::{Bill, Payment, VirtualAccount};

/// Timestamp convention for payment times on the wire.
const FORMAT_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

fn format_transaction_time(time: &NaiveDateTime) -> String {
    time.format(FORMAT_DATETIME).to_string()
}

// ---------------------------------------------------------------------------
// RequestKind
// ---------------------------------------------------------------------------

/// Operation requested of the bank rail, serialized as `CREATE`/`UPDATE`/
/// `DELETE` in the `requestType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

// ---------------------------------------------------------------------------
// VaRequest
// ---------------------------------------------------------------------------

/// A provisioning request sent to the bank-side bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaRequest {
    /// The bill type's bank-side routing tag.
    pub account_type: String,
    pub request_type: RequestKind,
    /// Generated for creates; prefix-stripped stored number otherwise.
    pub account_number: String,
    /// Outstanding balance, not the original bill amount.
    pub amount: Decimal,
    pub description: String,
    pub email: String,
    pub phone: String,
    /// ISO date the VA stops accepting transfers.
    pub expire_date: String,
    pub invoice_number: String,
    pub name: String,
    pub bank_id: Uuid,
}

impl VaRequest {
    /// Builds a request from a pending row. The caller supplies the
    /// account number because its derivation differs per request kind.
    pub fn new(va: &VirtualAccount, kind: RequestKind, account_number: String) -> Self {
        let bill = &va.bill;
        Self {
            account_type: bill.bill_type.payment_type.clone(),
            request_type: kind,
            account_number,
            amount: bill.outstanding(),
            description: bill.description.clone(),
            email: bill.payer.email.clone(),
            phone: bill.payer.mobile.clone(),
            expire_date: bill.due_date.to_string(),
            invoice_number: bill.number.clone(),
            name: bill.payer.name.clone(),
            bank_id: va.bank.id,
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationEnvelope
// ---------------------------------------------------------------------------

/// Outer envelope on the notification topic.
///
/// `mobile` is omitted entirely (not serialized as `null`) for
/// recipients without one, the finance and IT copies, because the
/// renderer treats presence of the key as "send an SMS too".
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEnvelope<T: Serialize> {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    /// Template key the renderer resolves the message body from.
    #[serde(rename = "konfigurasi")]
    pub template: String,
    pub data: T,
}

// ---------------------------------------------------------------------------
// ReminderPayload
// ---------------------------------------------------------------------------

/// Body of a billing reminder.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderPayload {
    #[serde(rename = "jumlah")]
    pub amount: Decimal,
    #[serde(rename = "keterangan")]
    pub description: String,
    #[serde(rename = "nama")]
    pub name: String,
    pub email: String,
    #[serde(rename = "noHp")]
    pub mobile: String,
    #[serde(rename = "nomorTagihan")]
    pub invoice_number: String,
    /// `"<bank name> <number>"` for every active VA, joined by `/`.
    #[serde(rename = "rekening")]
    pub accounts: String,
    /// The same list as an HTML `<ul>`.
    #[serde(rename = "rekeningFull")]
    pub accounts_html: String,
    #[serde(rename = "tanggalTagihan")]
    pub bill_date: String,
    #[serde(rename = "contactinfo")]
    pub contact_info: String,
    #[serde(rename = "contactinfoFull")]
    pub contact_info_full: String,
}

impl ReminderPayload {
    pub fn new(
        bill: &Bill,
        active_vas: &[VirtualAccount],
        contact_info: &str,
        contact_info_full: &str,
    ) -> Self {
        let entries: Vec<String> = active_vas
            .iter()
            .filter_map(|va| {
                va.number
                    .as_deref()
                    .map(|number| format!("{} {}", va.bank.name, number))
            })
            .collect();

        let accounts = entries.join("/");
        let accounts_html = format!(
            "<ul>{}</ul>",
            entries
                .iter()
                .map(|entry| format!("<li>{}</li>", entry))
                .collect::<String>()
        );

        Self {
            amount: bill.amount,
            description: bill.bill_type.name.clone(),
            name: bill.payer.name.clone(),
            email: bill.payer.email.clone(),
            mobile: bill.payer.mobile.clone(),
            invoice_number: bill.number.clone(),
            accounts,
            accounts_html,
            bill_date: bill.bill_date.to_string(),
            contact_info: contact_info.to_string(),
            contact_info_full: contact_info_full.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// PaymentNoticePayload
// ---------------------------------------------------------------------------

/// Body of a human payment notice (payer, finance copy, IT copy).
#[derive(Debug, Clone, Serialize)]
pub struct PaymentNoticePayload {
    #[serde(rename = "contactinfo")]
    pub contact_info: String,
    #[serde(rename = "contactinfoFull")]
    pub contact_info_full: String,
    #[serde(rename = "keterangan")]
    pub description: String,
    #[serde(rename = "nomorTagihan")]
    pub invoice_number: String,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "noHp")]
    pub mobile: String,
    #[serde(rename = "tanggalTagihan")]
    pub bill_date: String,
    #[serde(rename = "nilaiPembayaran")]
    pub amount_paid: Decimal,
    #[serde(rename = "nilaiTagihan")]
    pub amount_due: Decimal,
    /// Bank name the payer transferred through.
    #[serde(rename = "rekening")]
    pub bank_name: String,
    #[serde(rename = "waktu")]
    pub transaction_time: String,
    #[serde(rename = "referensi")]
    pub reference: String,
}

impl PaymentNoticePayload {
    pub fn new(payment: &Payment, contact_info: &str, contact_info_full: &str) -> Self {
        let bill = &payment.bill;
        Self {
            contact_info: contact_info.to_string(),
            contact_info_full: contact_info_full.to_string(),
            description: bill.bill_type.name.clone(),
            invoice_number: bill.number.clone(),
            name: bill.payer.name.clone(),
            mobile: bill.payer.mobile.clone(),
            bill_date: bill.bill_date.to_string(),
            amount_paid: payment.amount,
            amount_due: bill.amount,
            bank_name: payment.bank.name.clone(),
            transaction_time: format_transaction_time(&payment.transaction_time),
            reference: payment.reference.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// PaymentFact
// ---------------------------------------------------------------------------

/// System-of-record echo of a settlement, published for reconciliation.
/// Not a human-readable notice.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentFact {
    #[serde(rename = "bank")]
    pub bank_id: Uuid,
    #[serde(rename = "jenisTagihan")]
    pub bill_type_code: String,
    #[serde(rename = "nomorTagihan")]
    pub invoice_number: String,
    #[serde(rename = "nomorDebitur")]
    pub payer_number: String,
    #[serde(rename = "namaDebitur")]
    pub payer_name: String,
    #[serde(rename = "keteranganTagihan")]
    pub description: String,
    #[serde(rename = "statusTagihan")]
    pub bill_status: String,
    #[serde(rename = "nilaiTagihan")]
    pub amount_due: Decimal,
    #[serde(rename = "nilaiPembayaran")]
    pub amount_paid: Decimal,
    #[serde(rename = "nilaiAkumulasiPembayaran")]
    pub cumulative_paid: Decimal,
    #[serde(rename = "referensiPembayaran")]
    pub reference: String,
    #[serde(rename = "waktuPembayaran")]
    pub transaction_time: String,
    #[serde(rename = "tanggalTagihan")]
    pub bill_date: String,
    #[serde(rename = "tanggalJatuhTempo")]
    pub due_date: String,
}

impl PaymentFact {
    pub fn new(payment: &Payment) -> Self {
        let bill = &payment.bill;
        Self {
            bank_id: payment.bank.id,
            bill_type_code: bill.bill_type.code.clone(),
            invoice_number: bill.number.clone(),
            payer_number: bill.payer.number.clone(),
            payer_name: bill.payer.name.clone(),
            description: bill.description.clone(),
            bill_status: bill.status.to_string(),
            amount_due: bill.amount,
            amount_paid: payment.amount,
            cumulative_paid: bill.amount_paid,
            reference: payment.reference.clone(),
            transaction_time: format_transaction_time(&payment.transaction_time),
            bill_date: bill.bill_date.to_string(),
            due_date: bill.due_date.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
