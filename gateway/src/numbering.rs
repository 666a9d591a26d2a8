//! # VA Number Derivation
//!
//! Pure, deterministic derivation of virtual-account numbers. The same
//! seed and digit count always yield the same number, so provisioning can
//! be retried any number of times without minting a second account for the
//! same bill: idempotency by construction rather than by bookkeeping.
//!
//! The generator runs **only at creation time**. Update and delete requests
//! re-derive the bank-facing number by stripping the bank's configured
//! prefix from the already-stored number, never by regenerating, which
//! guarantees the number is stable for the lifetime of the VA.

use sha2::{Digest, Sha256};

use crate::model::Bill;

/// Canonical derivation seed for a bill's virtual account: the bill-type
/// code followed by the payer number.
///
/// This order is the contract. Historical senders disagreed on it, and the
/// two orders produce different numbers for the same bill. Any consumer
/// deriving numbers independently must use this one.
pub fn va_seed(bill: &Bill) -> String {
    format!("{}{}", bill.bill_type.code, bill.payer.number)
}

/// Derives a digit string of exactly `length` characters from `seed`.
///
/// SHA-256 over the seed (re-hashed with a round counter when more digits
/// are needed than one digest yields), each byte mapped to a decimal digit.
/// Deterministic and uniform enough that collisions across distinct seeds
/// are a bank-side uniqueness concern, not a practical one.
pub fn generate(seed: &str, length: usize) -> String {
    let mut digits = String::with_capacity(length);
    let mut round: u32 = 0;
    while digits.len() < length {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        hasher.update(round.to_be_bytes());
        for byte in hasher.finalize() {
            if digits.len() == length {
                break;
            }
            digits.push(char::from(b'0' + byte % 10));
        }
        round += 1;
    }
    digits
}

/// Strips a bank's institutional prefix from a stored VA number, yielding
/// the account number the bank expects on update/delete requests.
///
/// Returns `None` when the stored number is too short to contain the
/// prefix, a data-integrity problem the caller must surface, not mask.
pub fn strip_bank_prefix(stored: &str, prefix_digits: usize) -> Option<&str> {
    stored.get(prefix_digits..).filter(|rest| !rest.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
