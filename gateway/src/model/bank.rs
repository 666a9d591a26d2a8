//! Partner bank master data.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A partner bank whose virtual-account rail the gateway can provision
/// numbers on.
///
/// `va_digits` and `va_prefix_digits` bound the shape of every number
/// generated for or stored against this bank: the bank assigns a fixed
/// institutional prefix of `va_prefix_digits` digits, and the full stored
/// number is `va_digits` digits long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Surrogate id, referenced as `bankId` in outbound VA requests.
    pub id: Uuid,
    /// Unique short code, e.g. `"BSM"`.
    pub code: String,
    /// Display name used in payer-facing notifications.
    pub name: String,
    /// Settlement account the bank sweeps collected funds into.
    pub settlement_account: String,
    /// Holder name on the settlement account.
    pub settlement_account_holder: String,
    /// Total digit count of a virtual account number on this bank's rail.
    pub va_digits: usize,
    /// Leading digits of the stored number that belong to the bank's
    /// institutional prefix, stripped before update/delete requests.
    pub va_prefix_digits: usize,
}
