//! Payer identity.

use serde::{Deserialize, Serialize};

/// The entity owing a bill.
///
/// The `number` is immutable institutional identity: it participates in
/// VA-number derivation, so changing it after a VA has been provisioned
/// would orphan the bank-side account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    /// Institutional payer number, e.g. a student or member id.
    pub number: String,
    /// Full display name.
    pub name: String,
    /// Notification email address.
    pub email: String,
    /// Notification mobile number.
    pub mobile: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payer_serde_roundtrip() {
        let payer = Payer {
            number: "10001".into(),
            name: "Budi Santoso".into(),
            email: "budi@example.com".into(),
            mobile: "081234567890".into(),
        };
        let json = serde_json::to_string(&payer).unwrap();
        let recovered: Payer = serde_json::from_str(&json).unwrap();
        assert_eq!(payer, recovered);
    }
}
