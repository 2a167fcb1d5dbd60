//! Pending-deposit records.
//!
//! A `PendingDeposit` exists if and only if funds for its key are currently
//! escrowed and unreclaimed. It is created atomically with the escrow credit
//! at deposit time and deleted atomically with the reclamation debit — never
//! partially updated.

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainId;

/// The escrowed side of a deposit awaiting its remote outcome.
///
/// Keyed in the store by [`crate::DepositKey`]. The target domain is kept on
/// the record so reclamation debits the same domain balance that the deposit
/// credited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDeposit {
    /// Domain the deposit was dispatched to (and whose balance it credited).
    pub domain: DomainId,
    /// Amount escrowed on the home domain.
    pub amount: U256,
    /// When the deposit was escrowed.
    pub created_at: DateTime<Utc>,
}

impl PendingDeposit {
    #[must_use]
    pub fn new(domain: DomainId, amount: U256) -> Self {
        Self {
            domain,
            amount,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_domain_and_amount() {
        let dep = PendingDeposit::new(DomainId(7), U256::from(1000));
        assert_eq!(dep.domain, DomainId(7));
        assert_eq!(dep.amount, U256::from(1000));
    }

    #[test]
    fn serde_roundtrip() {
        let dep = PendingDeposit::new(DomainId(3), U256::from(42));
        let json = serde_json::to_string(&dep).unwrap();
        let back: PendingDeposit = serde_json::from_str(&json).unwrap();
        assert_eq!(dep, back);
    }
}
