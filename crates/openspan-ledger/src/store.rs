//! The single consistency-scoped container for all durable settlement state.
//!
//! Three maps constitute the engine's durable state: the per-domain escrow
//! balances, the pending-deposit set, and the finalized-withdrawal marks.
//! They all live in one `SettlementStore` so that atomicity across them is
//! structural: every cross-map mutation goes through one `&mut self` method
//! and either fully happens or fully doesn't.

use std::collections::{HashMap, HashSet};

use alloy_primitives::U256;
use openspan_types::{
    DepositKey, DomainId, OpenspanError, PendingDeposit, Result, WithdrawalKey,
};

use crate::conservation::Conservation;
use crate::escrow::EscrowLedger;

/// Durable settlement state: escrow ledger + pending deposits +
/// finalized-withdrawal marks.
#[derive(Debug, Default)]
pub struct SettlementStore {
    /// Domain-level escrow balances and the unmetered switch.
    ledger: EscrowLedger,
    /// Cumulative credit/debit totals backing the conservation invariant.
    conservation: Conservation,
    /// Escrowed deposits awaiting their remote outcome.
    pending: HashMap<DepositKey, PendingDeposit>,
    /// Positions whose withdrawal has been finalized. Monotonic: marks are
    /// never unset.
    finalized: HashSet<WithdrawalKey>,
}

impl SettlementStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------
    // Escrow ledger
    // -----------------------------------------------------------------

    /// Credit the domain's escrow balance (no-op when unmetered).
    pub fn credit_escrow(&mut self, domain: DomainId, amount: U256) {
        if !self.ledger.is_unmetered(domain) {
            self.conservation.record_credit(domain, amount);
        }
        self.ledger.credit(domain, amount);
    }

    /// Debit the domain's escrow balance (no-op when unmetered).
    ///
    /// # Errors
    /// Returns [`OpenspanError::InsufficientEscrow`] if the metered balance
    /// is below `amount`; nothing is recorded on failure.
    pub fn debit_escrow(&mut self, domain: DomainId, amount: U256) -> Result<()> {
        self.ledger.debit(domain, amount)?;
        if !self.ledger.is_unmetered(domain) {
            self.conservation.record_debit(domain, amount);
        }
        Ok(())
    }

    /// Permanently disable escrow accounting for `domain`. Idempotent.
    pub fn set_unmetered(&mut self, domain: DomainId) {
        self.ledger.set_unmetered(domain);
    }

    /// Whether the domain's accounting is disabled.
    #[must_use]
    pub fn is_unmetered(&self, domain: DomainId) -> bool {
        self.ledger.is_unmetered(domain)
    }

    /// The escrowed balance for a domain.
    #[must_use]
    pub fn escrowed(&self, domain: DomainId) -> U256 {
        self.ledger.balance(domain)
    }

    /// Verify the ledger conservation invariant for a metered domain.
    ///
    /// # Errors
    /// Returns [`OpenspanError::EscrowInvariantViolation`] if the live
    /// balance diverges from cumulative credits minus debits.
    pub fn verify_conservation(&self, domain: DomainId) -> Result<()> {
        if self.ledger.is_unmetered(domain) {
            return Ok(());
        }
        self.conservation.verify(domain, self.ledger.balance(domain))
    }

    // -----------------------------------------------------------------
    // Pending deposits
    // -----------------------------------------------------------------

    /// Record a pending deposit.
    ///
    /// # Errors
    /// Returns [`OpenspanError::DuplicateDeposit`] if a record already
    /// exists for the key — at most one pending deposit per remote
    /// transaction id.
    pub fn insert_pending(&mut self, key: DepositKey, deposit: PendingDeposit) -> Result<()> {
        if self.pending.contains_key(&key) {
            return Err(OpenspanError::DuplicateDeposit(key.remote_tx));
        }
        self.pending.insert(key, deposit);
        Ok(())
    }

    /// Remove and return the pending deposit for `key`.
    ///
    /// The record is gone the moment this returns, which is what makes a
    /// second reclamation attempt fail with `NoSuchDeposit`.
    ///
    /// # Errors
    /// Returns [`OpenspanError::NoSuchDeposit`] if no record exists.
    pub fn take_pending(&mut self, key: &DepositKey) -> Result<PendingDeposit> {
        self.pending
            .remove(key)
            .ok_or(OpenspanError::NoSuchDeposit(key.remote_tx))
    }

    /// Look up a pending deposit without removing it.
    #[must_use]
    pub fn pending(&self, key: &DepositKey) -> Option<&PendingDeposit> {
        self.pending.get(key)
    }

    /// Number of pending deposits.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    // -----------------------------------------------------------------
    // Finalized-withdrawal marks
    // -----------------------------------------------------------------

    /// Mark a withdrawal position as finalized.
    ///
    /// # Errors
    /// Returns [`OpenspanError::AlreadyFinalized`] if the mark is already
    /// set. Marks are monotonic — never unset.
    pub fn mark_finalized(&mut self, key: WithdrawalKey) -> Result<()> {
        if !self.finalized.insert(key) {
            return Err(OpenspanError::AlreadyFinalized(key));
        }
        Ok(())
    }

    /// Whether the withdrawal position has been finalized.
    #[must_use]
    pub fn is_finalized(&self, key: &WithdrawalKey) -> bool {
        self.finalized.contains(key)
    }

    /// Number of finalized withdrawals.
    #[must_use]
    pub fn finalized_count(&self) -> usize {
        self.finalized.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openspan_types::test_helpers::{addr, amt, remote_tx, token};

    fn key(seq: u64) -> DepositKey {
        DepositKey::new(addr(0x01), token(0x22), remote_tx(7, seq))
    }

    #[test]
    fn insert_and_take_pending() {
        let mut store = SettlementStore::new();
        store
            .insert_pending(key(0), PendingDeposit::new(DomainId(7), amt(1000)))
            .unwrap();
        assert_eq!(store.pending_count(), 1);
        assert_eq!(store.pending(&key(0)).unwrap().amount, amt(1000));

        let dep = store.take_pending(&key(0)).unwrap();
        assert_eq!(dep.amount, amt(1000));
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn duplicate_pending_rejected() {
        let mut store = SettlementStore::new();
        store
            .insert_pending(key(0), PendingDeposit::new(DomainId(7), amt(1)))
            .unwrap();
        let err = store
            .insert_pending(key(0), PendingDeposit::new(DomainId(7), amt(2)))
            .unwrap_err();
        assert!(matches!(err, OpenspanError::DuplicateDeposit(_)));
        // Original record untouched.
        assert_eq!(store.pending(&key(0)).unwrap().amount, amt(1));
    }

    #[test]
    fn take_absent_pending_fails() {
        let mut store = SettlementStore::new();
        let err = store.take_pending(&key(9)).unwrap_err();
        assert!(matches!(err, OpenspanError::NoSuchDeposit(_)));
    }

    #[test]
    fn second_take_fails() {
        let mut store = SettlementStore::new();
        store
            .insert_pending(key(0), PendingDeposit::new(DomainId(7), amt(1000)))
            .unwrap();
        store.take_pending(&key(0)).unwrap();
        let err = store.take_pending(&key(0)).unwrap_err();
        assert!(matches!(err, OpenspanError::NoSuchDeposit(_)));
    }

    #[test]
    fn mark_finalized_once() {
        let mut store = SettlementStore::new();
        let key = WithdrawalKey::new(DomainId(7), 3, 2);
        assert!(!store.is_finalized(&key));
        store.mark_finalized(key).unwrap();
        assert!(store.is_finalized(&key));
        assert_eq!(store.finalized_count(), 1);

        let err = store.mark_finalized(key).unwrap_err();
        assert!(matches!(err, OpenspanError::AlreadyFinalized(k) if k == key));
        assert!(store.is_finalized(&key), "mark must stay set");
    }

    #[test]
    fn conservation_tracks_store_mutations() {
        let mut store = SettlementStore::new();
        store.credit_escrow(DomainId(7), amt(1000));
        store.debit_escrow(DomainId(7), amt(400)).unwrap();
        assert_eq!(store.escrowed(DomainId(7)), amt(600));
        store.verify_conservation(DomainId(7)).unwrap();
    }

    #[test]
    fn failed_debit_does_not_skew_conservation() {
        let mut store = SettlementStore::new();
        store.credit_escrow(DomainId(7), amt(100));
        assert!(store.debit_escrow(DomainId(7), amt(500)).is_err());
        store.verify_conservation(DomainId(7)).unwrap();
        assert_eq!(store.escrowed(DomainId(7)), amt(100));
    }

    #[test]
    fn unmetered_domain_passes_conservation_trivially() {
        let mut store = SettlementStore::new();
        store.set_unmetered(DomainId(5));
        store.credit_escrow(DomainId(5), amt(1000));
        store.debit_escrow(DomainId(5), amt(5000)).unwrap();
        store.verify_conservation(DomainId(5)).unwrap();
    }
}
