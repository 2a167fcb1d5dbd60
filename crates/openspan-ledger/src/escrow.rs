//! Per-domain escrow balance accounting.
//!
//! Each metered domain carries a single aggregate balance: funds currently
//! escrowed on its behalf. All mutations are atomic: either the full
//! operation succeeds or the balance is unchanged. A domain may be switched
//! into unmetered mode, which permanently disables its accounting.

use std::collections::{HashMap, HashSet};

use alloy_primitives::U256;
use openspan_types::{DomainId, OpenspanError, Result};

/// The escrow ledger: source of truth for domain-level escrowed balances.
///
/// Debits must be issued strictly before any external fund transfer for the
/// same logical operation, so a reentered call observes the already-debited
/// balance.
#[derive(Debug, Default)]
pub struct EscrowLedger {
    /// Escrowed balance per metered domain.
    balances: HashMap<DomainId, U256>,
    /// Domains whose accounting is permanently disabled.
    unmetered: HashSet<DomainId>,
}

impl EscrowLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase the domain's escrowed balance. No-op for unmetered domains.
    ///
    /// # Panics
    /// Panics on balance overflow — an overflowing escrow total is a fatal
    /// consistency failure, not a recoverable condition.
    pub fn credit(&mut self, domain: DomainId, amount: U256) {
        if self.unmetered.contains(&domain) {
            return;
        }
        let balance = self.balances.entry(domain).or_insert(U256::ZERO);
        *balance = balance
            .checked_add(amount)
            .unwrap_or_else(|| panic!("escrow balance overflow for {domain}"));
    }

    /// Decrease the domain's escrowed balance. No-op for unmetered domains.
    ///
    /// # Errors
    /// Returns [`OpenspanError::InsufficientEscrow`] if the metered balance
    /// is below `amount`. The balance is unchanged on failure.
    pub fn debit(&mut self, domain: DomainId, amount: U256) -> Result<()> {
        if self.unmetered.contains(&domain) {
            return Ok(());
        }
        let current = self.balances.get(&domain).copied().unwrap_or(U256::ZERO);
        let remaining =
            current
                .checked_sub(amount)
                .ok_or(OpenspanError::InsufficientEscrow {
                    domain,
                    needed: amount,
                    escrowed: current,
                })?;
        self.balances.insert(domain, remaining);
        Ok(())
    }

    /// Permanently disable accounting for `domain`. Idempotent.
    ///
    /// The monotonic switch drops any tracked balance: no invariant is
    /// maintained for an unmetered domain.
    pub fn set_unmetered(&mut self, domain: DomainId) {
        if self.unmetered.insert(domain) {
            self.balances.remove(&domain);
            tracing::info!(domain = %domain, "escrow accounting disabled");
        }
    }

    /// Whether the domain's accounting is disabled.
    #[must_use]
    pub fn is_unmetered(&self, domain: DomainId) -> bool {
        self.unmetered.contains(&domain)
    }

    /// The escrowed balance for a metered domain (zero if never credited).
    #[must_use]
    pub fn balance(&self, domain: DomainId) -> U256 {
        self.balances.get(&domain).copied().unwrap_or(U256::ZERO)
    }

    /// Number of metered domains with a tracked balance.
    #[must_use]
    pub fn metered_count(&self) -> usize {
        self.balances.len()
    }
}
