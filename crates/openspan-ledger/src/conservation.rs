//! Escrow conservation invariant checker.
//!
//! Mathematical invariant enforced for every metered domain:
//! ```text
//! ∀ domain: balance(domain) == Σ(credits) - Σ(debits)
//! ```
//!
//! If this invariant ever breaks, something has gone catastrophically wrong
//! in the settlement engine — the checker exists so test suites and
//! operators can treat a mismatch as a hard failure rather than a normal
//! error path.

use std::collections::HashMap;

use alloy_primitives::U256;
use openspan_types::{DomainId, OpenspanError, Result};

/// Tracks cumulative escrow credits and debits per domain and validates
/// conservation against the live ledger balance.
#[derive(Debug, Default)]
pub struct Conservation {
    /// Total credits per domain since genesis.
    credits: HashMap<DomainId, U256>,
    /// Total debits per domain since genesis.
    debits: HashMap<DomainId, U256>,
}

impl Conservation {
    /// Create a new conservation tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an escrow credit.
    pub fn record_credit(&mut self, domain: DomainId, amount: U256) {
        let total = self.credits.entry(domain).or_insert(U256::ZERO);
        *total = total
            .checked_add(amount)
            .unwrap_or_else(|| panic!("cumulative credit overflow for {domain}"));
    }

    /// Record an escrow debit.
    pub fn record_debit(&mut self, domain: DomainId, amount: U256) {
        let total = self.debits.entry(domain).or_insert(U256::ZERO);
        *total = total
            .checked_add(amount)
            .unwrap_or_else(|| panic!("cumulative debit overflow for {domain}"));
    }

    /// Expected balance for a domain: credits - debits.
    #[must_use]
    pub fn expected_balance(&self, domain: DomainId) -> U256 {
        let credited = self.credits.get(&domain).copied().unwrap_or(U256::ZERO);
        let debited = self.debits.get(&domain).copied().unwrap_or(U256::ZERO);
        credited.saturating_sub(debited)
    }

    /// Verify that the actual ledger balance matches credits - debits.
    ///
    /// # Errors
    /// Returns [`OpenspanError::EscrowInvariantViolation`] if actual ≠
    /// expected.
    pub fn verify(&self, domain: DomainId, actual: U256) -> Result<()> {
        let expected = self.expected_balance(domain);
        if actual != expected {
            return Err(OpenspanError::EscrowInvariantViolation {
                reason: format!(
                    "{domain}: actual balance {actual} != expected {expected} \
                     (credits={}, debits={})",
                    self.credits.get(&domain).copied().unwrap_or(U256::ZERO),
                    self.debits.get(&domain).copied().unwrap_or(U256::ZERO),
                ),
            });
        }
        Ok(())
    }

    /// Total credits for a domain.
    #[must_use]
    pub fn total_credits(&self, domain: DomainId) -> U256 {
        self.credits.get(&domain).copied().unwrap_or(U256::ZERO)
    }

    /// Total debits for a domain.
    #[must_use]
    pub fn total_debits(&self, domain: DomainId) -> U256 {
        self.debits.get(&domain).copied().unwrap_or(U256::ZERO)
    }
}
