//! The settlement engine: deposit manager + withdrawal finalizer.
//!
//! Every state-mutating entry point follows the same discipline:
//! 1. Acquire the reentrancy latch (released on every exit path)
//! 2. Validate inputs and proofs
//! 3. Mutate the settlement store — atomically, in one borrow
//! 4. Only then call the external transfer collaborator
//!
//! Step 3 strictly preceding step 4 (checks-effects-interactions) is what
//! makes reclamation and finalization exactly-once even if the collaborator
//! re-enters: a nested call observes the already-deleted record or the
//! already-set mark, and is rejected by the latch before touching anything.

use std::cell::RefCell;
use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use openspan_codec::decode_withdrawal;
use openspan_ledger::SettlementStore;
use openspan_types::{
    AssetId, DepositKey, DomainId, ExecutionRequest, OpenspanError, PendingDeposit,
    RemoteExecutionParams, RemoteTxId, Result, SettlementConfig, WithdrawalKey,
    WithdrawalMessage, constants,
};

use crate::latch::ReentryLatch;
use crate::traits::{CrossDomainDispatcher, ProofVerifier, TransferGateway};

/// Settlement engine over a verifier `V`, transfer gateway `G`, and
/// cross-domain dispatcher `D`.
///
/// Models the single serializing execution context: operations run one at a
/// time to completion, and either complete or fail atomically with no
/// partial state change. The engine is deliberately `!Sync`.
pub struct SettlementEngine<V, G, D> {
    /// The settlement contract's own account identity.
    identity: Address,
    /// All durable state, in one consistency-scoped container.
    store: RefCell<SettlementStore>,
    /// Registered remote bridge counterpart per domain.
    counterparts: RefCell<HashMap<DomainId, Address>>,
    /// Process-wide reentrancy latch over all mutating entry points.
    latch: ReentryLatch,
    verifier: V,
    gateway: G,
    dispatcher: D,
}

impl<V, G, D> SettlementEngine<V, G, D>
where
    V: ProofVerifier,
    G: TransferGateway,
    D: CrossDomainDispatcher,
{
    /// Create an engine from a config and its three collaborators.
    #[must_use]
    pub fn new(config: SettlementConfig, verifier: V, gateway: G, dispatcher: D) -> Self {
        let mut store = SettlementStore::new();
        for domain in &config.unmetered {
            store.set_unmetered(*domain);
        }
        let counterparts = config.counterparts.iter().copied().collect();
        Self {
            identity: config.identity,
            store: RefCell::new(store),
            counterparts: RefCell::new(counterparts),
            latch: ReentryLatch::new(),
            verifier,
            gateway,
            dispatcher,
        }
    }

    // -----------------------------------------------------------------
    // Deposit manager
    // -----------------------------------------------------------------

    /// Escrow `amount` of `asset` from `initiator` and dispatch the remote
    /// leg of the deposit.
    ///
    /// The escrow credit and the pending-deposit record are written
    /// atomically, after both external steps (pull and dispatch) have
    /// succeeded — a failure in either leaves the store untouched.
    ///
    /// # Errors
    /// - [`OpenspanError::InvalidDeposit`] for a zero amount
    /// - [`OpenspanError::NonStandardTransfer`] if the gateway delivered a
    ///   different amount than requested
    /// - [`OpenspanError::DuplicateDeposit`] if the dispatcher returned an
    ///   id that is already pending
    /// - [`OpenspanError::Reentered`] on a nested call
    pub fn initiate_deposit(
        &self,
        initiator: Address,
        asset: AssetId,
        amount: U256,
        remote_receiver: Address,
        params: RemoteExecutionParams,
    ) -> Result<RemoteTxId> {
        let _held = self.latch.enter()?;

        if amount.is_zero() {
            return Err(OpenspanError::InvalidDeposit {
                reason: "amount must be greater than zero".into(),
            });
        }
        let domain = params.domain;

        // Step 1: Pull funds. Fee-on-transfer assets deliver less than
        // requested; that mismatch is a hard failure, never absorbed.
        let actual = self.gateway.transfer_in(initiator, asset, amount)?;
        if actual != amount {
            return Err(OpenspanError::NonStandardTransfer {
                expected: amount,
                actual,
            });
        }

        // Step 2: Dispatch the remote execution request.
        let request = ExecutionRequest::for_deposit(remote_receiver, asset, amount, params);
        let remote_tx = self.dispatcher.dispatch(&request)?;

        // Step 3: Record — credit and pending entry in one borrow.
        {
            let mut store = self.store.borrow_mut();
            let key = DepositKey::new(initiator, asset, remote_tx);
            store.insert_pending(key, PendingDeposit::new(domain, amount))?;
            store.credit_escrow(domain, amount);
        }

        tracing::info!(
            domain = %domain,
            remote_tx = %remote_tx,
            asset = %asset,
            amount = %amount,
            "deposit escrowed"
        );
        Ok(remote_tx)
    }

    /// Reclaim the escrowed funds of a deposit whose remote execution is
    /// proven failed. At most once per `(initiator, asset, remote_tx)`:
    /// the record is deleted — and the ledger debited — strictly before the
    /// funds leave custody, so a reentrant second attempt finds nothing.
    ///
    /// # Errors
    /// - [`OpenspanError::NoSuchDeposit`] if no record exists (including
    ///   after a successful first reclamation)
    /// - [`OpenspanError::InvalidProof`] if the failure proof is rejected
    /// - [`OpenspanError::Reentered`] on a nested call
    pub fn reclaim_failed_deposit(
        &self,
        initiator: Address,
        asset: AssetId,
        remote_tx: RemoteTxId,
        proof: &[u8],
    ) -> Result<U256> {
        let _held = self.latch.enter()?;

        let key = DepositKey::new(initiator, asset, remote_tx);
        let deposit = self
            .store
            .borrow()
            .pending(&key)
            .cloned()
            .ok_or(OpenspanError::NoSuchDeposit(remote_tx))?;

        if !self
            .verifier
            .verify_failed_remote_tx(deposit.domain, remote_tx, proof)
        {
            return Err(OpenspanError::InvalidProof {
                context: format!("failure proof for {remote_tx}"),
            });
        }

        // Effects before interaction: debit + delete, then transfer out.
        {
            let mut store = self.store.borrow_mut();
            store.debit_escrow(deposit.domain, deposit.amount)?;
            store.take_pending(&key)?;
        }

        self.gateway
            .transfer_out(initiator, asset, deposit.amount)?;

        tracing::info!(
            domain = %deposit.domain,
            remote_tx = %remote_tx,
            amount = %deposit.amount,
            "failed deposit reclaimed"
        );
        Ok(deposit.amount)
    }

    // -----------------------------------------------------------------
    // Withdrawal finalizer
    // -----------------------------------------------------------------

    /// Finalize a remote-originated withdrawal message.
    ///
    /// 1. Reject if the position is already finalized
    /// 2. Decode the raw message
    /// 3. Verify the inclusion proof against the expected origin sender
    /// 4. Debit the domain's escrow
    /// 5. Set the finalized mark — before the outbound transfer
    /// 6. Release the funds (wrapping the base asset when requested)
    ///
    /// # Errors
    /// - [`OpenspanError::AlreadyFinalized`] on a repeat position,
    ///   regardless of whether the message bytes differ
    /// - [`OpenspanError::MalformedMessage`] on any structural violation
    /// - [`OpenspanError::UnknownDomain`] for a token release from a domain
    ///   with no registered counterpart
    /// - [`OpenspanError::InvalidProof`] if the inclusion proof is rejected
    /// - [`OpenspanError::InsufficientEscrow`] if the metered balance cannot
    ///   cover the amount — a ledger-consistency violation, never an
    ///   ordinary error path
    /// - [`OpenspanError::Reentered`] on a nested call
    pub fn finalize_withdrawal(
        &self,
        domain: DomainId,
        batch_number: u64,
        message_index: u64,
        tx_number_in_batch: u16,
        raw_message: &[u8],
        proof: &[u8],
    ) -> Result<WithdrawalMessage> {
        let _held = self.latch.enter()?;

        let key = WithdrawalKey::new(domain, batch_number, message_index);
        if self.store.borrow().is_finalized(&key) {
            return Err(OpenspanError::AlreadyFinalized(key));
        }

        let counterpart = self.counterparts.borrow().get(&domain).copied();
        let message = decode_withdrawal(raw_message, self.identity, counterpart)?;

        let expected_sender = if message.is_base_asset() {
            constants::BASE_ASSET_SYSTEM_SENDER
        } else {
            counterpart.ok_or(OpenspanError::UnknownDomain(domain))?
        };
        if !self.verifier.verify_inclusion(
            &key,
            tx_number_in_batch,
            expected_sender,
            raw_message,
            proof,
        ) {
            return Err(OpenspanError::InvalidProof {
                context: format!("inclusion proof for {key}"),
            });
        }

        // Effects before interaction: debit + mark, then release.
        {
            let mut store = self.store.borrow_mut();
            if let Err(err) = store.debit_escrow(domain, message.amount()) {
                tracing::warn!(
                    key = %key,
                    amount = %message.amount(),
                    "escrow debit failed at finalization; ledger inconsistency"
                );
                return Err(err);
            }
            store.mark_finalized(key)?;
        }

        match &message {
            WithdrawalMessage::Plain(m) => {
                self.gateway.transfer_out(m.receiver, m.asset, m.amount)?;
            }
            WithdrawalMessage::Wrapped(m) if m.wrap => {
                self.gateway.wrap_out(m.receiver, m.amount)?;
            }
            WithdrawalMessage::Wrapped(m) => {
                self.gateway
                    .transfer_out(m.receiver, AssetId::BASE, m.amount)?;
            }
        }

        tracing::info!(
            key = %key,
            receiver = %message.receiver(),
            amount = %message.amount(),
            "withdrawal finalized"
        );
        Ok(message)
    }

    // -----------------------------------------------------------------
    // Administration
    // -----------------------------------------------------------------

    /// Register (or replace) the remote bridge counterpart for a domain.
    ///
    /// # Errors
    /// Returns [`OpenspanError::Reentered`] on a nested call.
    pub fn register_counterpart(&self, domain: DomainId, counterpart: Address) -> Result<()> {
        let _held = self.latch.enter()?;
        self.counterparts.borrow_mut().insert(domain, counterpart);
        Ok(())
    }

    /// Permanently disable escrow accounting for `domain`. Idempotent.
    ///
    /// # Errors
    /// Returns [`OpenspanError::Reentered`] on a nested call.
    pub fn set_unmetered(&self, domain: DomainId) -> Result<()> {
        let _held = self.latch.enter()?;
        self.store.borrow_mut().set_unmetered(domain);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------

    /// The settlement contract's own identity.
    #[must_use]
    pub fn identity(&self) -> Address {
        self.identity
    }

    /// The escrowed balance for a domain.
    #[must_use]
    pub fn escrowed(&self, domain: DomainId) -> U256 {
        self.store.borrow().escrowed(domain)
    }

    /// Whether the domain's accounting is disabled.
    #[must_use]
    pub fn is_unmetered(&self, domain: DomainId) -> bool {
        self.store.borrow().is_unmetered(domain)
    }

    /// The pending deposit for `key`, if any.
    #[must_use]
    pub fn pending_deposit(&self, key: &DepositKey) -> Option<PendingDeposit> {
        self.store.borrow().pending(key).cloned()
    }

    /// Number of pending deposits.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.store.borrow().pending_count()
    }

    /// Whether the withdrawal position has been finalized.
    #[must_use]
    pub fn is_finalized(&self, key: &WithdrawalKey) -> bool {
        self.store.borrow().is_finalized(key)
    }

    /// Number of finalized withdrawals.
    #[must_use]
    pub fn finalized_count(&self) -> usize {
        self.store.borrow().finalized_count()
    }

    /// Verify the ledger conservation invariant for a domain.
    ///
    /// # Errors
    /// Returns [`OpenspanError::EscrowInvariantViolation`] on divergence.
    pub fn verify_conservation(&self, domain: DomainId) -> Result<()> {
        self.store.borrow().verify_conservation(domain)
    }

    /// The proof verifier collaborator.
    #[must_use]
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// The transfer gateway collaborator.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The cross-domain dispatcher collaborator.
    #[must_use]
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }
}
