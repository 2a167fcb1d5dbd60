//! External collaborator seams.
//!
//! The engine consumes three collaborators it does not implement: the proof
//! verifier (trusted oracle), the asset transfer gateway, and the
//! cross-domain dispatcher. All trait methods take `&self` so
//! implementations may use interior mutability — and so a misbehaving
//! implementation can *attempt* to re-enter the engine, which is exactly
//! what the reentrancy latch is there to reject.

use alloy_primitives::{Address, U256};
use openspan_types::{AssetId, DomainId, ExecutionRequest, RemoteTxId, Result, WithdrawalKey};

/// Inclusion/failure proof oracle. Authoritative and side-effect-free from
/// the engine's perspective.
pub trait ProofVerifier {
    /// Whether `message` was included at position `key` in the remote
    /// domain's output, sent by `expected_sender`.
    fn verify_inclusion(
        &self,
        key: &WithdrawalKey,
        tx_number_in_batch: u16,
        expected_sender: Address,
        message: &[u8],
        proof: &[u8],
    ) -> bool;

    /// Whether the remote transaction with id `remote_tx` is proven to have
    /// **failed** on `domain`.
    fn verify_failed_remote_tx(&self, domain: DomainId, remote_tx: RemoteTxId, proof: &[u8])
    -> bool;
}

/// Asset custody collaborator. May execute arbitrary code — every call into
/// it is treated as a point where reentry can be attempted.
pub trait TransferGateway {
    /// Pull `amount` of `asset` from `from` into custody. Returns the amount
    /// actually received, which for fee-on-transfer assets can differ from
    /// the requested amount; the engine rejects any mismatch.
    fn transfer_in(&self, from: Address, asset: AssetId, amount: U256) -> Result<U256>;

    /// Release `amount` of `asset` from custody to `to`.
    fn transfer_out(&self, to: Address, asset: AssetId, amount: U256) -> Result<()>;

    /// Release `amount` of the base asset to `to`, wrapped into its
    /// tokenized representation.
    fn wrap_out(&self, to: Address, amount: U256) -> Result<()>;
}

/// Produces cross-domain execution requests and answers with the opaque
/// remote transaction identifier under which the deposit is tracked.
pub trait CrossDomainDispatcher {
    /// Queue `request` for execution on its target domain.
    fn dispatch(&self, request: &ExecutionRequest) -> Result<RemoteTxId>;
}
