//! Fixture constructors for tests. Compiled only with the `test-helpers`
//! feature.

use alloy_primitives::{Address, U256};
use rand::RngCore;

use crate::{AssetId, DomainId, RemoteTxId};

/// Deterministic address whose bytes are all `tag`.
#[must_use]
pub fn addr(tag: u8) -> Address {
    Address::new([tag; 20])
}

/// Deterministic token asset whose address bytes are all `tag`.
#[must_use]
pub fn token(tag: u8) -> AssetId {
    AssetId::token(addr(tag))
}

/// Random remote transaction id (for tests that only need uniqueness).
#[must_use]
pub fn random_remote_tx() -> RemoteTxId {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    RemoteTxId::from_bytes(bytes)
}

/// Deterministic remote transaction id for `(domain, sequence)`.
#[must_use]
pub fn remote_tx(domain: u64, sequence: u64) -> RemoteTxId {
    RemoteTxId::derive(DomainId(domain), sequence)
}

/// Shorthand `U256` amount.
#[must_use]
pub fn amt(n: u64) -> U256 {
    U256::from(n)
}
