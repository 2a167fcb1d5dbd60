//! Identifiers used throughout OpenSpan.
//!
//! Domains are small integers assigned at registration time; remote
//! transaction identifiers are opaque 32-byte hashes handed back by the
//! cross-domain dispatcher.

use std::fmt;

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::AssetId;

// ---------------------------------------------------------------------------
// DomainId
// ---------------------------------------------------------------------------

/// Identifier of a remote execution domain connected to this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DomainId(pub u64);

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RemoteTxId
// ---------------------------------------------------------------------------

/// Opaque identifier of a transaction queued for execution on a remote
/// domain. Returned by the cross-domain dispatcher and used as the key of a
/// pending deposit until the remote outcome is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RemoteTxId(pub B256);

impl RemoteTxId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0.0
    }

    /// Deterministic `RemoteTxId` from a domain and a dispatch sequence
    /// number.
    ///
    /// Every dispatcher derives the **exact same** id for the same request
    /// position on the same domain, so deposits recorded on the home side
    /// line up with the ids the remote side reports back.
    #[must_use]
    pub fn derive(domain: DomainId, sequence: u64) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"openspan:remote_tx:v2:");
        hasher.update(domain.0.to_le_bytes());
        hasher.update(sequence.to_le_bytes());
        let hash = hasher.finalize();
        let bytes: [u8; 32] = hash.into();
        Self(B256::new(bytes))
    }

    /// Short hex form for logs.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for RemoteTxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// DepositKey
// ---------------------------------------------------------------------------

/// Composite key of a pending deposit: the initiating account, the escrowed
/// asset, and the remote transaction that must fail before reclamation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepositKey {
    /// Account that initiated the deposit and receives any reclaimed funds.
    pub initiator: Address,
    /// Asset that was escrowed.
    pub asset: AssetId,
    /// Remote transaction carrying the deposit to the other domain.
    pub remote_tx: RemoteTxId,
}

impl DepositKey {
    #[must_use]
    pub fn new(initiator: Address, asset: AssetId, remote_tx: RemoteTxId) -> Self {
        Self {
            initiator,
            asset,
            remote_tx,
        }
    }
}

impl fmt::Display for DepositKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deposit:{}:{}:{}", self.initiator, self.asset, self.remote_tx)
    }
}

// ---------------------------------------------------------------------------
// WithdrawalKey
// ---------------------------------------------------------------------------

/// Composite key of a withdrawal message's position in the remote domain's
/// output: (domain, batch, index within batch).
///
/// The finalized-withdrawal mark is keyed by position, not by message bytes,
/// so two encodings that alias to the same funds cannot both be released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct WithdrawalKey {
    /// Originating remote domain.
    pub domain: DomainId,
    /// Remote batch the message was included in.
    pub batch_number: u64,
    /// Position of the message within the batch.
    pub message_index: u64,
}

impl WithdrawalKey {
    #[must_use]
    pub fn new(domain: DomainId, batch_number: u64, message_index: u64) -> Self {
        Self {
            domain,
            batch_number,
            message_index,
        }
    }
}

impl fmt::Display for WithdrawalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "withdrawal:{}:{}:{}",
            self.domain, self.batch_number, self.message_index
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
