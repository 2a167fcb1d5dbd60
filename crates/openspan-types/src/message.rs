//! Withdrawal message model and cross-domain execution requests.
//!
//! A [`WithdrawalMessage`] is the decoded, transient form of the raw bytes a
//! remote domain emitted for a withdrawal. It is produced once per
//! finalization attempt by the codec and never persisted — the durable
//! exactly-once state is the finalized-withdrawal mark, keyed by position.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{AssetId, DomainId};

/// Release of an asset directly to its receiver.
///
/// Covers both wire shapes that name a receiver and an amount: the base
/// asset short form (Variant A, 56 bytes) and the legacy token form
/// (Variant B, 76 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainRelease {
    /// Account receiving the funds on the home domain.
    pub receiver: Address,
    /// Asset to release ([`AssetId::BASE`] for Variant A).
    pub asset: AssetId,
    /// Amount to release.
    pub amount: U256,
}

/// Release of the base asset through the settlement contract itself, with an
/// optional wrap into the tokenized representation before handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedRelease {
    /// Final receiver of the (possibly wrapped) funds.
    pub receiver: Address,
    /// Amount of base asset to release.
    pub amount: U256,
    /// Remote account that originated the withdrawal. Must match the
    /// registered counterpart for the domain; the codec enforces this.
    pub origin_sender: Address,
    /// Whether to wrap the base asset before releasing it.
    pub wrap: bool,
}

/// A withdrawal message decoded from raw remote-domain bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalMessage {
    /// Direct release to the receiver (Variant A short form or Variant B).
    Plain(PlainRelease),
    /// Base-asset release routed through the settlement contract
    /// (Variant A long form, 96 bytes).
    Wrapped(WrappedRelease),
}

impl WithdrawalMessage {
    /// The amount this message releases.
    #[must_use]
    pub fn amount(&self) -> U256 {
        match self {
            Self::Plain(m) => m.amount,
            Self::Wrapped(m) => m.amount,
        }
    }

    /// The final receiver of the released funds.
    #[must_use]
    pub fn receiver(&self) -> Address {
        match self {
            Self::Plain(m) => m.receiver,
            Self::Wrapped(m) => m.receiver,
        }
    }

    /// Whether this message releases the native base asset.
    #[must_use]
    pub fn is_base_asset(&self) -> bool {
        match self {
            Self::Plain(m) => m.asset.is_base(),
            Self::Wrapped(_) => true,
        }
    }
}

/// Caller-supplied parameters for the remote leg of a deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteExecutionParams {
    /// Domain to execute on.
    pub domain: DomainId,
    /// Calldata for the remote execution.
    pub calldata: Vec<u8>,
    /// Total gas limit for the remote transaction.
    pub gas_limit: u64,
    /// Gas allowance per unit of published data.
    pub gas_per_unit_limit: u64,
    /// Account refunded for unused remote gas.
    pub refund_recipient: Address,
}

/// A cross-domain execution request handed to the dispatcher.
///
/// The dispatcher answers with the opaque [`crate::RemoteTxId`] under which
/// the pending deposit is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Target domain.
    pub domain: DomainId,
    /// Receiver of the funds on the remote domain.
    pub receiver: Address,
    /// Asset being moved.
    pub asset: AssetId,
    /// Amount being moved.
    pub amount: U256,
    /// Calldata for the remote execution.
    pub calldata: Vec<u8>,
    /// Total gas limit for the remote transaction.
    pub gas_limit: u64,
    /// Gas allowance per unit of published data.
    pub gas_per_unit_limit: u64,
    /// Account refunded for unused remote gas.
    pub refund_recipient: Address,
}

impl ExecutionRequest {
    /// Assemble a request from deposit arguments and remote parameters.
    #[must_use]
    pub fn for_deposit(
        receiver: Address,
        asset: AssetId,
        amount: U256,
        params: RemoteExecutionParams,
    ) -> Self {
        Self {
            domain: params.domain,
            receiver,
            asset,
            amount,
            calldata: params.calldata,
            gas_limit: params.gas_limit,
            gas_per_unit_limit: params.gas_per_unit_limit,
            refund_recipient: params.refund_recipient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_accessors() {
        let msg = WithdrawalMessage::Plain(PlainRelease {
            receiver: Address::new([0x01; 20]),
            asset: AssetId::BASE,
            amount: U256::from(500),
        });
        assert_eq!(msg.amount(), U256::from(500));
        assert_eq!(msg.receiver(), Address::new([0x01; 20]));
        assert!(msg.is_base_asset());
    }

    #[test]
    fn token_release_is_not_base() {
        let msg = WithdrawalMessage::Plain(PlainRelease {
            receiver: Address::new([0x01; 20]),
            asset: AssetId::token(Address::new([0x22; 20])),
            amount: U256::from(1),
        });
        assert!(!msg.is_base_asset());
    }

    #[test]
    fn wrapped_message_is_base() {
        let msg = WithdrawalMessage::Wrapped(WrappedRelease {
            receiver: Address::new([0x02; 20]),
            amount: U256::from(9),
            origin_sender: Address::new([0x03; 20]),
            wrap: true,
        });
        assert!(msg.is_base_asset());
        assert_eq!(msg.receiver(), Address::new([0x02; 20]));
    }

    #[test]
    fn request_for_deposit_carries_params() {
        let params = RemoteExecutionParams {
            domain: DomainId(7),
            calldata: vec![0xde, 0xad],
            gas_limit: 2_000_000,
            gas_per_unit_limit: 800,
            refund_recipient: Address::new([0x04; 20]),
        };
        let req = ExecutionRequest::for_deposit(
            Address::new([0x05; 20]),
            AssetId::BASE,
            U256::from(1000),
            params,
        );
        assert_eq!(req.domain, DomainId(7));
        assert_eq!(req.amount, U256::from(1000));
        assert_eq!(req.calldata, vec![0xde, 0xad]);
        assert_eq!(req.refund_recipient, Address::new([0x04; 20]));
    }
}
