//! Wire format of remote-originated withdrawal messages.
//!
//! Two historically-coexisting variants, dispatched on a 4-byte leading
//! discriminator. Both remain supported indefinitely: messages already
//! emitted by remote domains must stay finalizable.
//!
//! ```text
//! Variant A (base-asset release):
//!   sel(4) ‖ receiver(20) ‖ amount(32 BE)                          = 56 bytes
//!   If receiver == settlement identity, the wrapped long form:
//!   sel(4) ‖ identity(20) ‖ amount(32) ‖ origin(20) ‖ receiver(20) = 96 bytes
//!
//! Variant B (legacy token release):
//!   sel(4) ‖ receiver(20) ‖ asset(20) ‖ amount(32 BE)              = 76 bytes
//! ```
//!
//! Decoding and encoding are pure and mutually inverse on the valid message
//! space. Any other discriminator, any length mismatch for a matched
//! discriminator, and anything shorter than 56 bytes is malformed.

use alloy_primitives::{Address, U256};
use openspan_types::{
    AssetId, OpenspanError, PlainRelease, Result, WithdrawalMessage, WrappedRelease,
    constants::MIN_WITHDRAWAL_MESSAGE_LEN,
};

/// Discriminator of Variant A (base-asset release, plain or wrapped).
pub const SEL_BASE_RELEASE: [u8; 4] = [0x6c, 0x09, 0x60, 0xf9];

/// Discriminator of Variant B (legacy token release).
pub const SEL_TOKEN_RELEASE: [u8; 4] = [0x11, 0xa2, 0xcc, 0xc1];

const VARIANT_A_PLAIN_LEN: usize = 56;
const VARIANT_A_WRAPPED_LEN: usize = 96;
const VARIANT_B_LEN: usize = 76;

fn malformed(reason: impl Into<String>) -> OpenspanError {
    OpenspanError::MalformedMessage {
        reason: reason.into(),
    }
}

fn read_address(raw: &[u8], offset: usize) -> Address {
    Address::from_slice(&raw[offset..offset + 20])
}

fn read_amount(raw: &[u8], offset: usize) -> U256 {
    U256::from_be_slice(&raw[offset..offset + 32])
}

/// Decode a raw withdrawal message.
///
/// `identity` is the settlement contract's own account; a Variant A message
/// addressed to it is the wrapped long form. `counterpart` is the registered
/// remote bridge for the originating domain, required to validate the origin
/// sender of a wrapped message.
///
/// # Errors
/// Returns [`OpenspanError::MalformedMessage`] on any structural violation.
pub fn decode_withdrawal(
    raw: &[u8],
    identity: Address,
    counterpart: Option<Address>,
) -> Result<WithdrawalMessage> {
    if raw.len() < MIN_WITHDRAWAL_MESSAGE_LEN {
        return Err(malformed(format!(
            "message too short: {} bytes, minimum {MIN_WITHDRAWAL_MESSAGE_LEN}",
            raw.len()
        )));
    }

    let mut selector = [0u8; 4];
    selector.copy_from_slice(&raw[..4]);
    match selector {
        SEL_BASE_RELEASE => decode_base_release(raw, identity, counterpart),
        SEL_TOKEN_RELEASE => decode_token_release(raw),
        _ => Err(malformed(format!(
            "unknown discriminator 0x{:02x}{:02x}{:02x}{:02x}",
            selector[0], selector[1], selector[2], selector[3]
        ))),
    }
}

fn decode_base_release(
    raw: &[u8],
    identity: Address,
    counterpart: Option<Address>,
) -> Result<WithdrawalMessage> {
    let receiver = read_address(raw, 4);
    let amount = read_amount(raw, 24);

    if receiver == identity {
        // Wrapped long form: origin sender + replacement final receiver.
        if raw.len() != VARIANT_A_WRAPPED_LEN {
            return Err(malformed(format!(
                "wrapped release must be {VARIANT_A_WRAPPED_LEN} bytes, got {}",
                raw.len()
            )));
        }
        let origin_sender = read_address(raw, 56);
        let final_receiver = read_address(raw, 76);
        match counterpart {
            Some(expected) if expected == origin_sender => {}
            _ => {
                return Err(malformed(format!(
                    "wrapped release origin {origin_sender} is not the registered counterpart"
                )));
            }
        }
        return Ok(WithdrawalMessage::Wrapped(WrappedRelease {
            receiver: final_receiver,
            amount,
            origin_sender,
            wrap: true,
        }));
    }

    if raw.len() != VARIANT_A_PLAIN_LEN {
        return Err(malformed(format!(
            "base release must be {VARIANT_A_PLAIN_LEN} bytes, got {}",
            raw.len()
        )));
    }
    Ok(WithdrawalMessage::Plain(PlainRelease {
        receiver,
        asset: AssetId::BASE,
        amount,
    }))
}

fn decode_token_release(raw: &[u8]) -> Result<WithdrawalMessage> {
    if raw.len() != VARIANT_B_LEN {
        return Err(malformed(format!(
            "token release must be {VARIANT_B_LEN} bytes, got {}",
            raw.len()
        )));
    }
    let receiver = read_address(raw, 4);
    let asset = AssetId::token(read_address(raw, 24));
    if asset.is_base() {
        return Err(malformed(
            "token release must not name the base-asset sentinel",
        ));
    }
    let amount = read_amount(raw, 44);
    Ok(WithdrawalMessage::Plain(PlainRelease {
        receiver,
        asset,
        amount,
    }))
}

/// Encode a withdrawal message back to its wire form.
///
/// Exact inverse of [`decode_withdrawal`]: a base-asset plain release takes
/// the 56-byte Variant A shape, a token release the 76-byte Variant B shape,
/// and a wrapped release the 96-byte Variant A long form (whose first
/// receiver field is `identity`).
#[must_use]
pub fn encode_withdrawal(message: &WithdrawalMessage, identity: Address) -> Vec<u8> {
    match message {
        WithdrawalMessage::Plain(m) if m.asset.is_base() => {
            let mut out = Vec::with_capacity(VARIANT_A_PLAIN_LEN);
            out.extend_from_slice(&SEL_BASE_RELEASE);
            out.extend_from_slice(m.receiver.as_slice());
            out.extend_from_slice(&m.amount.to_be_bytes::<32>());
            out
        }
        WithdrawalMessage::Plain(m) => {
            let mut out = Vec::with_capacity(VARIANT_B_LEN);
            out.extend_from_slice(&SEL_TOKEN_RELEASE);
            out.extend_from_slice(m.receiver.as_slice());
            out.extend_from_slice(m.asset.address().as_slice());
            out.extend_from_slice(&m.amount.to_be_bytes::<32>());
            out
        }
        WithdrawalMessage::Wrapped(m) => {
            let mut out = Vec::with_capacity(VARIANT_A_WRAPPED_LEN);
            out.extend_from_slice(&SEL_BASE_RELEASE);
            out.extend_from_slice(identity.as_slice());
            out.extend_from_slice(&m.amount.to_be_bytes::<32>());
            out.extend_from_slice(m.origin_sender.as_slice());
            out.extend_from_slice(m.receiver.as_slice());
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openspan_types::test_helpers::{addr, amt};

    const IDENTITY: u8 = 0xAA;
    const COUNTERPART: u8 = 0xBB;

    fn decode(raw: &[u8]) -> Result<WithdrawalMessage> {
        decode_withdrawal(raw, addr(IDENTITY), Some(addr(COUNTERPART)))
    }

    fn base_release_bytes(receiver: Address, amount: U256) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(&SEL_BASE_RELEASE);
        raw.extend_from_slice(receiver.as_slice());
        raw.extend_from_slice(&amount.to_be_bytes::<32>());
        raw
    }

    fn token_release_bytes(receiver: Address, asset: Address, amount: U256) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(&SEL_TOKEN_RELEASE);
        raw.extend_from_slice(receiver.as_slice());
        raw.extend_from_slice(asset.as_slice());
        raw.extend_from_slice(&amount.to_be_bytes::<32>());
        raw
    }

    fn wrapped_release_bytes(origin: Address, receiver: Address, amount: U256) -> Vec<u8> {
        let mut raw = base_release_bytes(addr(IDENTITY), amount);
        raw.extend_from_slice(origin.as_slice());
        raw.extend_from_slice(receiver.as_slice());
        raw
    }

    #[test]
    fn decodes_plain_base_release() {
        let raw = base_release_bytes(addr(0x01), amt(500));
        let msg = decode(&raw).unwrap();
        assert_eq!(
            msg,
            WithdrawalMessage::Plain(PlainRelease {
                receiver: addr(0x01),
                asset: AssetId::BASE,
                amount: amt(500),
            })
        );
    }

    #[test]
    fn decodes_legacy_token_release() {
        let raw = token_release_bytes(addr(0x01), addr(0x22), amt(500));
        assert_eq!(raw.len(), 76);
        let msg = decode(&raw).unwrap();
        assert_eq!(
            msg,
            WithdrawalMessage::Plain(PlainRelease {
                receiver: addr(0x01),
                asset: AssetId::token(addr(0x22)),
                amount: amt(500),
            })
        );
    }

    #[test]
    fn decodes_wrapped_release() {
        let raw = wrapped_release_bytes(addr(COUNTERPART), addr(0x05), amt(77));
        assert_eq!(raw.len(), 96);
        let msg = decode(&raw).unwrap();
        assert_eq!(
            msg,
            WithdrawalMessage::Wrapped(WrappedRelease {
                receiver: addr(0x05),
                amount: amt(77),
                origin_sender: addr(COUNTERPART),
                wrap: true,
            })
        );
    }

    #[test]
    fn wrapped_release_rejects_foreign_origin() {
        let raw = wrapped_release_bytes(addr(0xCC), addr(0x05), amt(77));
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, OpenspanError::MalformedMessage { .. }));
    }

    #[test]
    fn wrapped_release_rejects_missing_counterpart() {
        let raw = wrapped_release_bytes(addr(COUNTERPART), addr(0x05), amt(77));
        let err = decode_withdrawal(&raw, addr(IDENTITY), None).unwrap_err();
        assert!(matches!(err, OpenspanError::MalformedMessage { .. }));
    }

    #[test]
    fn wrapped_receiver_with_short_length_is_malformed() {
        // Receiver equals the identity but no trailing fields follow.
        let raw = base_release_bytes(addr(IDENTITY), amt(1));
        assert_eq!(raw.len(), 56);
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, OpenspanError::MalformedMessage { .. }));
    }

    #[test]
    fn short_messages_are_malformed() {
        for len in [0, 1, 4, 20, 55] {
            let raw = vec![0u8; len];
            let err = decode(&raw).unwrap_err();
            assert!(
                matches!(err, OpenspanError::MalformedMessage { .. }),
                "len {len} should be malformed"
            );
        }
    }

    #[test]
    fn unknown_discriminator_is_malformed() {
        let mut raw = base_release_bytes(addr(0x01), amt(1));
        raw[0] = 0xFF;
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, OpenspanError::MalformedMessage { .. }));
    }

    #[test]
    fn length_mismatch_for_matched_discriminator_is_malformed() {
        // Variant A with a trailing byte.
        let mut raw = base_release_bytes(addr(0x01), amt(1));
        raw.push(0x00);
        assert!(decode(&raw).is_err());

        // Variant B truncated to Variant A length.
        let raw = token_release_bytes(addr(0x01), addr(0x22), amt(1));
        assert!(decode(&raw[..56]).is_err());

        // Variant B with a trailing byte.
        let mut raw = token_release_bytes(addr(0x01), addr(0x22), amt(1));
        raw.push(0x00);
        assert!(decode(&raw).is_err());
    }

    #[test]
    fn token_release_naming_base_sentinel_is_malformed() {
        let raw = token_release_bytes(addr(0x01), AssetId::BASE.address(), amt(1));
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, OpenspanError::MalformedMessage { .. }));
    }

    #[test]
    fn round_trip_all_variants() {
        let plain = base_release_bytes(addr(0x01), U256::MAX);
        let token = token_release_bytes(addr(0x02), addr(0x33), amt(123_456));
        let wrapped = wrapped_release_bytes(addr(COUNTERPART), addr(0x04), amt(9));

        for raw in [plain, token, wrapped] {
            let msg = decode(&raw).unwrap();
            let encoded = encode_withdrawal(&msg, addr(IDENTITY));
            assert_eq!(encoded, raw, "decode-encode must reproduce the bytes");
        }
    }

    #[test]
    fn encode_decode_is_identity_on_messages() {
        let messages = [
            WithdrawalMessage::Plain(PlainRelease {
                receiver: addr(0x01),
                asset: AssetId::BASE,
                amount: amt(1000),
            }),
            WithdrawalMessage::Plain(PlainRelease {
                receiver: addr(0x02),
                asset: AssetId::token(addr(0x44)),
                amount: amt(2),
            }),
            WithdrawalMessage::Wrapped(WrappedRelease {
                receiver: addr(0x03),
                amount: amt(3),
                origin_sender: addr(COUNTERPART),
                wrap: true,
            }),
        ];
        for msg in messages {
            let raw = encode_withdrawal(&msg, addr(IDENTITY));
            let back = decode(&raw).unwrap();
            assert_eq!(back, msg);
        }
    }

    #[test]
    fn amount_is_big_endian() {
        let raw = base_release_bytes(addr(0x01), amt(0x0102));
        assert_eq!(raw[54], 0x01);
        assert_eq!(raw[55], 0x02);
    }
}
