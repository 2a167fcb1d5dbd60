//! Asset identifiers for the OpenSpan escrow model.
//!
//! Assets are addressed by their home-domain account address. The domain's
//! native base asset has no contract of its own and is represented by the
//! conventional all-`0xEE` sentinel address.

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::constants::BASE_ASSET_SENTINEL;

/// Identifier of a transferable asset.
///
/// Either a token contract address on the home domain, or
/// [`AssetId::BASE`] for the native base asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub Address);

impl AssetId {
    /// The native base asset of the home domain.
    pub const BASE: Self = Self(BASE_ASSET_SENTINEL);

    #[must_use]
    pub fn token(address: Address) -> Self {
        Self(address)
    }

    /// Whether this identifier names the native base asset.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.0 == BASE_ASSET_SENTINEL
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_base() {
            write!(f, "asset:base")
        } else {
            write!(f, "asset:{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_sentinel_is_base() {
        assert!(AssetId::BASE.is_base());
        assert_eq!(AssetId::BASE.address(), Address::new([0xEE; 20]));
    }

    #[test]
    fn token_is_not_base() {
        let asset = AssetId::token(Address::new([0x11; 20]));
        assert!(!asset.is_base());
    }

    #[test]
    fn display_distinguishes_base() {
        assert_eq!(format!("{}", AssetId::BASE), "asset:base");
        let asset = AssetId::token(Address::new([0x11; 20]));
        assert!(format!("{asset}").starts_with("asset:0x"));
    }

    #[test]
    fn serde_roundtrip() {
        let asset = AssetId::token(Address::new([0x42; 20]));
        let json = serde_json::to_string(&asset).unwrap();
        let back: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(asset, back);
    }
}
