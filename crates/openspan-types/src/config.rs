//! Configuration for a settlement engine instance.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::DomainId;

/// Static configuration consumed by the engine at construction time.
///
/// Counterparts can also be registered after construction; the config form
/// exists so deployments can be described in one serialized document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// The settlement contract's own account identity on the home domain.
    /// Withdrawal messages addressed to this identity are the wrapped form.
    pub identity: Address,
    /// Registered remote bridge counterpart per domain.
    #[serde(default)]
    pub counterparts: Vec<(DomainId, Address)>,
    /// Domains that start in unmetered mode (escrow accounting disabled).
    #[serde(default)]
    pub unmetered: Vec<DomainId>,
}

impl SettlementConfig {
    /// Config with only an identity, no registrations.
    #[must_use]
    pub fn with_identity(identity: Address) -> Self {
        Self {
            identity,
            counterparts: Vec::new(),
            unmetered: Vec::new(),
        }
    }

    /// The registered counterpart for `domain`, if any.
    #[must_use]
    pub fn counterpart(&self, domain: DomainId) -> Option<Address> {
        self.counterparts
            .iter()
            .find(|(d, _)| *d == domain)
            .map(|(_, addr)| *addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterpart_lookup() {
        let mut cfg = SettlementConfig::with_identity(Address::new([0x01; 20]));
        cfg.counterparts
            .push((DomainId(7), Address::new([0x02; 20])));
        assert_eq!(cfg.counterpart(DomainId(7)), Some(Address::new([0x02; 20])));
        assert_eq!(cfg.counterpart(DomainId(8)), None);
    }

    #[test]
    fn serde_roundtrip() {
        let mut cfg = SettlementConfig::with_identity(Address::new([0x01; 20]));
        cfg.counterparts
            .push((DomainId(1), Address::new([0x02; 20])));
        cfg.unmetered.push(DomainId(9));
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SettlementConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.counterpart(DomainId(1)), Some(Address::new([0x02; 20])));
        assert_eq!(back.unmetered, vec![DomainId(9)]);
    }

    #[test]
    fn missing_fields_default_empty() {
        let json = r#"{"identity":"0x0101010101010101010101010101010101010101"}"#;
        let cfg: SettlementConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.counterparts.is_empty());
        assert!(cfg.unmetered.is_empty());
    }
}
