//! System-wide constants for the OpenSpan settlement engine.

use alloy_primitives::Address;

/// Sentinel address representing the native base asset (all `0xEE` bytes).
pub const BASE_ASSET_SENTINEL: Address = Address::new([0xEE; 20]);

/// Fixed system account that originates base-asset withdrawal messages on
/// every remote domain (`0x…800a`). Token withdrawal messages instead
/// originate from the per-domain registered counterpart.
pub const BASE_ASSET_SYSTEM_SENDER: Address = Address::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x80, 0x0a,
]);

/// Minimum valid withdrawal message length (Variant A short form).
pub const MIN_WITHDRAWAL_MESSAGE_LEN: usize = 56;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenSpan";
