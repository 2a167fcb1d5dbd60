//! # openspan-ledger
//!
//! **State plane**: domain-level escrow accounting and the durable
//! settlement maps.
//!
//! ## Architecture
//!
//! 1. **EscrowLedger**: per-domain aggregate balances with the permanent
//!    unmetered opt-out
//! 2. **Conservation**: cumulative credit/debit totals; the safety net that
//!    turns a ledger divergence into a hard invariant failure
//! 3. **SettlementStore**: one container for all three durable maps
//!    (balances, pending deposits, finalized-withdrawal marks) so cross-map
//!    atomicity is structural
//!
//! The engine crate owns a `SettlementStore` and performs every mutation to
//! it strictly before calling into an external collaborator within the same
//! operation.

pub mod conservation;
pub mod escrow;
pub mod store;

pub use conservation::Conservation;
pub use escrow::EscrowLedger;
pub use store::SettlementStore;
