//! # openspan-types
//!
//! Shared types, errors, and configuration for the **OpenSpan** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`DomainId`], [`RemoteTxId`], [`DepositKey`], [`WithdrawalKey`]
//! - **Asset model**: [`AssetId`] with the base-asset sentinel
//! - **Deposit model**: [`PendingDeposit`]
//! - **Withdrawal model**: [`WithdrawalMessage`], [`PlainRelease`], [`WrappedRelease`]
//! - **Dispatch model**: [`ExecutionRequest`], [`RemoteExecutionParams`]
//! - **Configuration**: [`SettlementConfig`]
//! - **Errors**: [`OpenspanError`] with `OS_ERR_` prefix codes
//! - **Constants**: sentinel addresses and wire-format limits

pub mod asset;
pub mod config;
pub mod constants;
pub mod deposit;
pub mod error;
pub mod ids;
pub mod message;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

// Re-export all primary types at crate root for ergonomic imports:
//   use openspan_types::{DomainId, AssetId, WithdrawalMessage, ...};

pub use asset::*;
pub use config::*;
pub use deposit::*;
pub use error::*;
pub use ids::*;
pub use message::*;

// Constants are accessed via `openspan_types::constants::FOO`
// (not re-exported to avoid name collisions).
