//! # openspan-codec
//!
//! **Pure wire codec for OpenSpan withdrawal messages.**
//!
//! The codec is the compute plane of finalization — it turns raw remote
//! message bytes into a [`openspan_types::WithdrawalMessage`] and back.
//! It has:
//!
//! - **Zero side effects**: no state, no ledger access, no collaborator calls
//! - **Bit-exact formats**: two legacy wire variants, both supported
//!   indefinitely
//! - **Strict dispatch**: unknown discriminators and length mismatches are
//!   rejected, never guessed at

pub mod wire;

pub use wire::{SEL_BASE_RELEASE, SEL_TOKEN_RELEASE, decode_withdrawal, encode_withdrawal};
