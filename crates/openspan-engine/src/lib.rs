//! # openspan-engine
//!
//! **Orchestration plane**: the settlement engine proper.
//!
//! ## Architecture
//!
//! The engine sits between callers on the home domain and three external
//! collaborators:
//! 1. **Deposit manager** ([`SettlementEngine::initiate_deposit`] /
//!    [`SettlementEngine::reclaim_failed_deposit`]): escrows funds, records
//!    the pending deposit, and allows exactly-once reclamation once the
//!    remote execution is proven failed
//! 2. **Withdrawal finalizer** ([`SettlementEngine::finalize_withdrawal`]):
//!    verifies inclusion, decodes the message, enforces exactly-once
//!    finalization, and releases funds
//! 3. **Reentrancy guard** ([`ReentryLatch`]): serializes all mutating entry
//!    points against synchronous reentry from collaborator code
//!
//! ## Operation flow
//!
//! ```text
//! caller → latch.enter() → validate/prove → mutate SettlementStore
//!        → TransferGateway (external; reentry rejected) → release latch
//! ```
//!
//! Every mutation to durable state happens strictly before any call into an
//! external collaborator within the same operation.

pub mod engine;
pub mod latch;
pub mod traits;

pub use engine::SettlementEngine;
pub use latch::{Latched, ReentryLatch};
pub use traits::{CrossDomainDispatcher, ProofVerifier, TransferGateway};
