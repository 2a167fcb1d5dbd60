//! Error types for the OpenSpan settlement engine.
//!
//! All errors use the `OS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Deposit errors
//! - 2xx: Escrow ledger errors
//! - 3xx: Withdrawal errors
//! - 4xx: Proof errors
//! - 5xx: Codec errors
//! - 6xx: Transfer collaborator errors
//! - 7xx: Reentrancy guard errors
//! - 8xx: Configuration errors
//! - 9xx: General / internal errors
//!
//! Every failure is synchronous and leaves engine state unchanged. The only
//! kinds that signal a bug elsewhere in the system rather than ordinary
//! caller error are [`OpenspanError::Reentered`] and ledger-invariant
//! violations ([`OpenspanError::InsufficientEscrow`] outside an entry check,
//! [`OpenspanError::EscrowInvariantViolation`]).

use alloy_primitives::U256;
use thiserror::Error;

use crate::{DomainId, RemoteTxId, WithdrawalKey};

/// Central error enum for all OpenSpan operations.
#[derive(Debug, Error)]
pub enum OpenspanError {
    // =================================================================
    // Deposit Errors (1xx)
    // =================================================================
    /// No pending deposit exists for the given key. Also the failure mode
    /// of a second reclamation attempt: the record is deleted on first
    /// success.
    #[error("OS_ERR_100: No such pending deposit: {0}")]
    NoSuchDeposit(RemoteTxId),

    /// The deposit request failed validation (zero amount, etc.).
    #[error("OS_ERR_101: Invalid deposit: {reason}")]
    InvalidDeposit { reason: String },

    /// A pending deposit with this remote transaction id already exists.
    #[error("OS_ERR_102: Duplicate pending deposit: {0}")]
    DuplicateDeposit(RemoteTxId),

    // =================================================================
    // Escrow Ledger Errors (2xx)
    // =================================================================
    /// A debit would drive a metered domain balance negative. At a
    /// finalization step this is a consistency violation, never an
    /// ordinary error path.
    #[error("OS_ERR_200: Insufficient escrow for {domain}: need {needed}, escrowed {escrowed}")]
    InsufficientEscrow {
        domain: DomainId,
        needed: U256,
        escrowed: U256,
    },

    /// Cumulative credits minus debits no longer match the live balance —
    /// critical safety alert.
    #[error("OS_ERR_201: Escrow invariant violation: {reason}")]
    EscrowInvariantViolation { reason: String },

    // =================================================================
    // Withdrawal Errors (3xx)
    // =================================================================
    /// The withdrawal at this position has already been finalized and its
    /// funds released.
    #[error("OS_ERR_300: Withdrawal already finalized: {0}")]
    AlreadyFinalized(WithdrawalKey),

    // =================================================================
    // Proof Errors (4xx)
    // =================================================================
    /// The proof verifier rejected the presented inclusion or failure proof.
    #[error("OS_ERR_400: Invalid proof for {context}")]
    InvalidProof { context: String },

    // =================================================================
    // Codec Errors (5xx)
    // =================================================================
    /// The raw withdrawal message violates the wire format.
    #[error("OS_ERR_500: Malformed withdrawal message: {reason}")]
    MalformedMessage { reason: String },

    // =================================================================
    // Transfer Collaborator Errors (6xx)
    // =================================================================
    /// The transfer collaborator delivered a different amount than
    /// requested (fee-on-transfer or otherwise non-standard asset).
    #[error("OS_ERR_600: Non-standard transfer: expected {expected}, received {actual}")]
    NonStandardTransfer { expected: U256, actual: U256 },

    /// The transfer collaborator failed outright.
    #[error("OS_ERR_601: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// The cross-domain dispatcher refused the execution request.
    #[error("OS_ERR_602: Cross-domain dispatch failed: {reason}")]
    DispatchFailed { reason: String },

    // =================================================================
    // Reentrancy Guard Errors (7xx)
    // =================================================================
    /// A mutating entry point was re-entered while another mutating
    /// operation was still inside the latch. Signals a misbehaving
    /// external collaborator, not caller error.
    #[error("OS_ERR_700: Reentrant call into settlement engine rejected")]
    Reentered,

    // =================================================================
    // Configuration Errors (8xx)
    // =================================================================
    /// No remote bridge counterpart is registered for the domain.
    #[error("OS_ERR_800: No counterpart registered for {0}")]
    UnknownDomain(DomainId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OS_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpenspanError>;
