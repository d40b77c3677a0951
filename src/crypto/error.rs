// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! Error types for every envelope operation, with enough context for a caller
//! to tell a malformed input apart from an authentication failure.
//!
//! ## Error Variants
//!
//! - **InvalidKey**: key material has the wrong length or bad base64
//! - **KeyAgreementFailed**: well-formed key material that is not a valid scalar or curve point
//! - **InvalidEnvelope**: envelope is not base64 or too short to hold IV and tag
//! - **AuthenticationFailed**: AES-GCM tag did not verify (wrong key or tampered data)
//! - **EncryptionFailed**: the cipher refused to encrypt
//! - **InvalidPlaintext**: decrypted bytes are not UTF-8
//! - **InvalidSignature**: signature has the wrong length or encoding
//! - **WalletDerivationFailed**: mnemonic generation or HD derivation failed
//!
//! None of these are retryable with the same inputs; the operations are deterministic
//! apart from IV and key generation.

use thiserror::Error;

/// Error type for all envelope cryptography
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key has the wrong length, is not base64, or is not a valid curve value
    #[error("Invalid key ({key_type}): {reason}")]
    InvalidKey {
        /// Which key failed (e.g. "private_key", "peer_public_key")
        key_type: String,
        /// Specific failure reason
        reason: String,
    },

    /// ECDH shared secret computation failed
    #[error("Key agreement failed: {reason}")]
    KeyAgreementFailed { reason: String },

    /// Envelope could not be split into IV, ciphertext and tag
    #[error("Invalid envelope: {reason}")]
    InvalidEnvelope { reason: String },

    /// Authentication tag did not verify
    #[error("Decryption failed during {operation}: authentication tag mismatch (wrong key or tampered envelope)")]
    AuthenticationFailed { operation: String },

    #[error("Encryption failed: {reason}")]
    EncryptionFailed { reason: String },

    /// Plaintext decrypted fine but is not valid UTF-8
    #[error("Decrypted data is not valid UTF-8: {reason}")]
    InvalidPlaintext { reason: String },

    /// Signature is malformed (wrong size, bad base64, zero scalar)
    #[error("Invalid signature during {operation}: {reason}")]
    InvalidSignature {
        /// Which operation was being performed
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    #[error("Wallet derivation failed: {reason}")]
    WalletDerivationFailed { reason: String },
}

impl CryptoError {
    pub(crate) fn invalid_key(key_type: &str, reason: impl Into<String>) -> Self {
        CryptoError::InvalidKey {
            key_type: key_type.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input rather than by a failed
    /// cryptographic check.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidKey { .. }
                | CryptoError::InvalidEnvelope { .. }
                | CryptoError::InvalidSignature { .. }
        )
    }
}

// Conversion from base64 decode errors
impl From<base64::DecodeError> for CryptoError {
    fn from(err: base64::DecodeError) -> Self {
        CryptoError::InvalidEnvelope {
            reason: format!("base64 decode error: {}", err),
        }
    }
}
