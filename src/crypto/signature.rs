// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ECDSA Signatures
//!
//! Proof-of-possession signatures over arbitrary bytes with the session's
//! secp256k1 key.
//!
//! **Signature Format** (base64 of):
//! ```text
//! [r (32 bytes, big-endian) | s (32 bytes, big-endian)]
//! ```
//!
//! This is the fixed-width IEEE P1363 layout; DER is never produced or
//! accepted. Messages are hashed with SHA-256, nonces follow RFC 6979 and `s`
//! is normalized to the low half of the curve order.

use base64::{engine::general_purpose::STANDARD, Engine};
use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};

use super::error::CryptoError;
use super::keys::{decode_private_key, decode_public_key};

/// Raw signature length in bytes (r || s)
pub const SIGNATURE_LEN: usize = 64;

/// Sign a message with a base64 private key
///
/// # Returns
///
/// Base64 of the 64-byte `r || s` signature. Signing is deterministic: the
/// same key and message always give the same signature.
pub fn sign(message: &[u8], private_key: &str) -> Result<String, CryptoError> {
    let secret = decode_private_key(private_key)?;
    let signing_key = SigningKey::from(&secret);

    let signature: Signature = signing_key.sign(message);
    Ok(STANDARD.encode(signature.to_bytes()))
}

/// Verify a base64 `r || s` signature against a base64 public key
///
/// # Returns
///
/// - `Ok(true)` when the signature is valid for this message and key
/// - `Ok(false)` when it is well-formed but does not verify
///
/// # Errors
///
/// Malformed input: signature not 64 bytes, public key not 64 bytes, bad base64.
pub fn verify(message: &[u8], signature: &str, public_key: &str) -> Result<bool, CryptoError> {
    let raw = STANDARD
        .decode(signature.trim())
        .map_err(|e| CryptoError::InvalidSignature {
            operation: "verify".to_string(),
            reason: format!("invalid base64: {}", e),
        })?;

    if raw.len() != SIGNATURE_LEN {
        return Err(CryptoError::InvalidSignature {
            operation: "verify".to_string(),
            reason: format!("expected {} bytes, got {}", SIGNATURE_LEN, raw.len()),
        });
    }

    let public = decode_public_key(public_key)?;
    let verifying_key = VerifyingKey::from(&public);

    // r or s equal to zero cannot verify
    let signature = match Signature::from_slice(&raw) {
        Ok(sig) => sig,
        Err(_) => return Ok(false),
    };
    let signature = signature.normalize_s().unwrap_or(signature);

    Ok(verifying_key.verify(message, &signature).is_ok())
}
