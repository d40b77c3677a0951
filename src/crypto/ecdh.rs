// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ECDH Key Agreement
//!
//! Implements Elliptic Curve Diffie-Hellman over secp256k1. The shared secret
//! is the raw 32-byte x-coordinate of the agreed point with no KDF applied,
//! which is what the remote services compute on their side.

use base64::{engine::general_purpose::STANDARD, Engine};
use k256::{PublicKey, SecretKey};
use std::fmt;

use super::error::CryptoError;
use super::keys::{private_key_bytes, public_key_sec1};

/// Length of a derived shared secret in bytes
pub const SHARED_SECRET_LEN: usize = 32;

/// Symmetric key derived through ECDH
///
/// Recomputed per logical operation; callers should not keep it beyond the
/// call chain that needed it.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret([u8; SHARED_SECRET_LEN]);

impl SharedSecret {
    pub fn from_bytes(bytes: [u8; SHARED_SECRET_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a base64 shared secret (the at-rest encoding)
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::invalid_key("shared_secret", format!("invalid base64: {}", e)))?;

        if bytes.len() != SHARED_SECRET_LEN {
            return Err(CryptoError::invalid_key(
                "shared_secret",
                format!(
                    "expected {} bytes, got {}",
                    SHARED_SECRET_LEN,
                    bytes.len()
                ),
            ));
        }

        let mut key = [0u8; SHARED_SECRET_LEN];
        key.copy_from_slice(&bytes);
        Ok(Self(key))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_LEN] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Derive the shared secret between a local private key and a peer public key
///
/// # Arguments
///
/// * `private_key` - Local private key, base64 of 32 bytes
/// * `peer_public_key` - Peer public key, base64 of 64 bytes (uncompressed, no `0x04`)
///
/// # Returns
///
/// The 32-byte shared secret. Both parties get the same value:
/// `create_shared_key(a_priv, b_pub) == create_shared_key(b_priv, a_pub)`.
///
/// # Example
///
/// ```ignore
/// let shared = create_shared_key(&my_keys.private_key, &service_public_key)?;
/// let header = encrypt(license_key.as_bytes(), &shared)?;
/// ```
pub fn create_shared_key(
    private_key: &str,
    peer_public_key: &str,
) -> Result<SharedSecret, CryptoError> {
    // Length and encoding problems are InvalidKey; a well-formed value that
    // is not a usable scalar or curve point is KeyAgreementFailed
    let secret_bytes =
        private_key_bytes(private_key).map_err(|e| rename_key(e, "private_key"))?;
    let peer_sec1 =
        public_key_sec1(peer_public_key).map_err(|e| rename_key(e, "peer_public_key"))?;

    let secret =
        SecretKey::from_slice(&secret_bytes).map_err(|_| CryptoError::KeyAgreementFailed {
            reason: "private key is not a valid secp256k1 scalar".to_string(),
        })?;
    let peer =
        PublicKey::from_sec1_bytes(&peer_sec1).map_err(|_| CryptoError::KeyAgreementFailed {
            reason: "peer public key is not on secp256k1".to_string(),
        })?;

    let shared = k256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
    let raw = shared.raw_secret_bytes();

    let mut key = [0u8; SHARED_SECRET_LEN];
    key.copy_from_slice(raw.as_slice());
    Ok(SharedSecret(key))
}

fn rename_key(err: CryptoError, key: &str) -> CryptoError {
    match err {
        CryptoError::InvalidKey { reason, .. } => CryptoError::invalid_key(key, reason),
        other => other,
    }
}
