// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! secp256k1 Key Pairs
//!
//! Key pairs travel as base64 strings:
//!
//! ```text
//! private key: 32-byte scalar                          -> base64 (44 chars)
//! public key:  uncompressed SEC1 point without 0x04    -> base64 (88 chars)
//!              [x (32 bytes) | y (32 bytes)]
//! ```
//!
//! The stripped public key form is what the remote services publish and expect
//! in the `publickey` header.

use base64::{engine::general_purpose::STANDARD, Engine};
use k256::{elliptic_curve::sec1::ToEncodedPoint, PublicKey, SecretKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::CryptoError;

/// Raw private key length in bytes
pub const PRIVATE_KEY_LEN: usize = 32;

/// Raw public key length in bytes (x || y, no SEC1 prefix)
pub const PUBLIC_KEY_LEN: usize = 64;

/// SEC1 tag for an uncompressed point
const UNCOMPRESSED_TAG: u8 = 0x04;

/// Base64-encoded secp256k1 key pair
///
/// Held in memory for the lifetime of a session and never persisted here.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    pub private_key: String,
    pub public_key: String,
}

impl KeyPair {
    /// Build a key pair from existing base64 keys, validating both
    pub fn from_base64(private_key: &str, public_key: &str) -> Result<Self, CryptoError> {
        decode_private_key(private_key)?;
        decode_public_key(public_key)?;
        Ok(Self {
            private_key: private_key.to_string(),
            public_key: public_key.to_string(),
        })
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Generate a fresh secp256k1 key pair
///
/// The public key is the uncompressed point with the leading `0x04` removed,
/// so it always encodes to 64 raw bytes.
pub fn generate_key_pair() -> KeyPair {
    let secret = SecretKey::random(&mut OsRng);
    key_pair_from_secret(&secret)
}

pub(crate) fn key_pair_from_secret(secret: &SecretKey) -> KeyPair {
    KeyPair {
        private_key: STANDARD.encode(secret.to_bytes()),
        public_key: STANDARD.encode(encode_public_key_raw(&secret.public_key())),
    }
}

/// Strip the SEC1 tag from an uncompressed public key
pub(crate) fn encode_public_key_raw(public_key: &PublicKey) -> [u8; PUBLIC_KEY_LEN] {
    let point = public_key.to_encoded_point(false);
    let mut raw = [0u8; PUBLIC_KEY_LEN];
    raw.copy_from_slice(&point.as_bytes()[1..]);
    raw
}

/// Decode and validate a base64 private key
///
/// # Errors
///
/// - not base64
/// - not exactly 32 bytes once decoded
/// - zero or not below the curve order
pub fn decode_private_key(private_key: &str) -> Result<SecretKey, CryptoError> {
    let bytes = private_key_bytes(private_key)?;
    SecretKey::from_slice(&bytes)
        .map_err(|e| CryptoError::invalid_key("private_key", format!("not a valid scalar: {}", e)))
}

/// Base64 and length checks for a private key, without scalar validation
pub(crate) fn private_key_bytes(private_key: &str) -> Result<Vec<u8>, CryptoError> {
    let bytes = STANDARD
        .decode(private_key.trim())
        .map_err(|e| CryptoError::invalid_key("private_key", format!("invalid base64: {}", e)))?;

    if bytes.len() != PRIVATE_KEY_LEN {
        return Err(CryptoError::invalid_key(
            "private_key",
            format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_LEN,
                bytes.len()
            ),
        ));
    }
    Ok(bytes)
}

/// Decode and validate a base64 public key in the stripped 64-byte form
///
/// The `0x04` prefix is reinserted before parsing the point.
pub fn decode_public_key(public_key: &str) -> Result<PublicKey, CryptoError> {
    let sec1 = public_key_sec1(public_key)?;
    PublicKey::from_sec1_bytes(&sec1)
        .map_err(|_| CryptoError::invalid_key("public_key", "point is not on secp256k1"))
}

/// Base64 and length checks for a public key; returns the SEC1 form with
/// the `0x04` prefix restored, without checking the point
pub(crate) fn public_key_sec1(public_key: &str) -> Result<Vec<u8>, CryptoError> {
    let bytes = STANDARD
        .decode(public_key.trim())
        .map_err(|e| CryptoError::invalid_key("public_key", format!("invalid base64: {}", e)))?;

    if bytes.len() != PUBLIC_KEY_LEN {
        return Err(CryptoError::invalid_key(
            "public_key",
            format!("expected {} bytes, got {}", PUBLIC_KEY_LEN, bytes.len()),
        ));
    }

    let mut sec1 = Vec::with_capacity(PUBLIC_KEY_LEN + 1);
    sec1.push(UNCOMPRESSED_TAG);
    sec1.extend_from_slice(&bytes);
    Ok(sec1)
}
