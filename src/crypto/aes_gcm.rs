// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-256-GCM Envelope
//!
//! Authenticated encryption for header values and payloads, keyed by an ECDH
//! shared secret.
//!
//! **Envelope Format** (base64 of):
//! ```text
//! [iv (16 bytes) | ciphertext (variable length) | tag (16 bytes)]
//! ```
//!
//! - IV: 16 random bytes per call, never reused under the same key
//! - Algorithm: AES-256-GCM with a 128-bit nonce
//! - No Additional Authenticated Data (AAD)

use aes_gcm::{
    aead::{consts::U16, Aead, KeyInit, Payload},
    aes::Aes256,
    AesGcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{rngs::OsRng, RngCore};

use super::ecdh::SharedSecret;
use super::error::CryptoError;

/// AES-256-GCM with the 16-byte IV the envelope format uses
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// IV length in bytes
pub const IV_LEN: usize = 16;

/// Authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Encrypt data into a base64 envelope
///
/// # Arguments
///
/// * `plaintext` - Data to encrypt (header values are UTF-8 strings)
/// * `key` - Shared secret from `create_shared_key`
///
/// # Returns
///
/// Base64 of `iv || ciphertext || tag`. Encrypting the same plaintext twice
/// yields two different envelopes.
pub fn encrypt(plaintext: impl AsRef<[u8]>, key: &SharedSecret) -> Result<String, CryptoError> {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let cipher = Aes256Gcm16::new_from_slice(key.as_bytes()).map_err(|e| {
        CryptoError::EncryptionFailed {
            reason: format!("failed to create AES-GCM cipher: {}", e),
        }
    })?;

    // Output is ciphertext with the 16-byte tag appended
    let sealed = cipher
        .encrypt(
            Nonce::<U16>::from_slice(&iv),
            Payload {
                msg: plaintext.as_ref(),
                aad: b"",
            },
        )
        .map_err(|e| CryptoError::EncryptionFailed {
            reason: e.to_string(),
        })?;

    let mut envelope = Vec::with_capacity(IV_LEN + sealed.len());
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(&sealed);

    Ok(STANDARD.encode(envelope))
}

/// Decrypt a base64 envelope to raw bytes
///
/// # Errors
///
/// - envelope is not base64 or shorter than IV + tag
/// - authentication tag does not verify (wrong key or tampered data)
pub fn decrypt_bytes(envelope: &str, key: &SharedSecret) -> Result<Vec<u8>, CryptoError> {
    let bytes = STANDARD.decode(envelope.trim())?;

    if bytes.len() < IV_LEN + TAG_LEN {
        return Err(CryptoError::InvalidEnvelope {
            reason: format!(
                "expected at least {} bytes for IV and tag, got {}",
                IV_LEN + TAG_LEN,
                bytes.len()
            ),
        });
    }

    let (iv, sealed) = bytes.split_at(IV_LEN);

    let cipher = Aes256Gcm16::new_from_slice(key.as_bytes()).map_err(|e| {
        CryptoError::InvalidKey {
            key_type: "shared_secret".to_string(),
            reason: e.to_string(),
        }
    })?;

    cipher
        .decrypt(
            Nonce::<U16>::from_slice(iv),
            Payload {
                msg: sealed,
                aad: b"",
            },
        )
        .map_err(|_| CryptoError::AuthenticationFailed {
            operation: "decrypt".to_string(),
        })
}

/// Decrypt a base64 envelope to a UTF-8 string
pub fn decrypt(envelope: &str, key: &SharedSecret) -> Result<String, CryptoError> {
    let plaintext = decrypt_bytes(envelope, key)?;
    String::from_utf8(plaintext).map_err(|e| CryptoError::InvalidPlaintext {
        reason: e.to_string(),
    })
}
