// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Envelope
//!
//! The cryptographic primitives that protect every request to the identity
//! platform's services:
//!
//! - **Keys**: secp256k1 key pairs, base64 with the public point's `0x04` stripped
//! - **ECDH**: shared secret = x-coordinate of `my_private * peer_public`
//! - **Envelope**: AES-256-GCM, `base64(iv16 || ciphertext || tag16)`
//! - **Signature**: ECDSA over SHA-256, raw 64-byte `r || s`
//! - **Wallet**: BIP-39 phrase to identity/key pair
//!
//! ## Security Considerations
//!
//! - Key material is held in memory only, never persisted by this crate
//! - A fresh random IV is drawn for every encryption
//! - Decryption fails hard on a bad tag; it never returns unauthenticated plaintext
//! - All key and signature lengths are checked before use
//!
//! ## Protocol Flow
//!
//! 1. Client generates a key pair (once per session)
//! 2. Client fetches the service's public key
//! 3. Both sides derive the same shared secret via ECDH
//! 4. Client encrypts license key, request id and payload under that secret
//! 5. Service answers; client decrypts the response with the same secret

pub mod aes_gcm;
pub mod ecdh;
pub mod error;
pub mod keys;
pub mod signature;
pub mod wallet;

pub use aes_gcm::{decrypt, decrypt_bytes, encrypt};
pub use ecdh::{create_shared_key, SharedSecret};
pub use error::CryptoError;
pub use keys::{decode_private_key, decode_public_key, generate_key_pair, KeyPair};
pub use signature::{sign, verify};
pub use wallet::{create_wallet, normalize_identity, wallet_from_phrase, Wallet};
