// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for ECDSA sign/verify (secp256k1, SHA-256, raw r || s)

use base64::{engine::general_purpose::STANDARD, Engine};
use bid_envelope::crypto::{generate_key_pair, sign, verify, CryptoError};

#[test]
fn test_sign_and_verify() {
    let pair = generate_key_pair();
    let signature = sign(b"payload", &pair.private_key).unwrap();

    assert_eq!(STANDARD.decode(&signature).unwrap().len(), 64);
    assert!(verify(b"payload", &signature, &pair.public_key).unwrap());
}

#[test]
fn test_signing_is_deterministic() {
    let pair = generate_key_pair();
    let first = sign(b"payload", &pair.private_key).unwrap();
    let second = sign(b"payload", &pair.private_key).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_modified_message_does_not_verify() {
    let pair = generate_key_pair();
    let signature = sign(b"payload", &pair.private_key).unwrap();
    assert!(!verify(b"payload!", &signature, &pair.public_key).unwrap());
}

#[test]
fn test_other_key_does_not_verify() {
    let signer = generate_key_pair();
    let other = generate_key_pair();
    let signature = sign(b"payload", &signer.private_key).unwrap();
    assert!(!verify(b"payload", &signature, &other.public_key).unwrap());
}

#[test]
fn test_malformed_signature_is_error() {
    let pair = generate_key_pair();

    let short = STANDARD.encode([1u8; 63]);
    assert!(matches!(
        verify(b"payload", &short, &pair.public_key),
        Err(CryptoError::InvalidSignature { .. })
    ));

    assert!(verify(b"payload", "!!", &pair.public_key).is_err());
}

#[test]
fn test_zero_signature_is_false() {
    let pair = generate_key_pair();
    let zero = STANDARD.encode([0u8; 64]);
    assert!(!verify(b"payload", &zero, &pair.public_key).unwrap());
}
