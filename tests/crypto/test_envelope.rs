// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Tests for the AES-256-GCM envelope
// Format: base64(iv[16] || ciphertext || tag[16])

use base64::{engine::general_purpose::STANDARD, Engine};
use bid_envelope::crypto::{
    create_shared_key, decrypt, decrypt_bytes, encrypt, generate_key_pair, CryptoError,
    SharedSecret,
};

fn shared_pair() -> (SharedSecret, SharedSecret) {
    let alice = generate_key_pair();
    let bob = generate_key_pair();
    (
        create_shared_key(&alice.private_key, &bob.public_key).unwrap(),
        create_shared_key(&bob.private_key, &alice.public_key).unwrap(),
    )
}

#[test]
fn test_peer_can_decrypt() {
    let (alice_side, bob_side) = shared_pair();

    let envelope = encrypt(r#"{"hello":"world"}"#, &alice_side).unwrap();
    let plaintext = decrypt(&envelope, &bob_side).unwrap();

    assert_eq!(plaintext, r#"{"hello":"world"}"#);
    let value: serde_json::Value = serde_json::from_str(&plaintext).unwrap();
    assert_eq!(value["hello"], "world");
}

#[test]
fn test_envelope_layout() {
    let key = SharedSecret::from_bytes([3u8; 32]);
    let envelope = encrypt("abc", &key).unwrap();
    let raw = STANDARD.decode(&envelope).unwrap();

    // 16-byte IV + 3 bytes ciphertext + 16-byte tag
    assert_eq!(raw.len(), 16 + 3 + 16);
}

#[test]
fn test_empty_plaintext() {
    let key = SharedSecret::from_bytes([3u8; 32]);
    let envelope = encrypt("", &key).unwrap();
    assert_eq!(STANDARD.decode(&envelope).unwrap().len(), 32);
    assert_eq!(decrypt(&envelope, &key).unwrap(), "");
}

#[test]
fn test_iv_is_fresh_per_call() {
    let key = SharedSecret::from_bytes([9u8; 32]);
    let envelopes: Vec<String> = (0..20).map(|_| encrypt("same", &key).unwrap()).collect();

    let mut ivs: Vec<Vec<u8>> = envelopes
        .iter()
        .map(|e| STANDARD.decode(e).unwrap()[..16].to_vec())
        .collect();
    ivs.sort();
    ivs.dedup();
    assert_eq!(ivs.len(), 20, "Every envelope must carry a distinct IV");
}

#[test]
fn test_tampering_any_byte_fails() {
    let key = SharedSecret::from_bytes([1u8; 32]);
    let envelope = encrypt("sensitive payload", &key).unwrap();
    let raw = STANDARD.decode(&envelope).unwrap();

    for i in 0..raw.len() {
        let mut tampered = raw.clone();
        tampered[i] ^= 0x01;
        let result = decrypt(&STANDARD.encode(&tampered), &key);
        assert!(
            matches!(result, Err(CryptoError::AuthenticationFailed { .. })),
            "Flipping byte {} must fail authentication",
            i
        );
    }
}

#[test]
fn test_wrong_key_fails() {
    let envelope = encrypt("secret", &SharedSecret::from_bytes([1u8; 32])).unwrap();
    let result = decrypt(&envelope, &SharedSecret::from_bytes([2u8; 32]));
    assert!(matches!(result, Err(CryptoError::AuthenticationFailed { .. })));
}

#[test]
fn test_short_envelope_rejected() {
    let key = SharedSecret::from_bytes([1u8; 32]);
    let short = STANDARD.encode([0u8; 31]);
    assert!(matches!(
        decrypt_bytes(&short, &key),
        Err(CryptoError::InvalidEnvelope { .. })
    ));
    assert!(matches!(
        decrypt("%%%not-base64%%%", &key),
        Err(CryptoError::InvalidEnvelope { .. })
    ));
}

#[test]
fn test_binary_roundtrip() {
    let key = SharedSecret::from_bytes([4u8; 32]);
    let data: Vec<u8> = (0..=255u8).collect();
    let envelope = encrypt(&data, &key).unwrap();
    assert_eq!(decrypt_bytes(&envelope, &key).unwrap(), data);
}

#[test]
fn test_non_utf8_plaintext_reported() {
    let key = SharedSecret::from_bytes([4u8; 32]);
    let envelope = encrypt([0xffu8, 0xfe], &key).unwrap();
    assert!(matches!(
        decrypt(&envelope, &key),
        Err(CryptoError::InvalidPlaintext { .. })
    ));
}
