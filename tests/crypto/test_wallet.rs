// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for wallet creation and recovery

use bid_envelope::crypto::{
    create_shared_key, create_wallet, generate_key_pair, normalize_identity, sign, verify,
    wallet_from_phrase,
};

const TEST_PHRASE: &str = "test test test test test test test test test test test junk";

#[test]
fn test_known_phrase_identity() {
    let wallet = wallet_from_phrase(TEST_PHRASE).unwrap();
    assert_eq!(wallet.identity, "f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    assert_eq!(wallet.recovery_phrase, TEST_PHRASE);
}

#[test]
fn test_new_wallet_recovers() {
    let wallet = create_wallet().unwrap();
    assert_eq!(wallet.recovery_phrase.split_whitespace().count(), 12);

    let restored = wallet_from_phrase(&wallet.recovery_phrase).unwrap();
    assert_eq!(restored.identity, wallet.identity);
    assert_eq!(restored.private_key, wallet.private_key);
    assert_eq!(restored.public_key, wallet.public_key);
}

#[test]
fn test_wallet_keys_work_for_envelopes() {
    let wallet = create_wallet().unwrap();
    let peer = generate_key_pair();

    let ours = create_shared_key(&wallet.private_key, &peer.public_key).unwrap();
    let theirs = create_shared_key(&peer.private_key, &wallet.public_key).unwrap();
    assert_eq!(ours, theirs);

    let signature = sign(b"hello", &wallet.private_key).unwrap();
    assert!(verify(b"hello", &signature, &wallet.public_key).unwrap());
}

#[test]
fn test_identity_format() {
    let wallet = create_wallet().unwrap();
    assert_eq!(wallet.identity.len(), 40);
    assert_eq!(wallet.identity, wallet.identity.to_lowercase());
    assert_eq!(normalize_identity(&format!("0x{}", wallet.identity.to_uppercase())), wallet.identity);
}

#[test]
fn test_invalid_phrase_rejected() {
    assert!(wallet_from_phrase("not a real recovery phrase").is_err());
}

#[test]
fn test_debug_hides_secrets() {
    let wallet = wallet_from_phrase(TEST_PHRASE).unwrap();
    let debug = format!("{:?}", wallet);
    assert!(!debug.contains("junk"));
    assert!(!debug.contains(&wallet.private_key));
}
