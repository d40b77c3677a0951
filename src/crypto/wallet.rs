// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet Creation
//!
//! Creates a decentralized identity from a fresh BIP-39 recovery phrase. The
//! account key is derived at `m/44'/60'/0'/0/0` and the identity is the
//! Ethereum-style address of that key: the last 20 bytes of the Keccak-256
//! hash of the uncompressed public key, lowercase hex, no `0x`.

use ethers::signers::{
    coins_bip39::{English, Mnemonic},
    MnemonicBuilder, Signer,
};
use k256::SecretKey;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::CryptoError;
use super::keys::key_pair_from_secret;

const RECOVERY_PHRASE_WORDS: usize = 12;

/// Identity material produced by `create_wallet`
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Lowercase hex address, no `0x` prefix
    pub identity: String,
    pub public_key: String,
    pub private_key: String,
    pub recovery_phrase: String,
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("identity", &self.identity)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("recovery_phrase", &"<redacted>")
            .finish()
    }
}

/// Create a wallet with a new 12-word recovery phrase
pub fn create_wallet() -> Result<Wallet, CryptoError> {
    let mnemonic = Mnemonic::<English>::new_with_count(&mut OsRng, RECOVERY_PHRASE_WORDS)
        .map_err(|e| CryptoError::WalletDerivationFailed {
            reason: format!("mnemonic generation failed: {}", e),
        })?;
    wallet_from_phrase(&mnemonic.to_phrase())
}

/// Re-derive a wallet from an existing recovery phrase
pub fn wallet_from_phrase(phrase: &str) -> Result<Wallet, CryptoError> {
    let derived = MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .build()
        .map_err(|e| CryptoError::WalletDerivationFailed {
            reason: e.to_string(),
        })?;

    let secret = SecretKey::from_slice(derived.signer().to_bytes().as_slice())
        .map_err(|e| CryptoError::WalletDerivationFailed {
            reason: format!("derived key is not a valid scalar: {}", e),
        })?;
    let keys = key_pair_from_secret(&secret);

    Ok(Wallet {
        identity: hex::encode(derived.address().as_bytes()),
        public_key: keys.public_key,
        private_key: keys.private_key,
        recovery_phrase: phrase.to_string(),
    })
}

/// Strip an optional `0x` prefix and lowercase an identity string
pub fn normalize_identity(identity: &str) -> String {
    identity
        .strip_prefix("0x")
        .or_else(|| identity.strip_prefix("0X"))
        .unwrap_or(identity)
        .to_lowercase()
}
