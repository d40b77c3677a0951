// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;

use crate::crypto::{create_shared_key, decrypt, encrypt, sign, verify, SharedSecret};

/// Key material for encrypt/decrypt: a shared secret, or a key pair to derive one
#[derive(Args, Debug)]
pub struct SecretArgs {
    /// Base64 shared secret (32 bytes)
    #[arg(long, conflicts_with_all = ["private_key", "peer_public_key"])]
    pub shared_key: Option<String>,

    /// Own base64 private key
    #[arg(long, requires = "peer_public_key")]
    pub private_key: Option<String>,

    /// Peer base64 public key
    #[arg(long)]
    pub peer_public_key: Option<String>,
}

impl SecretArgs {
    fn resolve(&self) -> Result<SharedSecret> {
        if let Some(shared) = &self.shared_key {
            return SharedSecret::from_base64(shared).context("Invalid shared key");
        }
        match (&self.private_key, &self.peer_public_key) {
            (Some(private_key), Some(peer)) => {
                create_shared_key(private_key, peer).context("Failed to derive shared key")
            }
            _ => Err(anyhow!(
                "Shared key required. Use --shared-key or --private-key with --peer-public-key"
            )),
        }
    }
}

/// Arguments for encrypt command
#[derive(Args, Debug)]
pub struct EncryptArgs {
    #[command(flatten)]
    pub secret: SecretArgs,

    /// UTF-8 plaintext to encrypt
    pub plaintext: String,
}

/// Arguments for decrypt command
#[derive(Args, Debug)]
pub struct DecryptArgs {
    #[command(flatten)]
    pub secret: SecretArgs,

    /// Base64 envelope (iv || ciphertext || tag)
    pub ciphertext: String,
}

/// Arguments for sign command
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Base64 private key
    #[arg(long, env = "BID_PRIVATE_KEY")]
    pub private_key: String,

    /// Message to sign
    pub message: String,
}

/// Arguments for verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Signer's base64 public key
    #[arg(long)]
    pub public_key: String,

    /// Base64 signature (r || s)
    #[arg(long)]
    pub signature: String,

    /// Message that was signed
    pub message: String,
}

pub async fn encrypt_command(args: EncryptArgs) -> Result<()> {
    let key = args.secret.resolve()?;
    println!("{}", encrypt(args.plaintext.as_bytes(), &key)?);
    Ok(())
}

pub async fn decrypt_command(args: DecryptArgs) -> Result<()> {
    let key = args.secret.resolve()?;
    let plaintext = decrypt(&args.ciphertext, &key).context("Decryption failed")?;
    println!("{}", plaintext);
    Ok(())
}

pub async fn sign_command(args: SignArgs) -> Result<()> {
    println!("{}", sign(args.message.as_bytes(), &args.private_key)?);
    Ok(())
}

/// Exits non-zero when the signature does not match
pub async fn verify_command(args: VerifyArgs) -> Result<()> {
    let valid = verify(args.message.as_bytes(), &args.signature, &args.public_key)?;
    if valid {
        println!("✅ Signature valid");
        Ok(())
    } else {
        Err(anyhow!("Signature does not match message and public key"))
    }
}
