// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;

use crate::crypto::{create_shared_key, create_wallet, generate_key_pair, wallet_from_phrase};

/// Arguments for keygen command
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Print the key pair as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for shared-key command
#[derive(Args, Debug)]
pub struct SharedKeyArgs {
    /// Own base64 private key
    #[arg(long, env = "BID_PRIVATE_KEY")]
    pub private_key: String,

    /// Peer base64 public key (64 bytes, no 0x04 prefix)
    #[arg(long)]
    pub peer_public_key: String,
}

/// Arguments for wallet command
#[derive(Args, Debug)]
pub struct WalletArgs {
    /// Restore from an existing 12-word recovery phrase instead of creating one
    #[arg(long)]
    pub phrase: Option<String>,
}

/// Generate a secp256k1 key pair
pub async fn keygen(args: KeygenArgs) -> Result<()> {
    let pair = generate_key_pair();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pair)?);
        return Ok(());
    }

    println!("🔑 New key pair");
    println!("  Private key: {}", pair.private_key);
    println!("  Public key:  {}", pair.public_key);
    Ok(())
}

/// Derive the ECDH shared secret
pub async fn shared_key(args: SharedKeyArgs) -> Result<()> {
    let secret = create_shared_key(&args.private_key, &args.peer_public_key)
        .context("Failed to derive shared key")?;
    println!("{}", secret.to_base64());
    Ok(())
}

/// Create or restore a wallet
pub async fn wallet(args: WalletArgs) -> Result<()> {
    let wallet = match args.phrase {
        Some(phrase) => wallet_from_phrase(&phrase).context("Failed to restore wallet")?,
        None => create_wallet().context("Failed to create wallet")?,
    };

    println!("👛 Wallet");
    println!("  Identity:        {}", wallet.identity);
    println!("  Public key:      {}", wallet.public_key);
    println!("  Private key:     {}", wallet.private_key);
    println!("  Recovery phrase: {}", wallet.recovery_phrase);
    Ok(())
}
