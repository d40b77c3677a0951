// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod envelope;
pub mod keys;
pub mod service;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// BID envelope CLI
#[derive(Parser, Debug)]
#[command(name = "bid-cli")]
#[command(version)]
#[command(about = "Key, envelope and service tools for BID identity clients", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a secp256k1 key pair
    Keygen(keys::KeygenArgs),

    /// Derive the ECDH shared key with a peer
    SharedKey(keys::SharedKeyArgs),

    /// Encrypt a message into a base64 envelope
    Encrypt(envelope::EncryptArgs),

    /// Decrypt a base64 envelope
    Decrypt(envelope::DecryptArgs),

    /// Sign a message with ECDSA
    Sign(envelope::SignArgs),

    /// Verify an ECDSA signature
    Verify(envelope::VerifyArgs),

    /// Create or restore a wallet
    Wallet(keys::WalletArgs),

    /// Print a fresh request id
    RequestId(service::RequestIdArgs),

    /// Fetch a service's public key
    PublicKey(service::PublicKeyArgs),

    /// Resolve the configured tenant
    Tenant(service::TenantArgs),

    /// Check the configured license key
    License(service::LicenseArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Keygen(args) => keys::keygen(args).await,
        Commands::SharedKey(args) => keys::shared_key(args).await,
        Commands::Encrypt(args) => envelope::encrypt_command(args).await,
        Commands::Decrypt(args) => envelope::decrypt_command(args).await,
        Commands::Sign(args) => envelope::sign_command(args).await,
        Commands::Verify(args) => envelope::verify_command(args).await,
        Commands::Wallet(args) => keys::wallet(args).await,
        Commands::RequestId(args) => service::request_id(args).await,
        Commands::PublicKey(args) => service::public_key(args).await,
        Commands::Tenant(args) => service::tenant(args).await,
        Commands::License(args) => service::license(args).await,
    }
}
