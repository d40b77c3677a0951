// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::time::Duration;

use crate::config::SdkConfig;
use crate::crypto::generate_key_pair;
use crate::licenses::LicenseClient;
use crate::session::EnvelopeSession;
use crate::tenant::{resolve_community, resolve_service_directory};
use crate::transport::{RequestId, Transport, DEFAULT_APP_ID};

/// Arguments for request-id command
#[derive(Args, Debug)]
pub struct RequestIdArgs {
    /// App id embedded in the request id
    #[arg(long, env = "BID_APP_ID", default_value = DEFAULT_APP_ID)]
    pub app_id: String,

    /// Reuse an existing uuid instead of generating one
    #[arg(long)]
    pub uuid: Option<String>,
}

/// Arguments for public-key command
#[derive(Args, Debug)]
pub struct PublicKeyArgs {
    /// Service base URL (the key is read from `{url}/publickeys`)
    #[arg(long)]
    pub service_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Arguments for tenant command
#[derive(Args, Debug)]
pub struct TenantArgs {
    /// Also fetch the service directory
    #[arg(long)]
    pub with_services: bool,
}

/// Arguments for license command
#[derive(Args, Debug)]
pub struct LicenseArgs {
    /// Check the license against this community instead of fetching the current license
    #[arg(long)]
    pub community_id: Option<String>,
}

pub async fn request_id(args: RequestIdArgs) -> Result<()> {
    let id = match args.uuid {
        Some(uuid) => RequestId::with_uuid(uuid, args.app_id),
        None => RequestId::new(args.app_id),
    };
    println!("{}", id.to_json());
    Ok(())
}

/// Fetch a service's public key through the transport
pub async fn public_key(args: PublicKeyArgs) -> Result<()> {
    let session = EnvelopeSession::new(generate_key_pair(), "", Transport::new()?)
        .with_default_timeout(Duration::from_secs(args.timeout));

    let key = session.service_public_key(&args.service_url).await?;
    println!("{}", key);
    Ok(())
}

/// Resolve the configured tenant's community (and services)
pub async fn tenant(args: TenantArgs) -> Result<()> {
    let config = SdkConfig::from_env()?;
    let session = EnvelopeSession::from_config(&config)?;

    println!("🏢 Resolving tenant {}...", config.tenant.dns);
    let community = resolve_community(session.transport(), &config.tenant).await?;
    println!("  Tenant id:    {}", community.tenant.id);
    if let Some(tag) = &community.tenant.tenanttag {
        println!("  Tenant tag:   {}", tag);
    }
    println!("  Community id: {}", community.community.id);

    if args.with_services {
        let sd = resolve_service_directory(session.transport(), &config.tenant).await?;
        println!("\n📋 Services:");
        println!("  licenses: {}", sd.licenses);
        let mut names: Vec<&String> = sd.services.keys().collect();
        names.sort();
        for name in names {
            if let Some(url) = sd.service_url(name) {
                println!("  {}: {}", name, url);
            }
        }
    }
    Ok(())
}

/// Validate the configured license key
pub async fn license(args: LicenseArgs) -> Result<()> {
    let config = SdkConfig::from_env()?;
    if config.tenant.license_key.is_empty() {
        return Err(anyhow!("License key required. Set BID_LICENSE_KEY env var"));
    }

    let session = EnvelopeSession::from_config(&config)?;
    let sd = resolve_service_directory(session.transport(), &config.tenant).await?;
    let client = LicenseClient::from_config(session, &config);

    let key = match args.community_id {
        Some(community_id) => {
            client
                .check_community_license(
                    &config.tenant.license_key,
                    &community_id,
                    &sd.licenses,
                    None,
                    None,
                )
                .await?
        }
        None => {
            client
                .current_license(&config.tenant.license_key, &sd.licenses, None, None)
                .await?
        }
    };

    println!("🔐 License");
    println!("  Active:     {}", key.is_active());
    if let Some(authorized) = key.is_authorized {
        println!("  Authorized: {}", authorized);
    }
    if let Some(expiry) = key.expiry {
        println!("  Expiry:     {}", expiry.to_rfc3339());
    }
    if let Some(tag) = &key.tag {
        println!("  Tag:        {}", tag);
    }
    Ok(())
}
