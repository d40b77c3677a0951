// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SDK Configuration
//!
//! Loaded from the environment (and a `.env` file when present):
//!
//! | variable                   | meaning                                    |
//! |----------------------------|--------------------------------------------|
//! | `BID_TENANT_DNS`           | tenant DNS name (required)                 |
//! | `BID_TENANT_ID`            | explicit tenant id, preferred over DNS     |
//! | `BID_COMMUNITY_ID`         | explicit community id                      |
//! | `BID_COMMUNITY_NAME`       | community name, default `default`          |
//! | `BID_LICENSE_KEY`          | tenant license key                         |
//! | `BID_APP_ID`               | app id for request ids                     |
//! | `BID_REQUEST_TIMEOUT_SECS` | default per-request timeout                |
//! | `INFRA_LICENSE_KEY`        | infrastructure key accepted without lookup |
//!
//! The license keys are never logged.

use std::time::Duration;
use tracing::info;

use crate::error::SdkError;
use crate::tenant::TenantInfo;
use crate::transport::DEFAULT_APP_ID;

pub const DEFAULT_COMMUNITY_NAME: &str = "default";

#[derive(Clone)]
pub struct SdkConfig {
    pub tenant: TenantInfo,
    pub app_id: String,
    pub request_timeout: Option<Duration>,
    pub infra_license_key: Option<String>,
}

impl SdkConfig {
    /// Load from process environment after reading `.env`
    pub fn from_env() -> Result<Self, SdkError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SdkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let dns = var("BID_TENANT_DNS")
            .ok_or_else(|| SdkError::Config("BID_TENANT_DNS environment variable not set".into()))?;

        let request_timeout = match var("BID_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| {
                    SdkError::Config(format!(
                        "BID_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let config = Self {
            tenant: TenantInfo {
                dns,
                tenant_id: var("BID_TENANT_ID"),
                community_id: var("BID_COMMUNITY_ID"),
                community_name: var("BID_COMMUNITY_NAME")
                    .unwrap_or_else(|| DEFAULT_COMMUNITY_NAME.to_string()),
                license_key: var("BID_LICENSE_KEY").unwrap_or_default(),
            },
            app_id: var("BID_APP_ID").unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
            request_timeout,
            infra_license_key: var("INFRA_LICENSE_KEY"),
        };

        info!(
            "✅ SDK config loaded (tenant: {}, community: {}, license key set: {})",
            config.tenant.dns,
            config
                .tenant
                .community_id
                .as_deref()
                .unwrap_or(&config.tenant.community_name),
            !config.tenant.license_key.is_empty()
        );

        Ok(config)
    }
}

impl std::fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkConfig")
            .field("tenant_dns", &self.tenant.dns)
            .field("tenant_id", &self.tenant.tenant_id)
            .field("community_id", &self.tenant.community_id)
            .field("community_name", &self.tenant.community_name)
            .field("app_id", &self.app_id)
            .field("request_timeout", &self.request_timeout)
            .field("infra_license_key", &self.infra_license_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
