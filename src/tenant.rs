// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tenant Resolution
//!
//! Looks up the community record and the service directory for a tenant.
//! Both lookups go through the transport cache for 10 minutes; payloads
//! missing their required fields are returned as errors and never cached.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::SdkError;
use crate::transport::{AdmitJsonIf, RequestSpec, Transport};

/// Lifetime of cached community and service directory lookups
pub const TENANT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Identifies one tenant/community pair
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TenantInfo {
    pub dns: String,
    /// Preferred over `dns` in lookups when set
    pub tenant_id: Option<String>,
    /// Preferred over `community_name` in lookups when set
    pub community_id: Option<String>,
    pub community_name: String,
    pub license_key: String,
}

impl TenantInfo {
    pub fn new(dns: impl Into<String>, community_name: impl Into<String>) -> Self {
        Self {
            dns: dns.into(),
            community_name: community_name.into(),
            ..Default::default()
        }
    }

    fn cache_suffix(&self) -> String {
        let mut suffix = self.dns.clone();
        if let Some(tenant_id) = &self.tenant_id {
            suffix.push('_');
            suffix.push_str(tenant_id);
        }
        suffix.push('_');
        suffix.push_str(self.community_id.as_deref().unwrap_or(&self.community_name));
        suffix
    }

    /// `communityCache_{dns}[_{tenantId}]_{communityId|communityName}`
    pub fn community_cache_key(&self) -> String {
        format!("communityCache_{}", self.cache_suffix())
    }

    /// `sdCache_{dns}[_{tenantId}]_{communityId|communityName}`
    pub fn sd_cache_key(&self) -> String {
        format!("sdCache_{}", self.cache_suffix())
    }

    fn community_request(&self) -> Value {
        let mut body = Map::new();
        match &self.tenant_id {
            Some(id) => body.insert("tenantId".to_string(), json!(id)),
            None => body.insert("dns".to_string(), json!(self.dns)),
        };
        match &self.community_id {
            Some(id) => body.insert("communityId".to_string(), json!(id)),
            None => body.insert("communityName".to_string(), json!(self.community_name)),
        };
        Value::Object(body)
    }
}

impl std::fmt::Debug for TenantInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantInfo")
            .field("dns", &self.dns)
            .field("tenant_id", &self.tenant_id)
            .field("community_id", &self.community_id)
            .field("community_name", &self.community_name)
            .field("license_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenanttag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "publicKey", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `community_info/fetch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityInfo {
    pub tenant: TenantRecord,
    pub community: CommunityRecord,
}

/// Service name → base URL map published at `/caas/sd`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDirectory {
    pub licenses: String,
    #[serde(flatten)]
    pub services: HashMap<String, Value>,
}

impl ServiceDirectory {
    /// Base URL of a named service (`licenses`, `sessions`, `vcs`, ...)
    pub fn service_url(&self, name: &str) -> Option<&str> {
        if name == "licenses" {
            return Some(&self.licenses);
        }
        self.services.get(name).and_then(Value::as_str)
    }
}

/// Fetch the community record for `tenant`
///
/// # Errors
///
/// `TenantResolution` when the response lacks `tenant` or `community`;
/// transport errors pass through unchanged.
pub async fn resolve_community(
    transport: &Transport,
    tenant: &TenantInfo,
) -> Result<CommunityInfo, SdkError> {
    let url = format!("https://{}/api/r1/system/community_info/fetch", tenant.dns);
    let cache_key = tenant.community_cache_key();
    debug!("🏢 Resolving community (cache key: '{}')", cache_key);

    let spec = RequestSpec::post(&url)
        .json_body(tenant.community_request())
        .cache_key(cache_key)
        .ttl(TENANT_CACHE_TTL)
        .admission(AdmitJsonIf::new(|json| {
            has_object(json, "tenant") && has_object(json, "community")
        }));

    let response = transport.execute_request(spec).await?;

    let info = response
        .json
        .as_ref()
        .filter(|json| has_object(json, "tenant") && has_object(json, "community"))
        .and_then(|json| serde_json::from_value::<CommunityInfo>(json.clone()).ok())
        .ok_or_else(|| SdkError::TenantResolution {
            dns: tenant.dns.clone(),
            reason: format!("community lookup returned status {} without tenant and community", response.status),
        })?;

    info!(
        "✅ Community resolved (tenant: {}, community: {})",
        info.tenant.id, info.community.id
    );
    Ok(info)
}

/// Fetch the service directory for `tenant`
///
/// # Errors
///
/// `TenantResolution` when the response has no `licenses` entry.
pub async fn resolve_service_directory(
    transport: &Transport,
    tenant: &TenantInfo,
) -> Result<ServiceDirectory, SdkError> {
    let url = format!("https://{}/caas/sd", tenant.dns);

    let spec = RequestSpec::get(&url)
        .cache_key(tenant.sd_cache_key())
        .ttl(TENANT_CACHE_TTL)
        .admission(AdmitJsonIf::new(|json| {
            json.get("licenses").map_or(false, Value::is_string)
        }));

    let response = transport.execute_request(spec).await?;

    response
        .parse_json::<ServiceDirectory>()
        .ok_or_else(|| SdkError::TenantResolution {
            dns: tenant.dns.clone(),
            reason: format!("service directory returned status {} without licenses", response.status),
        })
}

fn has_object(json: &Value, field: &str) -> bool {
    json.get(field).map_or(false, Value::is_object)
}
