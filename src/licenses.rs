// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! License Checks
//!
//! Validates tenant license keys against the licenses service. Results are
//! cached for 10 minutes, but only when the license is actually usable
//! (matching, enabled, unexpired); a rejected license is re-checked on the
//! next call.
//!
//! An infrastructure key configured through `INFRA_LICENSE_KEY` is accepted
//! locally without any network call.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha512};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::SdkConfig;
use crate::error::SdkError;
use crate::session::EnvelopeSession;
use crate::transport::{Admission, RequestId, RequestSpec, ResponseEnvelope};

/// Lifetime of a cached license result
pub const LICENSE_CACHE_TTL: Duration = Duration::from_secs(600);

const INFRA_KEY_TYPE: &str = "hawk";
const INFRA_AUTH_LEVEL: &str = "service";
const INFRA_KEY_TAG: &str = "infra_license_key";

/// License record returned by the licenses service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceKey {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, deserialize_with = "deserialize_expiry")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_authorized: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceKey {
    /// Enabled and not yet expired
    pub fn is_active(&self) -> bool {
        !self.disabled && self.expiry.map_or(false, |expiry| expiry > Utc::now())
    }
}

/// Accepts RFC 3339 strings and epoch milliseconds
fn deserialize_expiry<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_expiry))
}

fn parse_expiry(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn expiry_in_future(json: &Value) -> bool {
    json.get("expiry")
        .and_then(parse_expiry)
        .map_or(false, |expiry| expiry > Utc::now())
}

/// Local license record for an infrastructure key
///
/// Valid for one year from now; `keyId` is the hex SHA-512 of the secret.
pub fn infra_license_key(secret: &str) -> ServiceKey {
    let key_id = hex::encode(Sha512::digest(secret.as_bytes()));

    ServiceKey {
        key_type: Some(INFRA_KEY_TYPE.to_string()),
        disabled: false,
        expiry: Some(Utc::now() + ChronoDuration::days(365)),
        auth_level: Some(INFRA_AUTH_LEVEL.to_string()),
        tag: Some(INFRA_KEY_TAG.to_string()),
        key_secret: Some(secret.to_string()),
        key_id: Some(key_id),
        is_authorized: None,
        extra: Map::new(),
    }
}

/// Local license record for the configured `INFRA_LICENSE_KEY`, if any
pub fn configured_infra_license_key(config: &SdkConfig) -> Option<ServiceKey> {
    config
        .infra_license_key
        .as_deref()
        .filter(|secret| !secret.is_empty())
        .map(infra_license_key)
}

/// Cache only a current license that matches `license_key` and is active
pub fn current_license_admission(license_key: &str) -> Admission {
    let license_key = license_key.to_string();
    Admission::from_fn(move |response: &ResponseEnvelope| {
        let json = response.json.as_ref()?;
        let matches = json.get("keySecret").and_then(Value::as_str) == Some(license_key.as_str());
        let disabled = json.get("disabled").and_then(Value::as_bool).unwrap_or(false);
        (matches && !disabled && expiry_in_future(json)).then(|| response.clone())
    })
}

/// Cache an authorized, unexpired community check with `keySecret` stamped in
pub fn community_license_admission(license_key: &str) -> Admission {
    let license_key = license_key.to_string();
    Admission::from_fn(move |response: &ResponseEnvelope| {
        let mut json = response.json.clone()?;
        let authorized = json.get("isAuthorized").and_then(Value::as_bool).unwrap_or(false);
        if !authorized || !expiry_in_future(&json) {
            return None;
        }

        json.as_object_mut()?
            .insert("keySecret".to_string(), Value::String(license_key.clone()));
        Some(ResponseEnvelope {
            status: response.status,
            text: json.to_string(),
            json: Some(json),
        })
    })
}

/// License lookups on behalf of one session
#[derive(Debug, Clone)]
pub struct LicenseClient {
    session: EnvelopeSession,
    infra_license_key: Option<String>,
}

impl LicenseClient {
    pub fn new(session: EnvelopeSession) -> Self {
        Self {
            session,
            infra_license_key: None,
        }
    }

    /// Client that honours the configured infrastructure key
    pub fn from_config(session: EnvelopeSession, config: &SdkConfig) -> Self {
        Self::new(session).with_infra_license_key(config.infra_license_key.clone())
    }

    pub fn with_infra_license_key(mut self, key: Option<String>) -> Self {
        self.infra_license_key = key.filter(|k| !k.is_empty());
        self
    }

    fn infra_match(&self, license_key: &str) -> Option<ServiceKey> {
        self.infra_license_key
            .as_deref()
            .filter(|infra| *infra == license_key)
            .map(infra_license_key)
    }

    fn request_id(&self, request_uid: Option<&str>, sender_id: Option<&str>) -> Option<RequestId> {
        request_uid.map(|uid| {
            RequestId::with_uuid(uid, sender_id.unwrap_or(self.session.app_id()))
        })
    }

    async fn fetch(
        &self,
        spec: RequestSpec,
        service_url: &str,
        license_key: &str,
    ) -> Result<ServiceKey, SdkError> {
        let url = spec.url.clone();
        let response = self
            .session
            .send_enveloped_with_license(service_url, spec, Some(license_key))
            .await?;

        let response = response.error_for_status(&url)?;
        response
            .parse_json::<ServiceKey>()
            .ok_or_else(|| SdkError::UnexpectedResponse {
                url,
                reason: "license response is not a license record".to_string(),
            })
    }

    /// Current license record for `license_key`
    ///
    /// `request_uid` and `sender_id` seed the request id's uuid and appid.
    pub async fn current_license(
        &self,
        license_key: &str,
        service_url: &str,
        request_uid: Option<&str>,
        sender_id: Option<&str>,
    ) -> Result<ServiceKey, SdkError> {
        if let Some(infra) = self.infra_match(license_key) {
            debug!("🔑 Infrastructure license key accepted locally");
            return Ok(infra);
        }

        let service_url = service_url.trim_end_matches('/');
        let mut spec = RequestSpec::get(format!("{}/servicekey/current", service_url))
            .cache_key(format!("{}/{}", service_url, license_key))
            .ttl(LICENSE_CACHE_TTL)
            .admission_handle(current_license_admission(license_key));
        spec.request_id = self.request_id(request_uid, sender_id);

        let key = self.fetch(spec, service_url, license_key).await?;
        if key.key_secret.as_deref() == Some(license_key) && key.is_active() {
            info!("✅ License is current (tag: {:?})", key.tag);
        } else {
            warn!("⚠️ License rejected by {}", service_url);
        }
        Ok(key)
    }

    /// Whether `license_key` is authorized for `community_id`
    pub async fn check_community_license(
        &self,
        license_key: &str,
        community_id: &str,
        service_url: &str,
        request_uid: Option<&str>,
        sender_id: Option<&str>,
    ) -> Result<ServiceKey, SdkError> {
        if let Some(mut infra) = self.infra_match(license_key) {
            infra.is_authorized = Some(true);
            return Ok(infra);
        }

        let service_url = service_url.trim_end_matches('/');
        let mut spec = RequestSpec::get(format!(
            "{}/community/{}/licensecheck",
            service_url, community_id
        ))
        .cache_key(format!("{}/{}/{}", service_url, community_id, license_key))
        .ttl(LICENSE_CACHE_TTL)
        .admission_handle(community_license_admission(license_key));
        spec.request_id = self.request_id(request_uid, sender_id);

        let mut key = self.fetch(spec, service_url, license_key).await?;
        key.key_secret = Some(license_key.to_string());
        Ok(key)
    }
}
