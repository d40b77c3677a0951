// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Envelope Session
//!
//! Explicit context object for one tenant: the caller's key pair, the license
//! key, the app id and the transport (with its cache). Passing a session
//! around replaces process-wide key and cache state, so several tenants can
//! live in one process without sharing anything by accident.
//!
//! ## Enveloped Call Flow
//!
//! 1. `GET {service}/publickeys` (cached for 24h)
//! 2. shared secret = ECDH(session private key, service public key)
//! 3. `publickey` / `licensekey` / `requestid` headers built under that secret
//! 4. request dispatched through the transport

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::config::SdkConfig;
use crate::crypto::{
    create_shared_key, decrypt, encrypt, generate_key_pair, CryptoError, KeyPair, SharedSecret,
};
use crate::error::SdkError;
use crate::transport::{
    AdmitJsonIf, EnvelopeHeaders, RequestId, RequestSpec, ResponseEnvelope, Transport,
    DEFAULT_APP_ID,
};

/// How long a service's public key stays cached
pub const PUBLIC_KEY_TTL: Duration = Duration::from_secs(86_400);

/// Cloning shares key pair, transport and cache.
#[derive(Clone)]
pub struct EnvelopeSession {
    key_pair: Arc<RwLock<KeyPair>>,
    license_key: Arc<String>,
    app_id: Arc<String>,
    transport: Transport,
    default_timeout: Option<Duration>,
    /// Cache keys of service public keys fetched by this session
    public_key_entries: Arc<Mutex<HashSet<String>>>,
}

impl EnvelopeSession {
    pub fn new(key_pair: KeyPair, license_key: impl Into<String>, transport: Transport) -> Self {
        Self {
            key_pair: Arc::new(RwLock::new(key_pair)),
            license_key: Arc::new(license_key.into()),
            app_id: Arc::new(DEFAULT_APP_ID.to_string()),
            transport,
            default_timeout: None,
            public_key_entries: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Session with a fresh key pair and a `reqwest` transport
    pub fn from_config(config: &SdkConfig) -> Result<Self, SdkError> {
        let session = Self::new(
            generate_key_pair(),
            config.tenant.license_key.clone(),
            Transport::new()?,
        )
        .with_app_id(config.app_id.clone());

        Ok(match config.request_timeout {
            Some(timeout) => session.with_default_timeout(timeout),
            None => session,
        })
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Arc::new(app_id.into());
        self
    }

    /// Timeout applied to requests that do not set their own
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn license_key(&self) -> &str {
        &self.license_key
    }

    pub async fn key_pair(&self) -> KeyPair {
        self.key_pair.read().await.clone()
    }

    pub async fn public_key(&self) -> String {
        self.key_pair.read().await.public_key.clone()
    }

    /// Replace the session key pair
    ///
    /// Every service public key this session cached is evicted so the next
    /// call re-fetches it. Returns the new public key.
    pub async fn rotate_key_pair(&self) -> String {
        let fresh = generate_key_pair();
        let public_key = fresh.public_key.clone();
        *self.key_pair.write().await = fresh;

        let mut entries = self.public_key_entries.lock().await;
        for key in entries.drain() {
            self.transport.cache().remove(&key).await;
        }

        info!("🔑 Session key pair rotated");
        public_key
    }

    fn apply_defaults(&self, mut spec: RequestSpec) -> RequestSpec {
        if spec.timeout.is_none() {
            spec.timeout = self.default_timeout;
        }
        spec
    }

    /// Public key published by a service
    ///
    /// # Errors
    ///
    /// `PublicKeyNotFound` when the response has no `publicKey` string; such
    /// responses are never cached.
    pub async fn service_public_key(&self, service_url: &str) -> Result<String, SdkError> {
        let url = format!("{}/publickeys", service_url.trim_end_matches('/'));

        let spec = RequestSpec::get(&url)
            .keep_alive(true)
            .cache_key(&url)
            .ttl(PUBLIC_KEY_TTL)
            .admission(AdmitJsonIf::new(|json| {
                json.get("publicKey").map_or(false, |v| v.is_string())
            }));

        let response = self
            .transport
            .execute_request(self.apply_defaults(spec))
            .await?;

        self.public_key_entries.lock().await.insert(url.clone());

        response
            .json_str("publicKey")
            .map(str::to_string)
            .ok_or(SdkError::PublicKeyNotFound { url })
    }

    /// Shared secret between this session and a peer public key
    pub async fn shared_key_with(&self, peer_public_key: &str) -> Result<SharedSecret, CryptoError> {
        let keys = self.key_pair.read().await;
        create_shared_key(&keys.private_key, peer_public_key)
    }

    /// Shared secret between this session and a service
    pub async fn shared_key_for(&self, service_url: &str) -> Result<SharedSecret, SdkError> {
        let service_key = self.service_public_key(service_url).await?;
        Ok(self.shared_key_with(&service_key).await?)
    }

    /// Envelope headers for one request
    ///
    /// `license_key` of `None` omits the `licensekey` header.
    pub async fn envelope_headers(
        &self,
        shared: &SharedSecret,
        request_id: &RequestId,
        license_key: Option<&str>,
    ) -> Result<Vec<(String, String)>, CryptoError> {
        let public_key = self.public_key().await;
        Ok(EnvelopeHeaders::build(shared, &public_key, license_key, request_id)?.into_pairs())
    }

    /// Send a request to a service with the session's license key
    pub async fn send_enveloped(
        &self,
        service_url: &str,
        spec: RequestSpec,
    ) -> Result<ResponseEnvelope, SdkError> {
        let license = self.license_key.clone();
        self.send_enveloped_with_license(service_url, spec, Some(license.as_str()))
            .await
    }

    /// Send a request to a service with an explicit (or no) license key
    ///
    /// The request id is re-stamped on every call; a `request_id` already on
    /// `spec` keeps its uuid and appid.
    pub async fn send_enveloped_with_license(
        &self,
        service_url: &str,
        spec: RequestSpec,
        license_key: Option<&str>,
    ) -> Result<ResponseEnvelope, SdkError> {
        let shared = self.shared_key_for(service_url).await?;
        let request_id = RequestId::refresh(spec.request_id.as_ref(), &self.app_id);
        let headers = self
            .envelope_headers(&shared, &request_id, license_key)
            .await?;

        let spec = spec
            .headers(headers)
            .keep_alive(true)
            .request_id(request_id);

        Ok(self
            .transport
            .execute_request(self.apply_defaults(spec))
            .await?)
    }

    /// Serialize and encrypt a value
    pub fn seal<T: Serialize>(value: &T, shared: &SharedSecret) -> Result<String, SdkError> {
        let json = serde_json::to_string(value).map_err(|e| SdkError::UnexpectedResponse {
            url: String::new(),
            reason: format!("value is not serializable: {}", e),
        })?;
        Ok(encrypt(json.as_bytes(), shared)?)
    }

    /// Decrypt and deserialize a value
    pub fn open<T: DeserializeOwned>(envelope: &str, shared: &SharedSecret) -> Result<T, SdkError> {
        let json = decrypt(envelope, shared)?;
        serde_json::from_str(&json).map_err(|e| SdkError::UnexpectedResponse {
            url: String::new(),
            reason: format!("decrypted payload is not the expected JSON: {}", e),
        })
    }

    /// Decrypt data another party encrypted for this session's public key
    pub async fn open_from(&self, envelope: &str, peer_public_key: &str) -> Result<String, SdkError> {
        let shared = self.shared_key_with(peer_public_key).await?;
        Ok(decrypt(envelope, &shared)?)
    }
}

impl std::fmt::Debug for EnvelopeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeSession")
            .field("app_id", &self.app_id)
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}
