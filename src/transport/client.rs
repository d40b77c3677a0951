// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request Transport
//!
//! Executes one logical HTTP call with optional caching, timeout and
//! cancellation. Pipeline:
//!
//! ```text
//! delete_cache_key → cache read (unless force_fresh) ─hit→ return stored
//!                                   │ miss
//!                                   ▼
//!                    dispatch (timeout / cancel) → parse → cache write (200 only) → return
//! ```
//!
//! Network failures are never masked by cached data, and nothing is retried.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::cache::ResponseCache;
use super::dispatch::{HttpDispatch, RawResponse, ReqwestDispatch};
use super::error::TransportError;
use super::request::RequestSpec;
use super::response::ResponseEnvelope;

const STATUS_OK: u16 = 200;

/// Cached HTTP transport
///
/// Cloning shares both the dispatcher (and its connection pools) and the
/// response cache.
#[derive(Clone)]
pub struct Transport {
    dispatcher: Arc<dyn HttpDispatch>,
    cache: ResponseCache,
}

impl Transport {
    /// Transport over `reqwest` with its own empty cache
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self::with_dispatcher(Arc::new(ReqwestDispatch::new()?)))
    }

    pub fn with_dispatcher(dispatcher: Arc<dyn HttpDispatch>) -> Self {
        Self {
            dispatcher,
            cache: ResponseCache::new(),
        }
    }

    /// Share an existing cache (e.g. between sessions of one tenant)
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Execute a request
    ///
    /// # Returns
    ///
    /// - the stored response, unchanged, on a fresh cache hit (no network call)
    /// - otherwise the live response, whatever its status
    ///
    /// # Errors
    ///
    /// `InvalidRequest`, `Connect`, `Timeout` and `Aborted`. A non-2xx status
    /// is returned as a normal `ResponseEnvelope`.
    pub async fn execute_request(
        &self,
        request: RequestSpec,
    ) -> Result<ResponseEnvelope, TransportError> {
        let correlation = request
            .request_id
            .as_ref()
            .map(|id| id.uuid.as_str())
            .unwrap_or("-");

        if let Some(stale) = &request.delete_cache_key {
            self.cache.remove(stale).await;
        }

        if let Some(key) = &request.cache_key {
            if !request.force_fresh {
                if let Some(cached) = self.cache.get(key).await {
                    debug!(
                        "📦 Cache hit for {} {} (key: '{}', request: {})",
                        request.method, request.url, key, correlation
                    );
                    return Ok(cached);
                }
            }
        }

        let start_time = Instant::now();
        let raw = self.dispatch_with_limits(&request).await;
        let duration_ms = start_time.elapsed().as_millis();

        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "❌ {} {} failed after {}ms (request: {}): {}",
                    request.method, request.url, duration_ms, correlation, e
                );
                return Err(e);
            }
        };

        info!(
            "🌐 {} {} → {} in {}ms (request: {})",
            request.method, request.url, raw.status, duration_ms, correlation
        );

        let response = ResponseEnvelope::from_parts(raw.status, raw.text);

        if let Some(key) = &request.cache_key {
            if response.status == STATUS_OK {
                let admitted = match &request.admission {
                    Some(admission) => admission.admit(&response),
                    None => Some(response.clone()),
                };
                match admitted {
                    Some(stored) => self.cache.put(key, stored, request.ttl).await,
                    None => debug!("🚫 Admission declined caching for key '{}'", key),
                }
            }
        }

        Ok(response)
    }

    async fn dispatch_with_limits(
        &self,
        request: &RequestSpec,
    ) -> Result<RawResponse, TransportError> {
        let call = self.dispatcher.dispatch(request);

        // Dropping `call` on timeout/cancel releases its connection
        let limited = async {
            match request.timeout {
                Some(after) => tokio::time::timeout(after, call)
                    .await
                    .map_err(|_| TransportError::Timeout {
                        url: request.url.clone(),
                        after,
                    })?,
                None => call.await,
            }
        };

        match &request.cancel {
            Some(token) => tokio::select! {
                result = limited => result,
                _ = token.cancelled() => Err(TransportError::Aborted {
                    url: request.url.clone(),
                }),
            },
            None => limited.await,
        }
    }
}
