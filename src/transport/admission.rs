// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Cache Admission Strategies
//!
//! Decides whether (and in what form) a successful response is written to the
//! response cache. Only 200 responses ever reach a strategy.
//!
//! Contract: `admit` receives the full live response and returns
//! - `Some(envelope)` to store `envelope` (the same response or a transformed copy)
//! - `None` to skip caching for this call
//!
//! The caller of `execute_request` always receives the live response; later
//! cache hits return whatever was admitted.

use std::fmt;
use std::sync::Arc;

use super::response::ResponseEnvelope;

pub trait CacheAdmission: Send + Sync {
    fn admit(&self, response: &ResponseEnvelope) -> Option<ResponseEnvelope>;
}

/// Store every 200 response verbatim (the behaviour without a strategy)
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmitAll;

impl CacheAdmission for AdmitAll {
    fn admit(&self, response: &ResponseEnvelope) -> Option<ResponseEnvelope> {
        Some(response.clone())
    }
}

/// Store only responses whose JSON body is present and accepted by `predicate`
pub struct AdmitJsonIf<F> {
    predicate: F,
}

impl<F> AdmitJsonIf<F>
where
    F: Fn(&serde_json::Value) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> CacheAdmission for AdmitJsonIf<F>
where
    F: Fn(&serde_json::Value) -> bool + Send + Sync,
{
    fn admit(&self, response: &ResponseEnvelope) -> Option<ResponseEnvelope> {
        let json = response.json.as_ref()?;
        (self.predicate)(json).then(|| response.clone())
    }
}

/// Adapter for ad hoc closures
pub struct AdmissionFn<F>(pub F);

impl<F> CacheAdmission for AdmissionFn<F>
where
    F: Fn(&ResponseEnvelope) -> Option<ResponseEnvelope> + Send + Sync,
{
    fn admit(&self, response: &ResponseEnvelope) -> Option<ResponseEnvelope> {
        (self.0)(response)
    }
}

/// Shared handle carried by `RequestSpec`
#[derive(Clone)]
pub struct Admission(Arc<dyn CacheAdmission>);

impl Admission {
    pub fn new(strategy: impl CacheAdmission + 'static) -> Self {
        Self(Arc::new(strategy))
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&ResponseEnvelope) -> Option<ResponseEnvelope> + Send + Sync + 'static,
    {
        Self::new(AdmissionFn(f))
    }

    pub fn admit(&self, response: &ResponseEnvelope) -> Option<ResponseEnvelope> {
        self.0.admit(response)
    }
}

impl fmt::Debug for Admission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Admission(..)")
    }
}
