// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request description consumed by `Transport::execute_request`

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::admission::{Admission, CacheAdmission};
use super::error::TransportError;
use super::request_id::RequestId;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body
///
/// JSON bodies are serialized; form and text bodies pass through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
    Text(String),
}

/// One logical HTTP call plus its cache, timeout and connection options
#[derive(Clone)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Cache slot to read from and write to
    pub cache_key: Option<String>,
    /// Lifetime of a cache write; `None` stores without expiry
    pub ttl: Option<Duration>,
    /// Skip the cache read but still write a fresh 200 response
    pub force_fresh: bool,
    /// Entry evicted before the cache read
    pub delete_cache_key: Option<String>,
    pub timeout: Option<Duration>,
    /// Reuse the pooled keep-alive connection for this URL's scheme
    pub keep_alive: bool,
    /// Caller-supplied connection agent, used instead of the pools
    pub agent: Option<reqwest::Client>,
    pub admission: Option<Admission>,
    /// Correlation id for log lines
    pub request_id: Option<RequestId>,
    pub cancel: Option<CancellationToken>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            cache_key: None,
            ttl: None,
            force_fresh: false,
            delete_cache_key: None,
            timeout: None,
            keep_alive: false,
            agent: None,
            admission: None,
            request_id: None,
            cancel: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Serialize any value as the JSON body
    pub fn json<T: Serialize>(self, body: &T) -> Result<Self, TransportError> {
        let value = serde_json::to_value(body)
            .map_err(|e| TransportError::InvalidRequest(format!("body is not JSON: {}", e)))?;
        Ok(self.json_body(value))
    }

    pub fn form_body(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn force_fresh(mut self, force: bool) -> Self {
        self.force_fresh = force;
        self
    }

    pub fn delete_cache_key(mut self, key: impl Into<String>) -> Self {
        self.delete_cache_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn agent(mut self, client: reqwest::Client) -> Self {
        self.agent = Some(client);
        self
    }

    pub fn admission(mut self, strategy: impl CacheAdmission + 'static) -> Self {
        self.admission = Some(Admission::new(strategy));
        self
    }

    pub fn admission_handle(mut self, admission: Admission) -> Self {
        self.admission = Some(admission);
        self
    }

    pub fn request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Whether the caller set a header, compared case-insensitively
    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl fmt::Debug for RequestSpec {
    // Header values may carry encrypted license keys; only names are shown
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("RequestSpec")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("has_body", &self.body.is_some())
            .field("cache_key", &self.cache_key)
            .field("ttl", &self.ttl)
            .field("force_fresh", &self.force_fresh)
            .field("delete_cache_key", &self.delete_cache_key)
            .field("timeout", &self.timeout)
            .field("keep_alive", &self.keep_alive)
            .field("request_id", &self.request_id)
            .finish()
    }
}
