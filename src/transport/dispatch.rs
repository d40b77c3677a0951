// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP Dispatch
//!
//! The seam between the transport pipeline and the wire. `Transport` talks to
//! an `HttpDispatch`; production code uses `ReqwestDispatch`, tests substitute
//! a counting mock.
//!
//! ## Connection Pools
//!
//! ```text
//! keep_alive = true   → pooled client for the URL's scheme (http / https)
//! keep_alive = false  → client that keeps no idle connections
//! agent = Some(c)     → caller's client, regardless of keep_alive
//! ```

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Method};
use std::time::Duration;
use url::Url;

use super::error::TransportError;
use super::request::{HttpMethod, RequestBody, RequestSpec, CONTENT_TYPE_JSON};

/// Status and body exactly as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub text: String,
}

#[async_trait]
pub trait HttpDispatch: Send + Sync {
    /// Perform one network call; no caching, no timeout handling
    async fn dispatch(&self, request: &RequestSpec) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed dispatcher with one keep-alive pool per scheme
#[derive(Clone, Debug)]
pub struct ReqwestDispatch {
    http_pool: Client,
    https_pool: Client,
    one_shot: Client,
}

impl ReqwestDispatch {
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            http_pool: pooled_client()?,
            https_pool: pooled_client()?,
            one_shot: Client::builder()
                .pool_max_idle_per_host(0)
                .build()
                .map_err(|e| TransportError::InvalidRequest(format!("client build failed: {}", e)))?,
        })
    }

    /// Use caller-built clients as the per-scheme pools
    pub fn with_pools(http_pool: Client, https_pool: Client, one_shot: Client) -> Self {
        Self {
            http_pool,
            https_pool,
            one_shot,
        }
    }

    fn client_for(&self, request: &RequestSpec, url: &Url) -> Result<Client, TransportError> {
        if let Some(agent) = &request.agent {
            return Ok(agent.clone());
        }
        if !request.keep_alive {
            return Ok(self.one_shot.clone());
        }
        match url.scheme() {
            "http" => Ok(self.http_pool.clone()),
            "https" => Ok(self.https_pool.clone()),
            other => Err(TransportError::InvalidRequest(format!(
                "unsupported URL scheme '{}'",
                other
            ))),
        }
    }
}

fn pooled_client() -> Result<Client, TransportError> {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .build()
        .map_err(|e| TransportError::InvalidRequest(format!("client build failed: {}", e)))
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl HttpDispatch for ReqwestDispatch {
    async fn dispatch(&self, request: &RequestSpec) -> Result<RawResponse, TransportError> {
        let url = Url::parse(&request.url).map_err(|e| {
            TransportError::InvalidRequest(format!("invalid URL '{}': {}", request.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::InvalidRequest(format!(
                "unsupported URL scheme '{}'",
                url.scheme()
            )));
        }

        let client = self.client_for(request, &url)?;
        let mut builder = client.request(to_reqwest_method(request.method), url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            Some(RequestBody::Json(value)) => {
                let body = serde_json::to_string(value).map_err(|e| {
                    TransportError::InvalidRequest(format!("body is not JSON: {}", e))
                })?;
                if !request.has_header(CONTENT_TYPE.as_str()) {
                    builder = builder.header(CONTENT_TYPE, CONTENT_TYPE_JSON);
                }
                builder.body(body)
            }
            Some(RequestBody::Form(fields)) => builder.form(fields),
            Some(RequestBody::Text(text)) => builder.body(text.clone()),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| TransportError::Connect {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| TransportError::Connect {
            url: request.url.clone(),
            reason: format!("failed to read body: {}", e),
        })?;

        Ok(RawResponse { status, text })
    }
}
