// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request Transport
//!
//! Outbound HTTP with a best-effort response cache:
//!
//! - **RequestSpec**: method, URL, headers, body and per-call options
//! - **Transport**: cache short-circuit, dispatch, timeout/cancel, cache admission
//! - **ResponseCache**: keyed TTL storage, whole-value replacement
//! - **CacheAdmission**: strategy deciding what a 200 response stores
//! - **EnvelopeHeaders**: `publickey` / `licensekey` / `requestid` construction
//! - **RequestId**: timestamped anti-replay token
//!
//! The cache is a latency optimization only; a failed network call never falls
//! back to a cached value.

pub mod admission;
pub mod cache;
pub mod client;
pub mod dispatch;
pub mod error;
pub mod headers;
pub mod request;
pub mod request_id;
pub mod response;

pub use admission::{Admission, AdmissionFn, AdmitAll, AdmitJsonIf, CacheAdmission};
pub use cache::ResponseCache;
pub use client::Transport;
pub use dispatch::{HttpDispatch, RawResponse, ReqwestDispatch};
pub use error::TransportError;
pub use headers::EnvelopeHeaders;
pub use request::{HttpMethod, RequestBody, RequestSpec, CONTENT_TYPE_JSON};
pub use request_id::{RequestId, DEFAULT_APP_ID};
pub use response::ResponseEnvelope;
