// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Transport Error Types
//!
//! The transport is the only place network failures are observed. A non-2xx
//! status is not an error at this layer; it comes back as a `ResponseEnvelope`
//! and only becomes `Status` when a caller asks for it via
//! `ResponseEnvelope::error_for_status`.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Request could not be built (bad URL, unsupported scheme, body encoding)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// DNS, connect, TLS or mid-body I/O failure
    #[error("Connection to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    /// Request exceeded its deadline and was aborted
    #[error("Request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    /// Request was cancelled by the caller before it completed
    #[error("Request to {url} was aborted")]
    Aborted { url: String },

    /// Server answered with a non-success status
    #[error("Request to {url} returned status {status}: {text}")]
    Status {
        url: String,
        status: u16,
        text: String,
    },
}

impl TransportError {
    /// Whether retrying the same request may succeed
    ///
    /// Connection failures, timeouts and 5xx statuses are transient. Invalid
    /// requests, cancellations and 4xx statuses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Connect { .. } | TransportError::Timeout { .. } => true,
            TransportError::Status { status, .. } => *status >= 500,
            TransportError::InvalidRequest(_) | TransportError::Aborted { .. } => false,
        }
    }

    /// HTTP status, when the error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
