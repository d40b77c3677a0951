// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error type for the session, tenant and license layers
//!
//! Wraps `CryptoError` and `TransportError` without re-labelling them, so a
//! caller can always tell a retryable network condition from a permanent
//! cryptographic or validation failure.

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Service did not publish a public key
    #[error("No public key found at {url}")]
    PublicKeyNotFound { url: String },

    /// Response parsed but lacked required fields
    #[error("Unexpected response from {url}: {reason}")]
    UnexpectedResponse { url: String, reason: String },

    /// Tenant or community could not be resolved
    #[error("Tenant resolution failed for {dns}: {reason}")]
    TenantResolution { dns: String, reason: String },

    /// Missing or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SdkError {
    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Transport(e) => e.status(),
            SdkError::PublicKeyNotFound { .. } => Some(404),
            _ => None,
        }
    }
}
