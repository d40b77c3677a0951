// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Envelope Headers
//!
//! | header         | value                                                |
//! |----------------|------------------------------------------------------|
//! | `publickey`    | sender's base64 public key, in clear (ECDH share)     |
//! | `licensekey`   | tenant license key, encrypted under the shared secret |
//! | `requestid`    | JSON `RequestId`, encrypted under the shared secret   |
//! | `Content-Type` | `application/json; charset=utf-8`                     |

use crate::crypto::{encrypt, CryptoError, SharedSecret};

use super::request::CONTENT_TYPE_JSON;
use super::request_id::RequestId;

pub const HEADER_PUBLIC_KEY: &str = "publickey";
pub const HEADER_LICENSE_KEY: &str = "licensekey";
pub const HEADER_REQUEST_ID: &str = "requestid";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// Header set for one enveloped request
#[derive(Clone, PartialEq, Eq)]
pub struct EnvelopeHeaders {
    pub public_key: String,
    pub license_key: Option<String>,
    pub request_id: String,
}

impl EnvelopeHeaders {
    /// Encrypt the license key and request id under `shared`
    ///
    /// `license_key` is omitted for calls that authenticate by other means.
    pub fn build(
        shared: &SharedSecret,
        sender_public_key: &str,
        license_key: Option<&str>,
        request_id: &RequestId,
    ) -> Result<Self, CryptoError> {
        let license_key = license_key
            .map(|license| encrypt(license.as_bytes(), shared))
            .transpose()?;

        Ok(Self {
            public_key: sender_public_key.to_string(),
            license_key,
            request_id: encrypt(request_id.to_json().as_bytes(), shared)?,
        })
    }

    /// Name/value pairs ready for `RequestSpec::headers`
    pub fn into_pairs(self) -> Vec<(String, String)> {
        let mut pairs = vec![
            (HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string()),
            (HEADER_PUBLIC_KEY.to_string(), self.public_key),
            (HEADER_REQUEST_ID.to_string(), self.request_id),
        ];
        if let Some(license) = self.license_key {
            pairs.push((HEADER_LICENSE_KEY.to_string(), license));
        }
        pairs
    }
}

impl std::fmt::Debug for EnvelopeHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeHeaders")
            .field("public_key", &self.public_key)
            .field("has_license_key", &self.license_key.is_some())
            .finish()
    }
}
