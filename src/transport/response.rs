// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::TransportError;

/// Status, raw text and best-effort JSON of one HTTP response
///
/// A cache hit returns the stored envelope unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub text: String,
    /// Absent when the body is empty or not JSON; that is not an error
    pub json: Option<JsonValue>,
}

impl ResponseEnvelope {
    /// Build from status and raw body, attempting JSON parsing
    pub fn from_parts(status: u16, text: String) -> Self {
        let json = serde_json::from_str::<JsonValue>(&text).ok();
        Self { status, text, json }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convert a non-2xx response into `TransportError::Status`
    pub fn error_for_status(self, url: &str) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                url: url.to_string(),
                status: self.status,
                text: self.text,
            })
        }
    }

    /// String field of the JSON body, if present
    pub fn json_str(&self, field: &str) -> Option<&str> {
        self.json.as_ref()?.get(field)?.as_str()
    }

    /// Deserialize the JSON body into a typed value
    pub fn parse_json<T: for<'de> Deserialize<'de>>(&self) -> Option<T> {
        self.json
            .as_ref()
            .and_then(|json| serde_json::from_value(json.clone()).ok())
    }
}
