// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request ID Freshness Token
//!
//! Every enveloped request carries a JSON `{ts, uuid, appid}` encrypted into
//! the `requestid` header. The receiver uses `ts` to reject stale or replayed
//! requests, so `ts` is re-stamped on every send even when a multi-step flow
//! carries the same `uuid` across calls.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// App id used when the caller does not supply one
pub const DEFAULT_APP_ID: &str = "com.1kosmos.helper.request";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestId {
    /// Unix seconds
    pub ts: i64,
    pub uuid: String,
    pub appid: String,
}

impl RequestId {
    /// Fresh id with a new random uuid
    pub fn new(appid: impl Into<String>) -> Self {
        Self {
            ts: unix_seconds(),
            uuid: Uuid::new_v4().to_string(),
            appid: appid.into(),
        }
    }

    /// Re-stamp `ts`, keeping `uuid` and `appid` from a previous id when present
    pub fn refresh(previous: Option<&RequestId>, default_appid: &str) -> Self {
        match previous {
            Some(prev) => Self {
                ts: unix_seconds(),
                uuid: if prev.uuid.is_empty() {
                    Uuid::new_v4().to_string()
                } else {
                    prev.uuid.clone()
                },
                appid: if prev.appid.is_empty() {
                    default_appid.to_string()
                } else {
                    prev.appid.clone()
                },
            },
            None => Self::new(default_appid),
        }
    }

    /// Id that reuses a caller-supplied uuid (e.g. a correlation id)
    pub fn with_uuid(uuid: impl Into<String>, appid: impl Into<String>) -> Self {
        Self {
            ts: unix_seconds(),
            uuid: uuid.into(),
            appid: appid.into(),
        }
    }

    pub fn to_json(&self) -> String {
        // Serializing three plain fields cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new(DEFAULT_APP_ID)
    }
}

/// Current time in unix seconds, rounded to the nearest second
fn unix_seconds() -> i64 {
    (Utc::now().timestamp_millis() + 500) / 1000
}
