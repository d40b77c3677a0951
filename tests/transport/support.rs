// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Shared test doubles for transport tests

use async_trait::async_trait;
use bid_envelope::transport::{HttpDispatch, RawResponse, RequestSpec, TransportError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Dispatcher that replays scripted responses and counts calls
///
/// The last scripted response repeats once the script is exhausted.
pub struct CountingDispatch {
    script: Mutex<Vec<RawResponse>>,
    calls: AtomicUsize,
}

impl CountingDispatch {
    pub fn new(status: u16, body: &str) -> Self {
        Self::scripted(vec![(status, body)])
    }

    pub fn scripted(responses: Vec<(u16, &str)>) -> Self {
        Self {
            script: Mutex::new(
                responses
                    .into_iter()
                    .rev()
                    .map(|(status, text)| RawResponse {
                        status,
                        text: text.to_string(),
                    })
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpDispatch for CountingDispatch {
    async fn dispatch(&self, _request: &RequestSpec) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        let next = if script.len() > 1 {
            script.pop()
        } else {
            script.last().cloned()
        };
        Ok(next.unwrap_or(RawResponse {
            status: 500,
            text: String::new(),
        }))
    }
}
