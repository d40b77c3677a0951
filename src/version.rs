// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the BID envelope SDK

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-envelope-session-2025-10-13";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-13";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "ecdh-secp256k1",
    "aes-256-gcm-envelope",
    "ecdsa-signatures",
    "mnemonic-wallets",
    "response-cache",
    "cache-admission",
    "request-id-freshness",
    "envelope-sessions",
    "tenant-resolution",
    "license-checks",
];

/// Wire format notes a caller must match
pub const WIRE_FORMAT: &[&str] = &[
    "Public keys are 64-byte uncompressed points without the 0x04 prefix, base64",
    "Shared secret is the raw 32-byte ECDH x-coordinate",
    "Ciphertext is base64(iv[16] || ciphertext || tag[16])",
    "Signatures are raw r || s (64 bytes), base64",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("BID Envelope SDK {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info as JSON
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
        "wire_format": WIRE_FORMAT,
    })
}
