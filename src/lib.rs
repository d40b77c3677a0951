// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod licenses;
pub mod session;
pub mod tenant;
pub mod transport;
pub mod version;

// Re-export main types
pub use config::SdkConfig;
pub use crypto::{
    create_shared_key, create_wallet, decrypt, encrypt, generate_key_pair, sign, verify,
    wallet_from_phrase, CryptoError, KeyPair, SharedSecret, Wallet,
};
pub use error::SdkError;
pub use licenses::{configured_infra_license_key, infra_license_key, LicenseClient, ServiceKey};
pub use session::EnvelopeSession;
pub use tenant::{
    resolve_community, resolve_service_directory, CommunityInfo, ServiceDirectory, TenantInfo,
};
pub use transport::{
    CacheAdmission, RequestId, RequestSpec, ResponseCache, ResponseEnvelope, Transport,
    TransportError,
};
