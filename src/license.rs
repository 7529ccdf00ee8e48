// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Runtime license key derivation.
//!
//! The key binds a device to an SDK version: it is the SHA-256 of the
//! device fingerprint and the crate version, rendered as upper case hex in
//! dash separated groups of eight characters. It is computed offline.

use crate::error::{Error, Result};
use crate::platform::Platform;
use serde_json::json;
use sha2::{Digest, Sha256};

const GROUP: usize = 8;

/// Derives the runtime key for `fingerprint`.
pub fn runtime_key(fingerprint: &str) -> String {
    let mut h = Sha256::new();
    h.update(b"micr-sdk:");
    h.update(env!("CARGO_PKG_VERSION").as_bytes());
    h.update(b":");
    h.update(fingerprint.as_bytes());
    let digest = hex::encode_upper(h.finalize());

    digest
        .as_bytes()
        .chunks(GROUP)
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("-")
}

/// Builds the license request payload for this device: the bare key when
/// `raw`, a `{"runtimeLicenseKey": ...}` document otherwise.
pub fn request_payload(platform: &dyn Platform, raw: bool) -> Result<String> {
    let fingerprint = platform
        .device_fingerprint()
        .map_err(|e| Error::License(format!("cannot identify device: {e}")))?;
    let key = runtime_key(&fingerprint);
    if raw {
        Ok(key)
    } else {
        Ok(json!({ "runtimeLicenseKey": key }).to_string())
    }
}
