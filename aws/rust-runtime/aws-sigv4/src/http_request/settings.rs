/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use std::time::SystemTime;

/// Settings that alter the shape of the canonical request
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SigningSettings {
    /// URI encoding setting for the canonical path
    pub uri_encoding: UriEncoding,

    /// Add an additional checksum header
    pub payload_checksum_kind: PayloadChecksumKind,
}

/// Config value to specify how to encode the request URL when signing
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UriEncoding {
    /// Re-encode the `%` of an already encoded path so that the canonical path is encoded twice
    ///
    /// This is the setting used by every service except S3.
    Double,

    /// Use the path as it appears on the request
    Single,
}

impl Default for UriEncoding {
    fn default() -> Self {
        UriEncoding::Double
    }
}

/// Config value to specify whether `x-amz-content-sha256` should be added to the request
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PayloadChecksumKind {
    /// Add the body checksum as an `x-amz-content-sha256` header
    XAmzSha256,

    /// Only use the body checksum inside the canonical request
    NoHeader,
}

impl Default for PayloadChecksumKind {
    fn default() -> Self {
        PayloadChecksumKind::NoHeader
    }
}

/// Everything needed to sign a request besides the request itself
#[derive(Clone)]
pub struct SigningParams<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub security_token: Option<&'a str>,
    pub region: &'a str,
    pub service_name: &'a str,

    /// Timestamp to use in the signature (should be `SystemTime::now()` unless testing).
    pub date_time: SystemTime,
    pub settings: SigningSettings,
}

impl std::fmt::Debug for SigningParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningParams")
            .field("access_key", &self.access_key)
            .field("secret_key", &"** redacted **")
            .field("region", &self.region)
            .field("service_name", &self.service_name)
            .field("date_time", &self.date_time)
            .field("settings", &self.settings)
            .finish()
    }
}
