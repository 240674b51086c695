/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use aws_sigv4::http_request::{
    sign, PayloadChecksumKind, SignableBody, SignableRequest, SigningParams, SigningSettings,
    UriEncoding,
};
use aws_types::region::SigningRegion;
use aws_types::{Credentials, SigningService};
use smithy_http::body::SdkBody;
use std::fmt;
use std::time::SystemTime;

pub type SigningError = aws_sigv4::http_request::SigningError;

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum SigningAlgorithm {
    SigV4,
}

/// Signing Configuration for an Operation
///
/// Although these fields MAY be customized on a per request basis, they are generally static
/// for a given operation
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct OperationSigningConfig {
    pub algorithm: SigningAlgorithm,
    pub signing_options: SigningOptions,
    pub signing_requirements: SigningRequirements,
}

impl OperationSigningConfig {
    /// The signing configuration used by every EC2 Query operation
    pub fn default_config() -> Self {
        OperationSigningConfig {
            algorithm: SigningAlgorithm::SigV4,
            signing_options: SigningOptions {
                double_uri_encode: true,
                content_sha256_header: false,
            },
            signing_requirements: SigningRequirements::Required,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SigningRequirements {
    /// A signature MAY be added if credentials are defined
    Optional,

    /// A signature MUST be added.
    ///
    /// If no credentials are provided, this will return an error without dispatching the operation.
    Required,

    /// A signature MUST NOT be added.
    Disabled,
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub struct SigningOptions {
    pub double_uri_encode: bool,
    pub content_sha256_header: bool,
}

/// Signing Configuration for an individual Request
///
/// These fields may vary on a per-request basis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig<'a> {
    pub request_ts: SystemTime,
    pub region: &'a SigningRegion,
    pub service: &'a SigningService,
}

/// The hex-encoded signature that was attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(String);

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Default)]
pub struct SigV4Signer {
    _private: (),
}

impl fmt::Debug for SigV4Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigV4Signer").finish()
    }
}

impl SigV4Signer {
    pub fn new() -> Self {
        SigV4Signer { _private: () }
    }

    fn settings(operation_config: &OperationSigningConfig) -> SigningSettings {
        let mut settings = SigningSettings::default();
        settings.uri_encoding = if operation_config.signing_options.double_uri_encode {
            UriEncoding::Double
        } else {
            UriEncoding::Single
        };
        settings.payload_checksum_kind = if operation_config.signing_options.content_sha256_header
        {
            PayloadChecksumKind::XAmzSha256
        } else {
            PayloadChecksumKind::NoHeader
        };
        settings
    }

    /// Sign a request using the SigV4 Protocol
    ///
    /// Although this function may be used, end users will not typically
    /// interact with this code. It is generally used via middleware in the request pipeline. See [`SigV4SigningStage`](crate::middleware::SigV4SigningStage).
    pub fn sign(
        &self,
        operation_config: &OperationSigningConfig,
        request_config: &RequestConfig<'_>,
        credentials: &Credentials,
        request: &mut http::Request<SdkBody>,
    ) -> Result<Signature, SigningError> {
        if credentials.is_expired(request_config.request_ts) {
            tracing::warn!(
                provider = credentials.provider_name(),
                "signing with expired credentials"
            );
        }
        let params = SigningParams {
            access_key: credentials.access_key_id(),
            secret_key: credentials.secret_access_key(),
            security_token: credentials.session_token(),
            region: request_config.region.as_ref(),
            service_name: request_config.service.as_ref(),
            date_time: request_config.request_ts,
            settings: Self::settings(operation_config),
        };

        // Streaming bodies cannot be hashed up front
        let body = match request.body().bytes() {
            Some(data) => SignableBody::Bytes(data),
            None => SignableBody::UnsignedPayload,
        };
        let signable =
            SignableRequest::new(request.method(), request.uri(), request.headers(), body);
        let output = sign(signable, &params)?;
        let signature = Signature(output.signature().to_string());
        output.apply_to_request(request);
        Ok(signature)
    }
}

#[cfg(test)]
mod test {
    use super::{OperationSigningConfig, RequestConfig, SigV4Signer};
    use aws_types::region::SigningRegion;
    use aws_types::{Credentials, SigningService};
    use smithy_http::body::SdkBody;
    use std::time::{Duration, UNIX_EPOCH};
    use tracing_test::traced_test;

    fn ec2_request() -> http::Request<SdkBody> {
        http::Request::builder()
            .method("POST")
            .uri("https://ec2.us-east-1.amazonaws.com/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(SdkBody::from("Action=DescribeRegions&Version=2016-11-15"))
            .unwrap()
    }

    #[test]
    fn signs_sdk_body() {
        let signer = SigV4Signer::new();
        let region = SigningRegion::from_static("us-east-1");
        let service = SigningService::from_static("ec2");
        let request_config = RequestConfig {
            request_ts: UNIX_EPOCH + Duration::from_secs(1614556800),
            region: &region,
            service: &service,
        };
        let creds = Credentials::from_keys("AKIDEXAMPLE", "secret", None);
        let mut request = ec2_request();
        let signature = signer
            .sign(
                &OperationSigningConfig::default_config(),
                &request_config,
                &creds,
                &mut request,
            )
            .expect("signing succeeds");
        assert_eq!(
            signature.as_ref(),
            "0e0a840b897cedd744b5c34f5d85156e47af025c3612f39fada65e6b96543961"
        );
        assert_eq!(request.headers()["x-amz-date"], "20210301T000000Z");
    }

    #[test]
    #[traced_test]
    fn warns_on_expired_credentials() {
        let signer = SigV4Signer::new();
        let region = SigningRegion::from_static("us-east-1");
        let service = SigningService::from_static("ec2");
        let now = UNIX_EPOCH + Duration::from_secs(1614556800);
        let request_config = RequestConfig {
            request_ts: now,
            region: &region,
            service: &service,
        };
        let creds = Credentials::new(
            "AKIDEXAMPLE",
            "secret",
            None,
            Some(now - Duration::from_secs(60)),
            "test",
        );
        signer
            .sign(
                &OperationSigningConfig::default_config(),
                &request_config,
                &creds,
                &mut ec2_request(),
            )
            .expect("expired credentials still produce a signature");
        assert!(logs_contain("signing with expired credentials"));
    }
}
