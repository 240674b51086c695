/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use super::canonical_request::{
    CanonicalRequest, StringToSign, HMAC_256, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE,
    X_AMZ_SECURITY_TOKEN,
};
use super::error::SigningError;
use super::settings::{PayloadChecksumKind, SigningParams};
use crate::sign::{calculate_signature, generate_signing_key, sha256_hex_string};
use http::header::{HeaderName, HeaderValue, AUTHORIZATION};
use http::{HeaderMap, Method, Uri};

/// Represents all of the information necessary to sign an HTTP request.
#[derive(Debug)]
#[non_exhaustive]
pub struct SignableRequest<'a> {
    method: &'a Method,
    uri: &'a Uri,
    headers: &'a HeaderMap<HeaderValue>,
    body: SignableBody<'a>,
}

impl<'a> SignableRequest<'a> {
    /// Creates a new `SignableRequest`.
    pub fn new(
        method: &'a Method,
        uri: &'a Uri,
        headers: &'a HeaderMap<HeaderValue>,
        body: SignableBody<'a>,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
        }
    }

    /// Creates a new `SignableRequest` from an in-memory HTTP request.
    pub fn from_http<B>(request: &'a http::Request<B>) -> SignableRequest<'a>
    where
        B: 'a,
        B: AsRef<[u8]>,
    {
        SignableRequest::new(
            request.method(),
            request.uri(),
            request.headers(),
            SignableBody::Bytes(request.body().as_ref()),
        )
    }

    pub fn uri(&self) -> &Uri {
        self.uri
    }

    pub fn method(&self) -> &'a Method {
        self.method
    }

    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        self.headers
    }

    pub fn body(&self) -> &SignableBody<'a> {
        &self.body
    }
}

/// A signable HTTP request body
#[derive(Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum SignableBody<'a> {
    /// A body composed of a slice of bytes
    Bytes(&'a [u8]),

    /// An unsigned payload
    ///
    /// UnsignedPayload is used for streaming requests where the contents of the body cannot be
    /// known prior to signing
    UnsignedPayload,

    /// A precomputed body checksum. The checksum should be a SHA256 checksum of the body,
    /// lowercase hex encoded. Eg:
    /// `e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855`
    Precomputed(String),
}

/// The headers to add to a request and the signature they carry
#[derive(Debug)]
pub struct SigningOutput {
    headers: Vec<(HeaderName, HeaderValue)>,
    signature: String,
}

impl SigningOutput {
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    /// Insert the signing headers into `request`, replacing any previous values
    pub fn apply_to_request<B>(self, request: &mut http::Request<B>) {
        let headers = request.headers_mut();
        for (name, value) in self.headers {
            headers.insert(name, value);
        }
    }
}

/// Produces a signature for the given `request` and returns the headers that carry it
pub fn sign(
    request: SignableRequest<'_>,
    params: &SigningParams<'_>,
) -> Result<SigningOutput, SigningError> {
    let creq = CanonicalRequest::from(
        &request,
        &params.settings,
        params.date_time,
        params.security_token,
    )?;
    tracing::trace!(canonical_request = %creq);

    let encoded_creq = sha256_hex_string(creq.to_string().as_bytes());
    let sts = StringToSign::new(
        params.date_time,
        params.region,
        params.service_name,
        &encoded_creq,
    );
    tracing::trace!(string_to_sign = %sts);

    let signing_key = generate_signing_key(
        params.secret_key,
        params.date_time,
        params.region,
        params.service_name,
    );
    let signature = calculate_signature(signing_key, sts.to_string().as_bytes());

    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        HMAC_256, params.access_key, sts.scope, creq.signed_headers, signature
    );
    let mut authorization = HeaderValue::from_str(&authorization)?;
    authorization.set_sensitive(true);

    let mut headers = Vec::with_capacity(4);
    headers.push((
        HeaderName::from_static(X_AMZ_DATE),
        HeaderValue::from_str(&creq.date_time)?,
    ));
    if let Some(token) = params.security_token {
        let mut token = HeaderValue::from_str(token)?;
        token.set_sensitive(true);
        headers.push((HeaderName::from_static(X_AMZ_SECURITY_TOKEN), token));
    }
    if params.settings.payload_checksum_kind == PayloadChecksumKind::XAmzSha256 {
        headers.push((
            HeaderName::from_static(X_AMZ_CONTENT_SHA_256),
            HeaderValue::from_str(&creq.content_sha256)?,
        ));
    }
    headers.push((AUTHORIZATION, authorization));
    Ok(SigningOutput { headers, signature })
}

#[cfg(test)]
mod tests {
    use super::{sign, SignableRequest};
    use crate::date_fmt::parse_date_time;
    use crate::http_request::{SigningParams, SigningSettings};
    use pretty_assertions::assert_eq;

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn params<'a>(
        secret_key: &'a str,
        security_token: Option<&'a str>,
        region: &'a str,
        service_name: &'a str,
        time: &str,
    ) -> SigningParams<'a> {
        SigningParams {
            access_key: "AKIDEXAMPLE",
            secret_key,
            security_token,
            region,
            service_name,
            date_time: parse_date_time(time).unwrap(),
            settings: SigningSettings::default(),
        }
    }

    #[test]
    fn test_sign_vanilla() {
        let mut req = http::Request::builder()
            .uri("https://example.amazonaws.com/")
            .body("")
            .unwrap();
        let params = params(SECRET, None, "us-east-1", "service", "20150830T123600Z");
        let out = sign(SignableRequest::from_http(&req), &params).unwrap();
        assert_eq!(
            "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31",
            out.signature()
        );
        out.apply_to_request(&mut req);
        assert_eq!(
            req.headers()["authorization"],
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
            SignedHeaders=host;x-amz-date, \
            Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
        assert_eq!(req.headers()["x-amz-date"], "20150830T123600Z");
    }

    #[test]
    fn test_sign_iam_example() {
        let req = http::Request::builder()
            .method("GET")
            .uri("https://iam.amazonaws.com/?Action=ListUsers&Version=2010-05-08")
            .header(
                "Content-Type",
                "application/x-www-form-urlencoded; charset=utf-8",
            )
            .body("")
            .unwrap();
        let params = params(SECRET, None, "us-east-1", "iam", "20150830T123600Z");
        let out = sign(SignableRequest::from_http(&req), &params).unwrap();
        assert_eq!(
            "5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7",
            out.signature()
        );
    }

    #[test]
    fn test_sign_query_order() {
        let req = http::Request::builder()
            .uri("https://example.amazonaws.com/?Param2=value2&Param1=value1")
            .body("")
            .unwrap();
        let params = params(SECRET, None, "us-east-1", "service", "20150830T123600Z");
        let out = sign(SignableRequest::from_http(&req), &params).unwrap();
        assert_eq!(
            "b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500",
            out.signature()
        );
    }

    fn ec2_request() -> http::Request<&'static str> {
        http::Request::builder()
            .method("POST")
            .uri("https://ec2.us-east-1.amazonaws.com/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("Action=DescribeRegions&Version=2016-11-15")
            .unwrap()
    }

    #[test]
    fn test_sign_ec2_form_body() {
        let req = ec2_request();
        let params = params("secret", None, "us-east-1", "ec2", "20210301T000000Z");
        let out = sign(SignableRequest::from_http(&req), &params).unwrap();
        assert_eq!(
            "0e0a840b897cedd744b5c34f5d85156e47af025c3612f39fada65e6b96543961",
            out.signature()
        );
    }

    #[test]
    fn test_sign_with_session_token() {
        let mut req = ec2_request();
        let params = params("secret", Some("token"), "us-east-1", "ec2", "20210301T000000Z");
        let out = sign(SignableRequest::from_http(&req), &params).unwrap();
        assert_eq!(
            "bbd6411e64a01410474bdfb6ebc50105a84c6cc6e939ccf4b6057fe58db29df5",
            out.signature()
        );
        out.apply_to_request(&mut req);
        assert_eq!(req.headers()["x-amz-security-token"], "token");
        assert!(req.headers()["authorization"].is_sensitive());
    }

    #[test]
    fn resigning_replaces_previous_signature() {
        let mut req = ec2_request();
        let first = params("secret", None, "us-east-1", "ec2", "20210301T000000Z");
        sign(SignableRequest::from_http(&req), &first)
            .unwrap()
            .apply_to_request(&mut req);
        let second = params("secret", None, "us-east-1", "ec2", "20210301T000000Z");
        let out = sign(SignableRequest::from_http(&req), &second).unwrap();
        assert_eq!(
            "0e0a840b897cedd744b5c34f5d85156e47af025c3612f39fada65e6b96543961",
            out.signature()
        );
    }

    #[test]
    fn missing_authority() {
        let req = http::Request::builder().uri("/").body("").unwrap();
        let params = params(SECRET, None, "us-east-1", "ec2", "20210301T000000Z");
        sign(SignableRequest::from_http(&req), &params).expect_err("no host to sign");
    }
}
