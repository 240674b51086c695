/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use super::error::SigningError;
use super::settings::{PayloadChecksumKind, SigningSettings, UriEncoding};
use super::sign::{SignableBody, SignableRequest};
use super::url_escape::percent_encode;
use crate::date_fmt::{format_date, format_date_time};
use crate::sign::sha256_hex_string;
use http::header::{HeaderName, AUTHORIZATION, HOST, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method, Uri};
use std::borrow::Cow;
use std::fmt;
use std::time::SystemTime;

pub(crate) const HMAC_256: &str = "AWS4-HMAC-SHA256";
pub(crate) const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
pub(crate) const X_AMZ_DATE: &str = "x-amz-date";
pub(crate) const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";

const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

#[derive(Debug, PartialEq)]
pub(crate) struct CanonicalRequest<'a> {
    pub(crate) method: &'a Method,
    pub(crate) path: String,
    pub(crate) params: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) signed_headers: SignedHeaders,
    pub(crate) date_time: String,
    pub(crate) content_sha256: Cow<'a, str>,
}

impl<'a> CanonicalRequest<'a> {
    /// Construct a CanonicalRequest from a signable request
    ///
    /// The canonical headers include headers that are not present on the input:
    /// - `host`, taken from the URI authority when the request has no `host` header
    /// - `x-amz-date`
    /// - `x-amz-security-token` when the credentials carry a session token
    /// - `x-amz-content-sha256` when `settings.payload_checksum_kind` asks for it
    ///
    /// With `UriEncoding::Double`, `%` in the path is re-encoded as `%25`.
    pub(crate) fn from(
        req: &'a SignableRequest<'a>,
        settings: &SigningSettings,
        time: SystemTime,
        security_token: Option<&str>,
    ) -> Result<CanonicalRequest<'a>, SigningError> {
        let path = match req.uri().path() {
            "" => "/",
            path => path,
        };
        let path = match settings.uri_encoding {
            UriEncoding::Double => path.replace('%', "%25"),
            UriEncoding::Single => path.to_string(),
        };
        let payload_hash = Self::payload_hash(req.body());
        let date_time = format_date_time(time);
        let headers = Self::headers(req, settings, &payload_hash, &date_time, security_token)?;
        let signed_headers = SignedHeaders::new(&headers);
        Ok(CanonicalRequest {
            method: req.method(),
            path,
            params: Self::params(req.uri()),
            headers,
            signed_headers,
            date_time,
            content_sha256: payload_hash,
        })
    }

    fn headers(
        req: &SignableRequest<'_>,
        settings: &SigningSettings,
        payload_hash: &str,
        date_time: &str,
        security_token: Option<&str>,
    ) -> Result<HeaderMap, SigningError> {
        let mut canonical_headers = HeaderMap::with_capacity(req.headers().len() + 3);
        for (name, value) in req.headers() {
            // The user agent may be altered by proxies and a stale signature must never be signed
            if name == USER_AGENT || name == AUTHORIZATION {
                continue;
            }
            canonical_headers.append(name.clone(), value.clone());
        }
        if !canonical_headers.contains_key(HOST) {
            let authority = req
                .uri()
                .authority()
                .ok_or(SigningError::MissingAuthority)?;
            canonical_headers.insert(HOST, HeaderValue::from_str(authority.as_str())?);
        }
        canonical_headers.insert(
            HeaderName::from_static(X_AMZ_DATE),
            HeaderValue::from_str(date_time)?,
        );
        canonical_headers.remove(X_AMZ_SECURITY_TOKEN);
        if let Some(security_token) = security_token {
            let mut sec_header = HeaderValue::from_str(security_token)?;
            sec_header.set_sensitive(true);
            canonical_headers.insert(HeaderName::from_static(X_AMZ_SECURITY_TOKEN), sec_header);
        }
        if settings.payload_checksum_kind == PayloadChecksumKind::XAmzSha256 {
            canonical_headers.insert(
                HeaderName::from_static(X_AMZ_CONTENT_SHA_256),
                HeaderValue::from_str(payload_hash)?,
            );
        }
        // every value must be printable before it can be written into the canonical request
        for (name, value) in &canonical_headers {
            value
                .to_str()
                .map_err(|source| SigningError::UnsignableHeader {
                    name: name.to_string(),
                    source,
                })?;
        }
        Ok(canonical_headers)
    }

    fn payload_hash<'b>(body: &'b SignableBody<'b>) -> Cow<'b, str> {
        match body {
            SignableBody::Bytes(data) => Cow::Owned(sha256_hex_string(data)),
            SignableBody::Precomputed(digest) => Cow::Borrowed(digest.as_str()),
            SignableBody::UnsignedPayload => Cow::Borrowed(UNSIGNED_PAYLOAD),
        }
    }

    fn params(uri: &Uri) -> Option<String> {
        let query = uri.query()?;
        let mut params: Vec<(Cow<'_, str>, Cow<'_, str>)> =
            form_urlencoded::parse(query.as_bytes()).collect();
        // Sort by param name, and then by param value
        params.sort();
        let encoded: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
            .collect();
        Some(encoded.join("&"))
    }
}

impl fmt::Display for CanonicalRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.params.as_deref().unwrap_or(""))?;
        for name in &self.signed_headers.inner {
            let values: Vec<&str> = self
                .headers
                .get_all(name)
                .iter()
                .map(|value| value.to_str().unwrap_or_default().trim())
                .collect();
            writeln!(f, "{}:{}", name.as_str(), values.join(","))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.content_sha256)
    }
}

#[derive(Debug, PartialEq, Default)]
pub(crate) struct SignedHeaders {
    inner: Vec<HeaderName>,
}

impl SignedHeaders {
    fn new(headers: &HeaderMap) -> Self {
        let mut inner: Vec<HeaderName> = headers.keys().cloned().collect();
        inner.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        SignedHeaders { inner }
    }
}

impl fmt::Display for SignedHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.inner.iter().map(|name| name.as_str()).collect();
        write!(f, "{}", names.join(";"))
    }
}

#[derive(PartialEq, Debug, Clone)]
pub(crate) struct Scope<'a> {
    pub(crate) time: SystemTime,
    pub(crate) region: &'a str,
    pub(crate) service: &'a str,
}

impl fmt::Display for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/aws4_request",
            format_date(self.time),
            self.region,
            self.service
        )
    }
}

#[derive(PartialEq, Debug)]
pub(crate) struct StringToSign<'a> {
    pub(crate) scope: Scope<'a>,
    pub(crate) time: SystemTime,
    pub(crate) hashed_creq: &'a str,
}

impl<'a> StringToSign<'a> {
    pub(crate) fn new(
        time: SystemTime,
        region: &'a str,
        service: &'a str,
        hashed_creq: &'a str,
    ) -> Self {
        StringToSign {
            scope: Scope {
                time,
                region,
                service,
            },
            time,
            hashed_creq,
        }
    }
}

impl fmt::Display for StringToSign<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}",
            HMAC_256,
            format_date_time(self.time),
            self.scope,
            self.hashed_creq
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{CanonicalRequest, Scope, StringToSign};
    use crate::date_fmt::parse_date_time;
    use crate::http_request::{
        PayloadChecksumKind, SignableBody, SignableRequest, SigningSettings,
    };
    use crate::sign::sha256_hex_string;
    use pretty_assertions::assert_eq;

    fn iam_request() -> http::Request<&'static str> {
        http::Request::builder()
            .method("GET")
            .uri("https://iam.amazonaws.com/?Action=ListUsers&Version=2010-05-08")
            .header(
                "Content-Type",
                "application/x-www-form-urlencoded; charset=utf-8",
            )
            .body("")
            .unwrap()
    }

    const IAM_CREQ: &str = "GET\n\
        /\n\
        Action=ListUsers&Version=2010-05-08\n\
        content-type:application/x-www-form-urlencoded; charset=utf-8\n\
        host:iam.amazonaws.com\n\
        x-amz-date:20150830T123600Z\n\
        \n\
        content-type;host;x-amz-date\n\
        e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn canonical_request_matches_iam_example() {
        let req = iam_request();
        let req = SignableRequest::from_http(&req);
        let date = parse_date_time("20150830T123600Z").unwrap();
        let creq = CanonicalRequest::from(&req, &SigningSettings::default(), date, None).unwrap();
        assert_eq!(creq.to_string(), IAM_CREQ);
        assert_eq!(
            sha256_hex_string(creq.to_string()),
            "f536975d06c0309214f805bb90ccff089219ecd68b2577efef23edd43b7e1a59"
        );
    }

    #[test]
    fn test_set_xamz_sha_256() {
        let req = iam_request();
        let req = SignableRequest::from_http(&req);
        let date = parse_date_time("20150830T123600Z").unwrap();
        let mut signing_settings = SigningSettings::default();
        signing_settings.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
        let creq = CanonicalRequest::from(&req, &signing_settings, date, None).unwrap();
        assert_eq!(
            &creq.content_sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            creq.signed_headers.to_string(),
            "content-type;host;x-amz-content-sha256;x-amz-date"
        );

        signing_settings.payload_checksum_kind = PayloadChecksumKind::NoHeader;
        let creq = CanonicalRequest::from(&req, &signing_settings, date, None).unwrap();
        assert_eq!(creq.signed_headers.to_string(), "content-type;host;x-amz-date");
    }

    #[test]
    fn test_unsigned_and_precomputed_payload() {
        let req = iam_request();
        let date = parse_date_time("20150830T123600Z").unwrap();
        let signable = SignableRequest::new(
            req.method(),
            req.uri(),
            req.headers(),
            SignableBody::UnsignedPayload,
        );
        let creq =
            CanonicalRequest::from(&signable, &SigningSettings::default(), date, None).unwrap();
        assert!(creq.to_string().ends_with("UNSIGNED-PAYLOAD"));

        let payload_hash = "44ce7dd67c959e0d3524ffac1771dfbba87d2b6b4b4e99e42034a8b803f8b072";
        let signable = SignableRequest::new(
            req.method(),
            req.uri(),
            req.headers(),
            SignableBody::Precomputed(payload_hash.to_string()),
        );
        let creq =
            CanonicalRequest::from(&signable, &SigningSettings::default(), date, None).unwrap();
        assert!(creq.to_string().ends_with(payload_hash));
    }

    #[test]
    fn security_token_is_signed() {
        let req = iam_request();
        let req = SignableRequest::from_http(&req);
        let date = parse_date_time("20150830T123600Z").unwrap();
        let creq =
            CanonicalRequest::from(&req, &SigningSettings::default(), date, Some("token")).unwrap();
        assert_eq!(
            creq.signed_headers.to_string(),
            "content-type;host;x-amz-date;x-amz-security-token"
        );
        assert!(creq.to_string().contains("x-amz-security-token:token\n"));
    }

    #[test]
    fn stale_signature_and_user_agent_are_not_signed() {
        let req = http::Request::builder()
            .uri("https://ec2.us-east-1.amazonaws.com/")
            .header("authorization", "AWS4-HMAC-SHA256 stale")
            .header("user-agent", "aws-sdk-rust")
            .body("")
            .unwrap();
        let req = SignableRequest::from_http(&req);
        let date = parse_date_time("20150830T123600Z").unwrap();
        let creq = CanonicalRequest::from(&req, &SigningSettings::default(), date, None).unwrap();
        assert_eq!(creq.signed_headers.to_string(), "host;x-amz-date");
    }

    #[test]
    fn test_generate_scope() {
        let date = parse_date_time("20150830T123600Z").unwrap();
        let scope = Scope {
            time: date,
            region: "us-east-1",
            service: "iam",
        };
        assert_eq!(scope.to_string(), "20150830/us-east-1/iam/aws4_request");
    }

    #[test]
    fn test_string_to_sign() {
        let date = parse_date_time("20150830T123600Z").unwrap();
        let encoded = sha256_hex_string(IAM_CREQ.as_bytes());
        let actual = StringToSign::new(date, "us-east-1", "iam", &encoded);
        assert_eq!(
            actual.to_string(),
            "AWS4-HMAC-SHA256\n\
            20150830T123600Z\n\
            20150830/us-east-1/iam/aws4_request\n\
            f536975d06c0309214f805bb90ccff089219ecd68b2577efef23edd43b7e1a59"
        );
    }

    #[test]
    fn query_params_are_sorted() {
        let req = http::Request::builder()
            .uri("https://example.amazonaws.com/?Param2=value2&Param1=value1")
            .body("")
            .unwrap();
        let req = SignableRequest::from_http(&req);
        let date = parse_date_time("20150830T123600Z").unwrap();
        let creq = CanonicalRequest::from(&req, &SigningSettings::default(), date, None).unwrap();
        assert_eq!(creq.params.as_deref(), Some("Param1=value1&Param2=value2"));
        assert_eq!(
            sha256_hex_string(creq.to_string()),
            "816cd5b414d056048ba4f7c5386d6e0533120fb1fcfa93762cf0fc39e2cf19e0"
        );
    }

    #[test]
    fn test_tilde_in_uri() {
        let req = http::Request::builder()
            .uri("https://s3.us-east-1.amazonaws.com/my-bucket?list-type=2&prefix=~objprefix&single&k=&unreserved=-_.~").body("").unwrap();
        let req = SignableRequest::from_http(&req);
        let date = parse_date_time("20210511T154045Z").unwrap();
        let creq = CanonicalRequest::from(&req, &SigningSettings::default(), date, None).unwrap();
        assert_eq!(
            Some("k=&list-type=2&prefix=~objprefix&single=&unreserved=-_.~"),
            creq.params.as_deref(),
        );
    }

    #[test]
    fn test_double_url_encode() {
        let req = http::Request::builder()
            .uri("https://example.amazonaws.com/my%20path")
            .body("")
            .unwrap();
        let req = SignableRequest::from_http(&req);
        let date = parse_date_time("20210511T154045Z").unwrap();
        let creq = CanonicalRequest::from(&req, &SigningSettings::default(), date, None).unwrap();
        assert_eq!(creq.path, "/my%2520path");
    }
}
