/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Assertions for checking serialized requests in tests
//!
//! EC2 Query requests carry their parameters in a form-urlencoded body, so most checks here
//! operate on `key=value` pairs regardless of their order.

use http::Request;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ProtocolTestFailure {
    #[error("missing form param: expected `{expected}`, found {found:?}")]
    MissingFormParam {
        expected: String,
        found: Vec<String>,
    },
    #[error("forbidden form param present: `{expected}`")]
    ForbiddenFormParam { expected: String },
    #[error("body did not match. expected:\n{expected}\nfound:\n{found}")]
    BodyDidNotMatch { expected: String, found: String },

    #[error("invalid header value for key `{key}`: expected `{expected}`, found `{found}`")]
    InvalidHeader {
        key: String,
        expected: String,
        found: String,
    },
    #[error("missing required header: `{expected}`")]
    MissingHeader { expected: String },
    #[error("header `{forbidden}` was present but should not be")]
    ForbiddenHeader { forbidden: String },
    #[error("request body was not valid utf-8")]
    InvalidBody,
}

/// Check that the protocol test succeeded & print the pretty error
/// if it did not
///
/// The primary motivation is making multiline debug output
/// readable & using the cleaner Display implementation
#[track_caller]
pub fn assert_ok(inp: Result<(), ProtocolTestFailure>) {
    if let Err(e) = inp {
        panic!("Protocol test failed: {}", e);
    }
}

#[derive(Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
struct FormParam<'a> {
    key: &'a str,
    value: &'a str,
}

impl<'a> FormParam<'a> {
    fn parse(s: &'a str) -> Self {
        let mut parsed = s.splitn(2, '=');
        FormParam {
            key: parsed.next().unwrap_or_default(),
            value: parsed.next().unwrap_or_default(),
        }
    }
}

fn extract_params(body: &str) -> Vec<FormParam<'_>> {
    body.split('&')
        .filter(|p| !p.is_empty())
        .map(FormParam::parse)
        .collect()
}

fn body_str<B: AsRef<[u8]>>(request: &Request<B>) -> Result<&str, ProtocolTestFailure> {
    std::str::from_utf8(request.body().as_ref()).map_err(|_| ProtocolTestFailure::InvalidBody)
}

/// Validate that every `key=value` pair in `expected_params` is present in the form body
pub fn validate_form_params<B: AsRef<[u8]>>(
    request: &Request<B>,
    expected_params: &[&str],
) -> Result<(), ProtocolTestFailure> {
    let body = body_str(request)?;
    let actual: HashSet<&str> = body.split('&').collect();
    for param in expected_params {
        if !actual.contains(param) {
            return Err(ProtocolTestFailure::MissingFormParam {
                expected: param.to_string(),
                found: actual.iter().map(|s| s.to_string()).collect(),
            });
        }
    }
    Ok(())
}

/// Validate that none of `forbid_keys` are present as keys in the form body
pub fn forbid_form_params<B: AsRef<[u8]>>(
    request: &Request<B>,
    forbid_keys: &[&str],
) -> Result<(), ProtocolTestFailure> {
    let body = body_str(request)?;
    let actual_keys: HashSet<&str> = extract_params(body).iter().map(|p| p.key).collect();
    for key in forbid_keys {
        if actual_keys.contains(*key) {
            return Err(ProtocolTestFailure::ForbiddenFormParam {
                expected: key.to_string(),
            });
        }
    }
    Ok(())
}

/// Compare two form-urlencoded bodies, ignoring the order of their parameters
pub fn validate_form_body<B: AsRef<[u8]>>(
    request: &Request<B>,
    expected_body: &str,
) -> Result<(), ProtocolTestFailure> {
    let body = body_str(request)?;
    let mut actual = extract_params(body);
    let mut expected = extract_params(expected_body);
    actual.sort();
    expected.sort();
    if actual != expected {
        return Err(ProtocolTestFailure::BodyDidNotMatch {
            expected: pretty_params(&expected),
            found: pretty_params(&actual),
        });
    }
    Ok(())
}

fn pretty_params(params: &[FormParam<'_>]) -> String {
    params
        .iter()
        .map(|p| format!("{}={}", p.key, p.value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn validate_headers<B>(
    request: &Request<B>,
    expected_headers: &[(&str, &str)],
) -> Result<(), ProtocolTestFailure> {
    for (key, expected_value) in expected_headers {
        // Protocol tests store header lists as comma-delimited
        if !request.headers().contains_key(*key) {
            return Err(ProtocolTestFailure::MissingHeader {
                expected: key.to_string(),
            });
        }
        let actual_value: String = request
            .headers()
            .get_all(*key)
            .iter()
            .map(|hv| hv.to_str().unwrap_or("<non-ascii header value>"))
            .collect::<Vec<_>>()
            .join(", ");
        if *expected_value != actual_value {
            return Err(ProtocolTestFailure::InvalidHeader {
                key: key.to_string(),
                expected: expected_value.to_string(),
                found: actual_value,
            });
        }
    }
    Ok(())
}

pub fn require_headers<B>(
    request: &Request<B>,
    required_headers: &[&str],
) -> Result<(), ProtocolTestFailure> {
    for key in required_headers {
        if !request.headers().contains_key(*key) {
            return Err(ProtocolTestFailure::MissingHeader {
                expected: key.to_string(),
            });
        }
    }
    Ok(())
}

pub fn forbid_headers<B>(
    request: &Request<B>,
    forbidden_headers: &[&str],
) -> Result<(), ProtocolTestFailure> {
    for key in forbidden_headers {
        if request.headers().contains_key(*key) {
            return Err(ProtocolTestFailure::ForbiddenHeader {
                forbidden: key.to_string(),
            });
        }
    }
    Ok(())
}

/// Pretty-printing equality assertion for serialized bodies
#[track_caller]
pub fn assert_body_eq(expected: &str, actual: &[u8]) {
    pretty_assertions::assert_eq!(expected, String::from_utf8_lossy(actual));
}
