/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use http::header::{InvalidHeaderValue, ToStrError};
use thiserror::Error;

/// An error that occurred while signing an HTTP request
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("request URI has no authority so the `host` header cannot be signed")]
    MissingAuthority,
    #[error("a header required for signing could not be constructed: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
    #[error("header `{name}` must be valid visible ASCII to be signed: {source}")]
    UnsignableHeader { name: String, source: ToStrError },
}
