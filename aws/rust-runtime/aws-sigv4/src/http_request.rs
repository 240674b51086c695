/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Utilities to sign HTTP requests.
//!
//! # Example: Signing an HTTP request
//!
//! ```rust
//! # fn test() -> Result<(), aws_sigv4::http_request::SigningError> {
//! use aws_sigv4::http_request::{sign, SignableRequest, SigningParams, SigningSettings};
//! use http;
//! use std::time::SystemTime;
//!
//! let mut request = http::Request::builder()
//!     .method("POST")
//!     .uri("https://ec2.us-east-1.amazonaws.com/")
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .body("Action=DescribeRegions&Version=2016-11-15")
//!     .unwrap();
//! let params = SigningParams {
//!     access_key: "AKIDEXAMPLE",
//!     secret_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
//!     security_token: None,
//!     region: "us-east-1",
//!     service_name: "ec2",
//!     date_time: SystemTime::now(),
//!     settings: SigningSettings::default(),
//! };
//! let signable = SignableRequest::from_http(&request);
//! let output = sign(signable, &params)?;
//! output.apply_to_request(&mut request);
//! assert!(request.headers().contains_key("authorization"));
//! # Ok(())
//! # }
//! ```

mod canonical_request;
mod error;
mod settings;
mod sign;
mod url_escape;

pub use error::SigningError;
pub use settings::{PayloadChecksumKind, SigningParams, SigningSettings, UriEncoding};
pub use sign::{sign, SignableBody, SignableRequest, SigningOutput};
