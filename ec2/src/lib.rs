/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Amazon Elastic Compute Cloud client
//!
//! Requests use the EC2 Query protocol: a form-encoded `POST` body, signed with SigV4, sent to
//! the regional EC2 endpoint (or a dualstack, FIPS, or custom endpoint), answered with XML.
//! See [`Client`] for the ways a request can be sent.

#[macro_use]
mod manifest;

pub mod client;
pub mod config;
pub mod error;
mod error_meta;
pub mod input;
pub mod model;
pub mod operation;
pub mod output;
mod query_ser;
mod xml_deser;

pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub use aws_auth::Credentials;
pub use aws_hyper::{RetryConfig, SdkError, TimeoutConfig};
pub use aws_types::region::Region;
pub use client::fluent_builders;
pub use client::Client;
pub use config::Config;
pub use error_meta::Error;
