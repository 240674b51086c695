/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Provides functions for calculating Sigv4 signing keys, signatures, and
//! utilities for signing HTTP requests.

pub mod http_request;
pub mod sign;

mod date_fmt;

pub use date_fmt::{format_date, format_date_time, parse_date, parse_date_time};
