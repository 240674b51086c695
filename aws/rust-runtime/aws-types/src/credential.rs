/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Credentials used to sign requests
//!
//! A client holds a [`SharedCredentialsProvider`]. It is asked for credentials once per call,
//! before the first attempt is signed. Static keys implement [`ProvideCredentials`] directly:
//!
//! ```rust
//! use aws_types::credential::SharedCredentialsProvider;
//! use aws_types::Credentials;
//!
//! let provider = SharedCredentialsProvider::new(Credentials::from_keys("AKID", "secret", None));
//! # let _ = provider;
//! ```
//!
//! A provider that loads keys at runtime returns a
//! [`future::ProvideCredentials`](provide_credentials::future::ProvideCredentials) wrapping its
//! own `async fn`:
//!
//! ```rust
//! use aws_types::credential::provide_credentials::{self, future};
//! use aws_types::credential::{Credentials, CredentialsError};
//!
//! #[derive(Debug)]
//! struct InstanceKeys {
//!     line: String,
//! }
//!
//! impl InstanceKeys {
//!     async fn load(&self) -> provide_credentials::Result {
//!         let (akid, secret) = self
//!             .line
//!             .split_once(':')
//!             .ok_or_else(|| CredentialsError::ProviderError("expected `akid:secret`".into()))?;
//!         Ok(Credentials::new(akid, secret, None, None, "InstanceKeys"))
//!     }
//! }
//!
//! impl provide_credentials::ProvideCredentials for InstanceKeys {
//!     fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
//!     where
//!         Self: 'a,
//!     {
//!         future::ProvideCredentials::new(self.load())
//!     }
//! }
//! ```

pub mod credentials;
pub mod provide_credentials;

pub use credentials::Credentials;
pub use provide_credentials::CredentialsError;
pub use provide_credentials::ProvideCredentials;
pub use provide_credentials::Result;
pub use provide_credentials::SharedCredentialsProvider;
