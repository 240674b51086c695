/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Credentials providers and the glue that places them into an operation's property bag

pub mod provider;

pub use aws_types::credential::{
    Credentials, CredentialsError, ProvideCredentials, SharedCredentialsProvider,
};

use smithy_http::property_bag::PropertyBag;

/// Store the credentials provider an operation will use to sign its request
pub fn set_provider(bag: &mut PropertyBag, provider: SharedCredentialsProvider) {
    bag.insert(provider);
}

/// Retrieve the credentials provider previously stored with [`set_provider`]
pub fn get_provider(bag: &PropertyBag) -> Option<&SharedCredentialsProvider> {
    bag.get()
}
