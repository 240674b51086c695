/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Operation errors
//!
//! EC2 does not model its errors. Every operation error carries the generic
//! [`smithy_types::Error`] parsed from the `<Response><Errors>` document, so callers match on
//! [`code()`](DescribeRegionsError::code) rather than on error variants.

use smithy_types::retry::{ErrorKind, ProvideErrorKind};
use std::borrow::Cow;
use std::fmt;

/// An input could not be turned into a request
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("`{field}` was missing. {details}")]
    MissingField {
        field: &'static str,
        details: &'static str,
    },
    #[error("`{field}` was invalid. {details}")]
    InvalidField {
        field: &'static str,
        details: Cow<'static, str>,
    },
    #[error("failed to build the HTTP request: {0}")]
    SerializationError(#[from] http::Error),
}

impl BuildError {
    pub(crate) fn missing_field(field: &'static str, details: &'static str) -> Self {
        BuildError::MissingField { field, details }
    }
}

macro_rules! operation_errors {
    ($($op:ident {
        client_method: $method:ident,
        http_method: $http:ident,
        input: $input:ident,
        input_builder: $builder:ident,
        output: $output:ident,
        error: $error:ident,
        error_kind: $error_kind:ident,
        serializer: $ser:path,
        parser: $parser:path,
        docs: $doc:literal,
        setters: { $(fn $setter:ident($arg:ident: $argty:ty);)* },
    },)*) => {
        $(
            #[doc = concat!("Error type for the `", stringify!($op), "` operation.")]
            #[non_exhaustive]
            #[derive(std::fmt::Debug)]
            pub struct $error {
                pub kind: $error_kind,
                pub(crate) meta: smithy_types::Error,
            }

            #[doc = concat!("Types of errors that can occur for the `", stringify!($op), "` operation.")]
            #[non_exhaustive]
            #[derive(std::fmt::Debug)]
            pub enum $error_kind {
                /// An unexpected error, eg. invalid XML returned by the service or an unknown error code
                Unhandled(Box<dyn std::error::Error + Send + Sync + 'static>),
            }

            impl fmt::Display for $error {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    match &self.kind {
                        $error_kind::Unhandled(inner) => fmt::Display::fmt(inner, f),
                    }
                }
            }

            impl ProvideErrorKind for $error {
                fn retryable_error_kind(&self) -> Option<ErrorKind> {
                    None
                }

                fn code(&self) -> Option<&str> {
                    $error::code(self)
                }
            }

            impl $error {
                pub fn new(kind: $error_kind, meta: smithy_types::Error) -> Self {
                    Self { kind, meta }
                }

                pub fn unhandled(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
                    Self {
                        kind: $error_kind::Unhandled(err.into()),
                        meta: Default::default(),
                    }
                }

                /// Build an error from the generic error the service returned
                pub fn generic(err: smithy_types::Error) -> Self {
                    Self {
                        meta: err.clone(),
                        kind: $error_kind::Unhandled(err.into()),
                    }
                }

                pub fn meta(&self) -> &smithy_types::Error {
                    &self.meta
                }

                pub fn code(&self) -> Option<&str> {
                    self.meta.code()
                }

                pub fn message(&self) -> Option<&str> {
                    self.meta.message()
                }

                pub fn request_id(&self) -> Option<&str> {
                    self.meta.request_id()
                }
            }

            impl std::error::Error for $error {
                fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                    match &self.kind {
                        $error_kind::Unhandled(inner) => Some(inner.as_ref()),
                    }
                }
            }
        )*
    };
}

ec2_manifest!(operation_errors);

#[cfg(test)]
mod test {
    use crate::error::{BuildError, CreateTagsError, CreateTagsErrorKind};
    use std::error::Error;

    #[test]
    fn generic_errors_keep_their_metadata() {
        let err = CreateTagsError::generic(smithy_types::Error {
            code: Some("InvalidID".to_string()),
            message: Some("The ID 'foo' is not valid".to_string()),
            request_id: Some("a1b2".to_string()),
        });
        assert_eq!(err.code(), Some("InvalidID"));
        assert_eq!(err.message(), Some("The ID 'foo' is not valid"));
        assert_eq!(err.request_id(), Some("a1b2"));
        assert!(matches!(err.kind, CreateTagsErrorKind::Unhandled(_)));
        assert!(err.source().is_some());
        assert_eq!(
            format!("{}", err),
            "Error { code: \"InvalidID\", message: \"The ID 'foo' is not valid\", request_id: \"a1b2\" }"
        );
    }

    #[test]
    fn unhandled_errors_have_no_code() {
        let err = CreateTagsError::unhandled("connection reset");
        assert_eq!(err.code(), None);
        assert_eq!(format!("{}", err), "connection reset");
    }

    #[test]
    fn build_error_messages() {
        let err = BuildError::missing_field("instance_ids", "at least one instance id is required");
        assert_eq!(
            format!("{}", err),
            "`instance_ids` was missing. at least one instance id is required"
        );
    }
}
