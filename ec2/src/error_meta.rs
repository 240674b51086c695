/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use aws_hyper::SdkError;
use std::fmt;

/// Error type for any EC2 operation
///
/// Every operation error converts into this type, which is convenient when a function sends
/// more than one kind of request.
#[non_exhaustive]
#[derive(std::fmt::Debug)]
pub enum Error {
    /// An error returned by the service, or an error sending the request
    Unhandled(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unhandled(inner) => fmt::Display::fmt(inner, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Unhandled(inner) => inner.source(),
        }
    }
}

macro_rules! error_meta_conversions {
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
            impl<R> From<SdkError<crate::error::$error, R>> for Error
            where
                R: Send + Sync + std::fmt::Debug + 'static,
            {
                fn from(err: SdkError<crate::error::$error, R>) -> Self {
                    match err {
                        SdkError::ServiceError { err, .. } => Error::Unhandled(err.into()),
                        other => Error::Unhandled(other.into()),
                    }
                }
            }
        )*
    };
}

ec2_manifest!(error_meta_conversions);

#[cfg(test)]
mod test {
    use crate::error::DescribeRegionsError;
    use crate::Error;
    use aws_hyper::SdkError;

    #[test]
    fn service_errors_keep_their_message() {
        let err: Error = SdkError::ServiceError {
            raw: http::Response::new("raw response"),
            err: DescribeRegionsError::generic(smithy_types::Error {
                code: Some("AuthFailure".to_string()),
                message: None,
                request_id: None,
            }),
        }
        .into();
        assert_eq!(format!("{}", err), "Error { code: \"AuthFailure\" }");
    }

    #[test]
    fn pre_dispatch_failures_convert() {
        let err: Error =
            SdkError::<DescribeRegionsError>::EndpointResolutionFailure("no region".into()).into();
        assert_eq!(
            format!("{}", err),
            "failed to resolve endpoint: no region"
        );
    }
}
