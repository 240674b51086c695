/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! AWS-specific HTTP behavior: error classification for retries and the user agent stage.

pub mod user_agent;

use smithy_http::result::{SdkError, SdkSuccess};
use smithy_http::retry::ClassifyResponse;
use smithy_types::retry::{ErrorKind, ProvideErrorKind, RetryKind};
use std::time::Duration;

/// A retry policy that models AWS error codes as outlined in the SEP
///
/// In order of priority:
/// 1. Transport failures: IO errors & timeouts are transient
/// 2. The `x-amz-retry-after` header is checked
/// 3. The modeled error retry mode is checked
/// 4. The code is checked against a predetermined list of throttling errors & transient error codes
/// 5. The status code is checked against a predetermined list of status codes
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct AwsErrorRetryPolicy;

const TRANSIENT_ERROR_STATUS_CODES: &[u16] = &[500, 502, 503, 504];
const THROTTLING_ERRORS: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestThrottledException",
    "TooManyRequestsException",
    "ProvisionedThroughputExceededException",
    "TransactionInProgressException",
    "RequestLimitExceeded",
    "BandwidthLimitExceeded",
    "LimitExceededException",
    "RequestThrottled",
    "SlowDown",
    "PriorRequestNotComplete",
    "EC2ThrottledException",
];
const TRANSIENT_ERRORS: &[&str] = &["RequestTimeout", "RequestTimeoutException"];

impl AwsErrorRetryPolicy {
    /// Create an `AwsErrorRetryPolicy` with the default set of known error & status codes
    pub fn new() -> Self {
        AwsErrorRetryPolicy
    }
}

impl Default for AwsErrorRetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E, B> ClassifyResponse<SdkSuccess<T, http::Response<B>>, SdkError<E, http::Response<B>>>
    for AwsErrorRetryPolicy
where
    E: ProvideErrorKind,
{
    fn classify(
        &self,
        result: Result<&SdkSuccess<T, http::Response<B>>, &SdkError<E, http::Response<B>>>,
    ) -> RetryKind {
        let (err, response) = match result {
            Ok(_) => return RetryKind::NotRetryable,
            Err(SdkError::ServiceError { err, raw }) => (err, raw),
            Err(SdkError::DispatchFailure(err)) => {
                return if err.is_timeout() || err.is_io() {
                    RetryKind::Error(ErrorKind::TransientError)
                } else if let Some(ek) = err.is_other() {
                    RetryKind::Error(ek)
                } else {
                    RetryKind::NotRetryable
                };
            }
            Err(_) => return RetryKind::NotRetryable,
        };
        if let Some(retry_after_delay) = response
            .headers()
            .get("x-amz-retry-after")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.parse::<u64>().ok())
        {
            return RetryKind::Explicit(Duration::from_millis(retry_after_delay));
        }
        if let Some(kind) = err.retryable_error_kind() {
            return RetryKind::Error(kind);
        };
        if let Some(code) = err.code() {
            if THROTTLING_ERRORS.contains(&code) {
                return RetryKind::Error(ErrorKind::ThrottlingError);
            }
            if TRANSIENT_ERRORS.contains(&code) {
                return RetryKind::Error(ErrorKind::TransientError);
            }
        };
        if TRANSIENT_ERROR_STATUS_CODES.contains(&response.status().as_u16()) {
            return RetryKind::Error(ErrorKind::TransientError);
        };
        RetryKind::NotRetryable
    }
}

#[cfg(test)]
mod test {
    use crate::AwsErrorRetryPolicy;
    use smithy_http::result::{ConnectorError, SdkError, SdkSuccess};
    use smithy_http::retry::ClassifyResponse;
    use smithy_types::retry::{ErrorKind, ProvideErrorKind, RetryKind};
    use std::time::Duration;

    struct UnmodeledError;

    struct CodedError {
        code: &'static str,
    }

    impl ProvideErrorKind for UnmodeledError {
        fn retryable_error_kind(&self) -> Option<ErrorKind> {
            None
        }

        fn code(&self) -> Option<&str> {
            None
        }
    }

    impl ProvideErrorKind for CodedError {
        fn retryable_error_kind(&self) -> Option<ErrorKind> {
            None
        }

        fn code(&self) -> Option<&str> {
            Some(self.code)
        }
    }

    type Response = http::Response<&'static str>;

    fn classify<E: ProvideErrorKind>(err: SdkError<E, Response>) -> RetryKind {
        let result: Result<&SdkSuccess<(), Response>, _> = Err(&err);
        AwsErrorRetryPolicy::new().classify(result)
    }

    fn service_error<E>(err: E, raw: Response) -> SdkError<E, Response> {
        SdkError::ServiceError { err, raw }
    }

    #[test]
    fn not_an_error() {
        let success = SdkSuccess {
            raw: http::Response::new("OK"),
            parsed: (),
        };
        let result: Result<_, &SdkError<UnmodeledError, Response>> = Ok(&success);
        assert_eq!(
            AwsErrorRetryPolicy::new().classify(result),
            RetryKind::NotRetryable
        );
    }

    #[test]
    fn classify_by_response_status() {
        for status in &[500, 502, 503, 504] {
            let test_resp = http::Response::builder()
                .status(*status)
                .body("error!")
                .unwrap();
            assert_eq!(
                classify(service_error(UnmodeledError, test_resp)),
                RetryKind::Error(ErrorKind::TransientError)
            );
        }
        let test_resp = http::Response::builder()
            .status(400)
            .body("error!")
            .unwrap();
        assert_eq!(
            classify(service_error(UnmodeledError, test_resp)),
            RetryKind::NotRetryable
        );
    }

    #[test]
    fn classify_by_error_code() {
        assert_eq!(
            classify(service_error(
                CodedError { code: "Throttling" },
                http::Response::new("OK")
            )),
            RetryKind::Error(ErrorKind::ThrottlingError)
        );
        assert_eq!(
            classify(service_error(
                CodedError {
                    code: "RequestLimitExceeded"
                },
                http::Response::new("OK")
            )),
            RetryKind::Error(ErrorKind::ThrottlingError)
        );
        assert_eq!(
            classify(service_error(
                CodedError {
                    code: "RequestTimeout"
                },
                http::Response::new("OK")
            )),
            RetryKind::Error(ErrorKind::TransientError)
        );
        assert_eq!(
            classify(service_error(
                CodedError {
                    code: "InvalidInstanceID.NotFound"
                },
                http::Response::new("OK")
            )),
            RetryKind::NotRetryable
        );
    }

    #[test]
    fn classify_generic() {
        let err = smithy_types::Error {
            code: Some("SlowDown".to_string()),
            message: None,
            request_id: None,
        };
        assert_eq!(
            classify(service_error(err, http::Response::new("OK"))),
            RetryKind::Error(ErrorKind::ThrottlingError)
        );
    }

    #[test]
    fn classify_by_error_kind() {
        struct ModeledRetries;
        impl ProvideErrorKind for ModeledRetries {
            fn retryable_error_kind(&self) -> Option<ErrorKind> {
                Some(ErrorKind::ClientError)
            }

            fn code(&self) -> Option<&str> {
                // code should not be called when `error_kind` is provided
                unimplemented!()
            }
        }

        assert_eq!(
            classify(service_error(ModeledRetries, http::Response::new("OK"))),
            RetryKind::Error(ErrorKind::ClientError)
        );
    }

    #[test]
    fn test_retry_after_header() {
        let test_response = http::Response::builder()
            .header("x-amz-retry-after", "5000")
            .body("retry later")
            .unwrap();
        assert_eq!(
            classify(service_error(UnmodeledError, test_response)),
            RetryKind::Explicit(Duration::from_millis(5000))
        );
    }

    #[test]
    fn classify_dispatch_failures() {
        assert_eq!(
            classify::<UnmodeledError>(SdkError::DispatchFailure(ConnectorError::io(
                "socket closed".into()
            ))),
            RetryKind::Error(ErrorKind::TransientError)
        );
        assert_eq!(
            classify::<UnmodeledError>(SdkError::DispatchFailure(ConnectorError::timeout(
                "timed out".into()
            ))),
            RetryKind::Error(ErrorKind::TransientError)
        );
        assert_eq!(
            classify::<UnmodeledError>(SdkError::DispatchFailure(ConnectorError::user(
                "bad request".into()
            ))),
            RetryKind::NotRetryable
        );
    }

    #[test]
    fn pre_dispatch_failures_are_never_retried() {
        assert_eq!(
            classify::<UnmodeledError>(SdkError::EndpointResolutionFailure("no region".into())),
            RetryKind::NotRetryable
        );
        assert_eq!(
            classify::<UnmodeledError>(SdkError::ConfigurationFailure("no resolver".into())),
            RetryKind::NotRetryable
        );
    }
}
