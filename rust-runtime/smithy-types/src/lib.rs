/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

pub mod instant;
pub mod retry;

pub use crate::instant::Instant;

use crate::retry::{ErrorKind, ProvideErrorKind};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Generic Error type
///
/// For many services, Errors are modeled. However, many services only partially model errors or don't
/// model errors at all. In these cases, the SDK will return this generic error type to expose the
/// `code`, `message` and `request_id`.
#[derive(Debug, Eq, PartialEq, Default, Clone)]
pub struct Error {
    pub code: Option<String>,
    pub message: Option<String>,
    pub request_id: Option<String>,
}

impl Error {
    /// The error code returned by the service, eg. `InvalidInstanceID.NotFound`
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The request id the service attached to this error, if any
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl ProvideErrorKind for Error {
    fn retryable_error_kind(&self) -> Option<ErrorKind> {
        None
    }

    fn code(&self) -> Option<&str> {
        Error::code(self)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut fmt = f.debug_struct("Error");
        if let Some(code) = &self.code {
            fmt.field("code", code);
        }
        if let Some(message) = &self.message {
            fmt.field("message", message);
        }
        if let Some(req_id) = &self.request_id {
            fmt.field("request_id", req_id);
        }
        fmt.finish()
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use crate::retry::ProvideErrorKind;
    use crate::Error;

    #[test]
    fn generic_error_display() {
        let err = Error {
            code: Some("InvalidInstanceID.NotFound".to_string()),
            message: Some("The instance ID 'i-1' does not exist".to_string()),
            request_id: Some("ea966190-f9aa-478e-9ede-example".to_string()),
        };
        assert_eq!(
            format!("{}", err),
            "Error { code: \"InvalidInstanceID.NotFound\", message: \"The instance ID 'i-1' does not exist\", request_id: \"ea966190-f9aa-478e-9ede-example\" }"
        );
        assert_eq!(ProvideErrorKind::code(&err), Some("InvalidInstanceID.NotFound"));
        assert_eq!(err.retryable_error_kind(), None);
    }

    #[test]
    fn empty_error_display() {
        assert_eq!(format!("{}", Error::default()), "Error");
    }
}
