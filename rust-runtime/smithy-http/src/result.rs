/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::body::SdkBody;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

pub type BoxError = Box<dyn Error + Send + Sync>;

/// Successful Sdk Result
///
/// Typically, transport implementations will type alias (or entirely wrap / transform) this type
/// by specifying a concrete body implementation:
/// ```rust
/// # mod hyper {
/// #    pub struct Body;
/// # }
/// type SdkSuccess<O> = smithy_http::result::SdkSuccess<O, hyper::Body>;
/// ```
#[derive(Debug)]
pub struct SdkSuccess<O, R = http::Response<SdkBody>> {
    pub raw: R,
    pub parsed: O,
}

/// Failing Sdk Result
///
/// Typically, transport implementations will type alias (or entirely wrap / transform) this type
/// by specifying a concrete body implementation.
#[derive(Debug)]
pub enum SdkError<E, R = http::Response<SdkBody>> {
    /// The client was not configured well enough to build a request, eg. no endpoint resolver
    /// was provided. Nothing was scheduled or sent.
    ConfigurationFailure(BoxError),

    /// No endpoint could be resolved for this request. Nothing was sent and no retry budget
    /// was consumed.
    EndpointResolutionFailure(BoxError),

    /// The request failed during construction. It was not dispatched over the network.
    ConstructionFailure(BoxError),

    /// The request failed during dispatch. An HTTP response was not received. The request MAY
    /// have been sent.
    DispatchFailure(ConnectorError),

    /// A response was received but it was not parseable according the the protocol (for example
    /// the server hung up while the body was being read)
    ResponseError { raw: R, err: BoxError },

    /// An error response was received from the service
    ServiceError { raw: R, err: E },
}

impl<E, R> SdkError<E, R> {
    /// The modeled service error, if this is a [`SdkError::ServiceError`]
    pub fn service_error(&self) -> Option<&E> {
        match self {
            SdkError::ServiceError { err, .. } => Some(err),
            _ => None,
        }
    }

    pub fn into_service_error(self) -> Option<E> {
        match self {
            SdkError::ServiceError { err, .. } => Some(err),
            _ => None,
        }
    }

    pub fn raw_response(&self) -> Option<&R> {
        match self {
            SdkError::ResponseError { raw, .. } | SdkError::ServiceError { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// True when this error was produced before anything was sent over the network
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            SdkError::ConfigurationFailure(_)
                | SdkError::EndpointResolutionFailure(_)
                | SdkError::ConstructionFailure(_)
        )
    }
}

impl<E, R> Display for SdkError<E, R>
where
    E: Error,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SdkError::ConfigurationFailure(err) => write!(f, "invalid client configuration: {}", err),
            SdkError::EndpointResolutionFailure(err) => {
                write!(f, "failed to resolve endpoint: {}", err)
            }
            SdkError::ConstructionFailure(err) => write!(f, "failed to construct request: {}", err),
            SdkError::DispatchFailure(err) => write!(f, "dispatch failure: {}", err),
            SdkError::ResponseError { err, .. } => write!(f, "response error: {}", err),
            SdkError::ServiceError { err, .. } => write!(f, "service error: {}", err),
        }
    }
}

impl<E, R> Error for SdkError<E, R>
where
    E: Error + 'static,
    R: Debug,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SdkError::ConfigurationFailure(err)
            | SdkError::EndpointResolutionFailure(err)
            | SdkError::ConstructionFailure(err)
            | SdkError::ResponseError { err, .. } => Some(err.as_ref()),
            SdkError::DispatchFailure(err) => Some(err),
            SdkError::ServiceError { err, .. } => Some(err),
        }
    }
}

#[derive(Debug)]
enum ConnectorErrorKind {
    /// A timeout occurred while processing the request
    Timeout,

    /// A user-caused error (eg. invalid HTTP request)
    User,

    /// Socket/IO error
    Io,

    /// An unclassified error, optionally carrying the retry kind the connector suggests
    Other(Option<smithy_types::retry::ErrorKind>),
}

/// Error from the underlying connector
///
/// Connector exists to attach a `ConnectorErrorKind` to what would otherwise be an opaque `Box<dyn Error>`
/// that comes off a potentially generic or dynamic connector.
/// The attached `kind` is used to determine what retry behavior should occur (if any) based on the
/// connector error.
#[derive(Debug)]
pub struct ConnectorError {
    err: BoxError,
    kind: ConnectorErrorKind,
}

impl Display for ConnectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.err)
    }
}

impl Display for ConnectorErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorErrorKind::Timeout => write!(f, "timeout"),
            ConnectorErrorKind::User => write!(f, "user error"),
            ConnectorErrorKind::Io => write!(f, "io error"),
            ConnectorErrorKind::Other(_) => write!(f, "other"),
        }
    }
}

impl Error for ConnectorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.err.as_ref())
    }
}

impl ConnectorError {
    /// Construct a [`ConnectorError`] from an error caused by a timeout
    ///
    /// Timeout errors are typically retried on a new connection.
    pub fn timeout(err: BoxError) -> Self {
        Self {
            err,
            kind: ConnectorErrorKind::Timeout,
        }
    }

    /// Construct a [`ConnectorError`] from an error caused by the user (eg. invalid HTTP request)
    pub fn user(err: BoxError) -> Self {
        Self {
            err,
            kind: ConnectorErrorKind::User,
        }
    }

    /// Construct a [`ConnectorError`] from an IO related error (eg. socket hangup)
    pub fn io(err: BoxError) -> Self {
        Self {
            err,
            kind: ConnectorErrorKind::Io,
        }
    }

    /// Construct a [`ConnectorError`] from an unclassified error.
    ///
    /// `kind` can be used to indicate whether the connector believes this error is retryable.
    pub fn other(err: BoxError, kind: Option<smithy_types::retry::ErrorKind>) -> Self {
        Self {
            err,
            kind: ConnectorErrorKind::Other(kind),
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self.kind, ConnectorErrorKind::Io)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ConnectorErrorKind::Timeout)
    }

    pub fn is_user(&self) -> bool {
        matches!(self.kind, ConnectorErrorKind::User)
    }

    pub fn is_other(&self) -> Option<smithy_types::retry::ErrorKind> {
        match &self.kind {
            ConnectorErrorKind::Other(ek) => *ek,
            _ => None,
        }
    }

    pub fn into_inner(self) -> BoxError {
        self.err
    }
}
