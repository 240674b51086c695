/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Transports that a [`Client`](crate::Client) can send requests through

use hyper::client::HttpConnector;
use hyper_tls::HttpsConnector;
use smithy_http::body::SdkBody;
use smithy_http::result::{BoxError, ConnectorError};
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::Service;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A good base connection type for most use cases
///
/// This supports two options:
/// 1. HTTPS
/// 2. Any implementation of the `HttpService` trait
///
/// Both report failures as a [`ConnectorError`] so that the retry policy can tell timeouts and IO
/// failures apart from other errors.
#[derive(Clone)]
pub struct Standard(Connector);

#[derive(Clone)]
enum Connector {
    Https(hyper::Client<HttpsConnector<HttpConnector>, SdkBody>),
    Dyn(Box<dyn HttpService>),
}

impl Debug for Standard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Connector::Https(_) => f.write_str("Standard(https)"),
            Connector::Dyn(_) => f.write_str("Standard(dyn)"),
        }
    }
}

impl Standard {
    /// An https connection backed by hyper
    pub fn https() -> Self {
        let https = HttpsConnector::new();
        Self(Connector::Https(
            hyper::Client::builder().build::<_, SdkBody>(https),
        ))
    }

    /// A connection backed by any compatible tower service
    ///
    /// This is how test connections and custom transports are plugged into a [`Client`](crate::Client).
    pub fn new(conn: impl HttpService + 'static) -> Self {
        Self(Connector::Dyn(Box::new(conn)))
    }
}

/// An object-safe HTTP transport
///
/// This is implemented for every `Clone + Send + Sync` tower service that accepts an
/// `http::Request<SdkBody>` and produces an `http::Response<SdkBody>`.
pub trait HttpService: Send + Sync {
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), BoxError>>;

    fn call(
        &mut self,
        req: http::Request<SdkBody>,
    ) -> BoxFuture<Result<http::Response<SdkBody>, BoxError>>;

    fn clone_box(&self) -> Box<dyn HttpService>;
}

impl Clone for Box<dyn HttpService> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl<S> HttpService for S
where
    S: Service<http::Request<SdkBody>, Response = http::Response<SdkBody>>
        + Send
        + Sync
        + Clone
        + 'static,
    S::Error: Into<BoxError> + Send + Sync + 'static,
    S::Future: Send + 'static,
{
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), BoxError>> {
        Service::poll_ready(self, cx).map_err(|err| err.into())
    }

    fn call(
        &mut self,
        req: http::Request<SdkBody>,
    ) -> BoxFuture<Result<http::Response<SdkBody>, BoxError>> {
        let fut = Service::call(self, req);
        Box::pin(async move { fut.await.map_err(|err| err.into()) })
    }

    fn clone_box(&self) -> Box<dyn HttpService> {
        Box::new(self.clone())
    }
}

/// Classify a hyper error so the retry policy can act on it
fn to_connector_error(err: hyper::Error) -> ConnectorError {
    if err.is_timeout() {
        ConnectorError::timeout(err.into())
    } else if err.is_user() {
        ConnectorError::user(err.into())
    } else if err.is_closed() || err.is_canceled() || err.is_connect() || err.is_incomplete_message()
    {
        ConnectorError::io(err.into())
    } else {
        tracing::warn!(err = %err, "unrecognized hyper error");
        ConnectorError::other(err.into(), None)
    }
}

/// Errors from a dynamic connection keep their classification if they already carry one
fn from_box_error(err: BoxError) -> ConnectorError {
    match err.downcast::<ConnectorError>() {
        Ok(connector_error) => *connector_error,
        Err(err) => match err.downcast::<hyper::Error>() {
            Ok(hyper_error) => to_connector_error(*hyper_error),
            Err(err) => ConnectorError::other(err, None),
        },
    }
}

impl Service<http::Request<SdkBody>> for Standard {
    type Response = http::Response<SdkBody>;
    type Error = ConnectorError;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        match &mut self.0 {
            Connector::Https(https) => Service::poll_ready(https, cx).map_err(to_connector_error),
            Connector::Dyn(conn) => conn.poll_ready(cx).map_err(from_box_error),
        }
    }

    fn call(&mut self, req: http::Request<SdkBody>) -> Self::Future {
        match &mut self.0 {
            Connector::Https(https) => {
                let fut = Service::call(https, req);
                Box::pin(async move {
                    fut.await
                        .map(|resp| resp.map(SdkBody::from))
                        .map_err(to_connector_error)
                })
            }
            Connector::Dyn(conn) => {
                let fut = conn.call(req);
                Box::pin(async move { fut.await.map_err(from_box_error) })
            }
        }
    }
}
