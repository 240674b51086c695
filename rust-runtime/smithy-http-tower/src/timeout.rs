/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Per-attempt timeouts
//!
//! The layer sits below retries so that each attempt gets its own deadline. A timed out attempt
//! surfaces as a timeout [`ConnectorError`], which the retry policy treats as transient.

use crate::SendOperationError;
use smithy_async::future::timeout::{TimedOutError, Timeout};
use smithy_async::rt::sleep::AsyncSleep;
use smithy_http::operation;
use smithy_http::result::ConnectorError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::{Layer, Service};

#[derive(Clone, Debug)]
struct AttemptTimeout {
    duration: Duration,
    sleep: Arc<dyn AsyncSleep>,
}

/// Layer that applies an optional timeout to every request sent through it
///
/// When no timeout is configured the inner future is passed through unchanged.
#[derive(Clone, Debug, Default)]
pub struct AttemptTimeoutLayer {
    timeout: Option<AttemptTimeout>,
}

impl AttemptTimeoutLayer {
    pub fn new(duration: Duration, sleep: Arc<dyn AsyncSleep>) -> Self {
        Self {
            timeout: Some(AttemptTimeout { duration, sleep }),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }
}

impl<S> Layer<S> for AttemptTimeoutLayer {
    type Service = AttemptTimeoutService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AttemptTimeoutService {
            inner,
            timeout: self.timeout.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AttemptTimeoutService<S> {
    inner: S,
    timeout: Option<AttemptTimeout>,
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

impl<S> Service<operation::Request> for AttemptTimeoutService<S>
where
    S: Service<operation::Request, Error = SendOperationError>,
    S::Response: Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = SendOperationError;
    type Future = BoxFuture<Result<S::Response, SendOperationError>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: operation::Request) -> Self::Future {
        let fut = self.inner.call(req);
        match &self.timeout {
            None => Box::pin(fut),
            Some(timeout) => {
                let duration = timeout.duration;
                let sleep = timeout.sleep.sleep(duration);
                Box::pin(async move {
                    match Timeout::new(fut, sleep).await {
                        Ok(result) => result,
                        Err(TimedOutError) => {
                            tracing::debug!(timeout = ?duration, "attempt timed out");
                            Err(SendOperationError::RequestDispatchError(
                                ConnectorError::timeout(
                                    format!("attempt did not complete within {:?}", duration)
                                        .into(),
                                ),
                            ))
                        }
                    }
                })
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::dispatch::DispatchLayer;
    use crate::timeout::AttemptTimeoutLayer;
    use crate::SendOperationError;
    use smithy_async::rt::sleep::TokioSleep;
    use smithy_http::body::SdkBody;
    use smithy_http::operation;
    use smithy_http::result::ConnectorError;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::{service_fn, Service, ServiceBuilder};

    #[tokio::test(start_paused = true)]
    async fn slow_attempts_time_out() {
        let conn = service_fn(|_req: http::Request<SdkBody>| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, ConnectorError>(http::Response::new(SdkBody::empty()))
        });
        let mut svc = ServiceBuilder::new()
            .layer(AttemptTimeoutLayer::new(
                Duration::from_secs(5),
                Arc::new(TokioSleep::new()),
            ))
            .layer(DispatchLayer::new())
            .service(conn);
        let err = svc
            .call(operation::Request::new(http::Request::new(SdkBody::empty())))
            .await
            .expect_err("should time out");
        match err {
            SendOperationError::RequestDispatchError(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn disabled_timeout_passes_through() {
        let conn = service_fn(|_req: http::Request<SdkBody>| async {
            Ok::<_, ConnectorError>(http::Response::new(SdkBody::from("ok")))
        });
        let mut svc = ServiceBuilder::new()
            .layer(AttemptTimeoutLayer::disabled())
            .layer(DispatchLayer::new())
            .service(conn);
        let resp = svc
            .call(operation::Request::new(http::Request::new(SdkBody::empty())))
            .await
            .expect("success");
        assert_eq!(resp.body().bytes(), Some("ok".as_bytes()));
    }
}
