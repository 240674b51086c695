/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Request dispatch for AWS services
//!
//! A [`Client`] sends an [`Operation`] through the standard AWS middleware stack:
//! endpoint resolution, credentials loading, user agent, SigV4 signing, per-attempt timeouts,
//! retries, and response parsing. The same pipeline backs three calling conventions:
//!
//! - [`Client::call`]: an `async fn`
//! - [`Client::call_blocking`]: blocks the calling thread until the outcome is available
//! - [`Client::call_callable`] and [`Client::call_with_handler`]: schedule the request on an
//!   [`Executor`](executor::Executor) and return immediately
//!
//! Configuration errors (no endpoint resolver) are reported before anything is scheduled.
//! Endpoint resolution errors are reported before the transport is called, so they never consume
//! retry budget.

pub mod conn;
pub mod executor;
mod retry;
#[doc(hidden)]
pub mod test_connection;

pub use retry::RetryConfig;
pub use smithy_http::result::{SdkError, SdkSuccess};

use crate::executor::{default_executor, Executor, SharedExecutor};
use crate::retry::RetryHandlerFactory;
use aws_auth::ProvideCredentials;
use aws_endpoint::{AwsEndpointStage, AwsEndpointStageError};
use aws_http::user_agent::UserAgentStage;
use aws_sig_auth::middleware::SigV4SigningStage;
use aws_sig_auth::signer::SigV4Signer;
use smithy_async::rt::sleep::{default_async_sleep, AsyncSleep};
use smithy_http::body::SdkBody;
use smithy_http::middleware::MapRequest;
use smithy_http::operation::Operation;
use smithy_http::response::ParseHttpResponse;
use smithy_http::result::{BoxError, ConnectorError};
use smithy_http::retry::ClassifyResponse;
use smithy_http_tower::dispatch::DispatchLayer;
use smithy_http_tower::map_request::MapRequestLayer;
use smithy_http_tower::parse_response::ParseResponseLayer;
use smithy_http_tower::timeout::AttemptTimeoutLayer;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tower::{Service, ServiceBuilder, ServiceExt};
use tracing::{debug_span, field, Instrument};

/// Timeouts applied by a [`Client`]
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct TimeoutConfig {
    attempt_timeout: Option<Duration>,
}

impl TimeoutConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Bound the time spent on each individual attempt
    ///
    /// A timed out attempt is a transient failure and may be retried.
    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }
}

/// AWS Service Client
///
/// Hyper-based AWS Service Client. Most customers will want to construct a client with
/// [`Client::https`](Client::https). For testing & other more advanced use cases, a custom
/// connector may be used via [`Client::new(connector)`](Client::new).
///
/// The internal connector must implement the following trait bound to be used to dispatch requests:
/// ```rust,ignore
///    S: Service<http::Request<SdkBody>, Response = http::Response<SdkBody>>
///        + Send
///        + Sync
///        + Clone
///        + 'static,
///    S::Error: Into<BoxError> + Send + Sync + 'static,
///    S::Future: Send + 'static,
/// ```
#[derive(Debug, Clone)]
pub struct Client<S = conn::Standard> {
    inner: S,
    retry_handler: RetryHandlerFactory,
    timeout_config: TimeoutConfig,
    sleep_impl: Option<Arc<dyn AsyncSleep>>,
    executor: SharedExecutor,
}

impl<S> Client<S> {
    pub fn new(connector: S) -> Self {
        Client {
            inner: connector,
            retry_handler: RetryHandlerFactory::new(RetryConfig::default()),
            timeout_config: TimeoutConfig::default(),
            sleep_impl: default_async_sleep(),
            executor: default_executor(),
        }
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_handler.with_config(retry_config);
        self
    }

    pub fn with_timeout_config(mut self, timeout_config: TimeoutConfig) -> Self {
        self.timeout_config = timeout_config;
        self
    }

    /// Override the sleep used for retry backoff and attempt timeouts
    ///
    /// Without a sleep implementation, requests are never retried and attempt timeouts are not
    /// enforced.
    pub fn with_sleep_impl(mut self, sleep_impl: Option<Arc<dyn AsyncSleep>>) -> Self {
        self.sleep_impl = sleep_impl;
        self
    }

    /// Override the executor used by the blocking, callable, and handler calling conventions
    pub fn with_executor(mut self, executor: SharedExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        self.retry_handler.config()
    }

    pub fn timeout_config(&self) -> &TimeoutConfig {
        &self.timeout_config
    }
}

impl Client<conn::Standard> {
    pub fn https() -> Self {
        Client::new(conn::Standard::https())
    }
}

/// Fail fast if the operation cannot possibly be dispatched
fn check_config<O, R, E>(input: &Operation<O, R>) -> Result<(), SdkError<E>> {
    if aws_endpoint::get_endpoint_resolver(&input.request().properties()).is_none() {
        return Err(SdkError::ConfigurationFailure(
            AwsEndpointStageError::NoEndpointResolver.into(),
        ));
    }
    Ok(())
}

/// Resolve the endpoint of `input` before it enters the retry loop
fn resolve_endpoint<O, R, E>(input: Operation<O, R>) -> Result<Operation<O, R>, SdkError<E>> {
    let (request, parts) = input.into_request_response();
    let request = AwsEndpointStage.apply(request).map_err(|err| {
        tracing::debug!(err = %err, "endpoint resolution failed");
        match err {
            AwsEndpointStageError::NoEndpointResolver => SdkError::ConfigurationFailure(err.into()),
            other => SdkError::EndpointResolutionFailure(other.into()),
        }
    })?;
    Ok(Operation::from_parts(request, parts))
}

/// Load credentials from the operation's provider, if it has one
async fn load_credentials<O, R, E>(input: &mut Operation<O, R>) -> Result<(), SdkError<E>> {
    let provider = aws_auth::get_provider(&input.request().properties()).cloned();
    if let Some(provider) = provider {
        let credentials = provider
            .provide_credentials()
            .await
            .map_err(|err| SdkError::ConstructionFailure(err.into()))?;
        input.properties_mut().insert(credentials);
    }
    Ok(())
}

fn executor_error<E>(err: executor::ExecutorError) -> SdkError<E> {
    SdkError::DispatchFailure(ConnectorError::user(err.into()))
}

fn lost_result<E>() -> SdkError<E> {
    SdkError::DispatchFailure(ConnectorError::other(
        "the request task completed without producing a result".into(),
        None,
    ))
}

impl<S> Client<S>
where
    S: Service<http::Request<SdkBody>, Response = http::Response<SdkBody>>
        + Send
        + Sync
        + Clone
        + 'static,
    S::Error: Into<BoxError> + Send + Sync + 'static,
    S::Future: Send + 'static,
{
    /// Dispatch this request to the network
    ///
    /// For ergonomics, this does not include the raw response for successful responses. To
    /// access the raw response use `call_raw`.
    pub async fn call<O, T, E, Retry>(&self, input: Operation<O, Retry>) -> Result<T, SdkError<E>>
    where
        O: ParseHttpResponse<SdkBody, Output = Result<T, E>> + Send + Sync + Clone + 'static,
        E: Send + Sync + 'static,
        T: Send + 'static,
        Retry: ClassifyResponse<SdkSuccess<T>, SdkError<E>> + Send + Sync + 'static,
    {
        self.call_raw(input).await.map(|res| res.parsed)
    }

    /// Dispatch this request to the network
    ///
    /// The returned result contains the raw HTTP response which can be useful for debugging or implementing
    /// unsupported features.
    pub async fn call_raw<O, R, E, Retry>(
        &self,
        input: Operation<O, Retry>,
    ) -> Result<SdkSuccess<R>, SdkError<E>>
    where
        O: ParseHttpResponse<SdkBody, Output = Result<R, E>> + Send + Sync + Clone + 'static,
        E: Send + Sync + 'static,
        R: Send + 'static,
        Retry: ClassifyResponse<SdkSuccess<R>, SdkError<E>> + Send + Sync + 'static,
    {
        let span = match input.metadata() {
            Some(metadata) => debug_span!(
                "dispatch",
                operation = metadata.name(),
                service = metadata.service(),
                outcome = field::Empty,
            ),
            None => debug_span!("dispatch", outcome = field::Empty),
        };
        let result = self.dispatch(input).instrument(span.clone()).await;
        span.record(
            "outcome",
            &match &result {
                Ok(_) => "success",
                Err(_) => "failure",
            },
        );
        result
    }

    async fn dispatch<O, R, E, Retry>(
        &self,
        input: Operation<O, Retry>,
    ) -> Result<SdkSuccess<R>, SdkError<E>>
    where
        O: ParseHttpResponse<SdkBody, Output = Result<R, E>> + Send + Sync + Clone + 'static,
        E: Send + Sync + 'static,
        R: Send + 'static,
        Retry: ClassifyResponse<SdkSuccess<R>, SdkError<E>> + Send + Sync + 'static,
    {
        let mut input = resolve_endpoint(input)?;
        load_credentials(&mut input).await?;

        let timeout_layer = match (self.timeout_config.attempt_timeout(), &self.sleep_impl) {
            (Some(duration), Some(sleep)) => AttemptTimeoutLayer::new(duration, sleep.clone()),
            (Some(_), None) => {
                tracing::warn!(
                    "an attempt timeout was configured but no sleep implementation is available. The timeout will not be enforced."
                );
                AttemptTimeoutLayer::disabled()
            }
            (None, _) => AttemptTimeoutLayer::disabled(),
        };
        let signer = MapRequestLayer::for_mapper(SigV4SigningStage::new(SigV4Signer::new()));
        let user_agent = MapRequestLayer::for_mapper(UserAgentStage::new());
        let inner = self.inner.clone();
        let mut svc = ServiceBuilder::new()
            .retry(self.retry_handler.new_handler(self.sleep_impl.clone()))
            .layer(ParseResponseLayer::<O, Retry>::new())
            .layer(user_agent)
            .layer(signer)
            .layer(timeout_layer)
            .layer(DispatchLayer::new())
            .service(inner);
        svc.ready().await?.call(input).await
    }

    /// Dispatch this request and block the current thread until it completes
    ///
    /// This must not be called from within an async context. Doing so returns a
    /// [`DispatchFailure`](SdkError::DispatchFailure) instead of deadlocking.
    pub fn call_blocking<O, T, E, Retry>(
        &self,
        input: Operation<O, Retry>,
    ) -> Result<T, SdkError<E>>
    where
        O: ParseHttpResponse<SdkBody, Output = Result<T, E>> + Send + Sync + Clone + 'static,
        E: Send + Sync + 'static,
        T: Send + 'static,
        Retry: ClassifyResponse<SdkSuccess<T>, SdkError<E>> + Send + Sync + 'static,
    {
        check_config(&input)?;
        let mut output = None;
        let slot = &mut output;
        let task = async move {
            *slot = Some(self.call(input).await);
        };
        self.executor
            .block_on(Box::pin(task))
            .map_err(executor_error)?;
        output.unwrap_or_else(|| Err(lost_result()))
    }

    /// Schedule this request on the client's executor and return a future for its outcome
    ///
    /// The request makes progress whether or not the returned future is polled.
    pub fn call_callable<O, T, E, Retry>(
        &self,
        input: Operation<O, Retry>,
    ) -> Result<CallableFuture<T, E>, SdkError<E>>
    where
        O: ParseHttpResponse<SdkBody, Output = Result<T, E>> + Send + Sync + Clone + 'static,
        E: Send + Sync + 'static,
        T: Send + 'static,
        Retry: ClassifyResponse<SdkSuccess<T>, SdkError<E>> + Send + Sync + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.call_with_handler(input, move |result| {
            // the caller may have dropped the future
            let _ = tx.send(result);
        })?;
        Ok(CallableFuture { rx })
    }

    /// Schedule this request on the client's executor and invoke `handler` with its outcome
    ///
    /// `handler` runs exactly once, on an executor thread. Completions are not ordered: if two
    /// requests are scheduled, the handler of the first to complete runs first.
    pub fn call_with_handler<O, T, E, Retry, F>(
        &self,
        input: Operation<O, Retry>,
        handler: F,
    ) -> Result<(), SdkError<E>>
    where
        O: ParseHttpResponse<SdkBody, Output = Result<T, E>> + Send + Sync + Clone + 'static,
        E: Send + Sync + 'static,
        T: Send + 'static,
        Retry: ClassifyResponse<SdkSuccess<T>, SdkError<E>> + Send + Sync + 'static,
        F: FnOnce(Result<T, SdkError<E>>) + Send + 'static,
    {
        check_config(&input)?;
        let client = self.clone();
        let task = async move {
            let result = client.call(input).await;
            handler(result);
        };
        self.executor
            .spawn(Box::pin(task))
            .map_err(executor_error)
    }
}

/// The outcome of a request scheduled with [`Client::call_callable`]
#[derive(Debug)]
pub struct CallableFuture<T, E> {
    rx: oneshot::Receiver<Result<T, SdkError<E>>>,
}

impl<T, E> Future for CallableFuture<T, E> {
    type Output = Result<T, SdkError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or_else(|_| Err(lost_result())))
    }
}

#[cfg(test)]
mod static_tests {
    use crate::conn::Standard;
    use crate::test_connection::TestConnection;
    use crate::Client;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn client_is_send_sync() {
        assert_send_sync::<Client<Standard>>();
        assert_send_sync::<Client<TestConnection<String>>>();
    }
}
