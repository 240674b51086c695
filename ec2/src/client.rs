/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Client for Amazon Elastic Compute Cloud
//!
//! ```rust,no_run
//! # async fn docs() -> Result<(), ec2::Error> {
//! let client = ec2::Client::from_conf(ec2::Config::from_env().await);
//! let regions = client.describe_regions().send().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Every operation can be sent four ways:
//! - `send().await`
//! - `send_blocking()`, for callers outside of an async runtime
//! - `send_callable()`, which schedules the request and returns a future for its outcome
//! - `send_async(handler, context)`, which schedules the request and calls `handler` on an
//!   executor thread when it completes
//!
//! All four share the same pipeline and produce the same outcome for the same request.

use crate::config::Config;
use std::fmt;
use std::sync::Arc;

pub(crate) struct Handle<C> {
    client: aws_hyper::Client<C>,
    conf: Config,
}

pub struct Client<C = aws_hyper::conn::Standard> {
    handle: Arc<Handle<C>>,
}

impl<C> Clone for Client<C> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<C> fmt::Debug for Client<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("conf", &self.handle.conf)
            .finish()
    }
}

impl<C> Client<C> {
    /// Build a client that sends requests through `conn`
    pub fn from_conf_conn(conf: Config, conn: C) -> Self {
        let mut client = aws_hyper::Client::new(conn)
            .with_retry_config(conf.retry_config.clone())
            .with_timeout_config(conf.timeout_config.clone());
        if let Some(sleep_impl) = &conf.sleep_impl {
            client = client.with_sleep_impl(Some(sleep_impl.clone()));
        }
        if let Some(executor) = &conf.executor {
            client = client.with_executor(executor.clone());
        }
        Self {
            handle: Arc::new(Handle { client, conf }),
        }
    }

    pub fn conf(&self) -> &Config {
        &self.handle.conf
    }
}

impl Client {
    pub fn from_conf(conf: Config) -> Self {
        Self::from_conf_conn(conf, aws_hyper::conn::Standard::https())
    }
}

macro_rules! fluent_client {
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
        impl<C> Client<C> {
            $(
                #[doc = $doc]
                pub fn $method(&self) -> fluent_builders::$op<C> {
                    fluent_builders::$op::new(self.handle.clone())
                }
            )*
        }

        pub mod fluent_builders {
            use crate::client::Handle;
            use aws_endpoint::EndpointOverrides;
            use aws_hyper::executor::AsyncCallerContext;
            use aws_hyper::{CallableFuture, SdkError};
            use aws_types::region::Region;
            use smithy_http::body::SdkBody;
            use smithy_http::result::BoxError;
            use std::sync::Arc;

            $(
                #[doc = $doc]
                #[derive(std::fmt::Debug)]
                pub struct $op<C> {
                    handle: Arc<Handle<C>>,
                    inner: crate::input::$builder::Builder,
                    overrides: EndpointOverrides,
                }

                impl<C> $op<C> {
                    pub(crate) fn new(handle: Arc<Handle<C>>) -> Self {
                        Self {
                            handle,
                            inner: Default::default(),
                            overrides: Default::default(),
                        }
                    }

                    $(
                        pub fn $setter(mut self, $arg: $argty) -> Self {
                            self.inner = self.inner.$setter($arg);
                            self
                        }
                    )*

                    /// Send this request to `region` instead of the client's region
                    pub fn region_override(mut self, region: impl Into<Option<Region>>) -> Self {
                        self.overrides.region = region.into();
                        self
                    }

                    pub fn use_dual_stack_override(mut self, use_dual_stack: bool) -> Self {
                        self.overrides.use_dual_stack = Some(use_dual_stack);
                        self
                    }

                    pub fn use_fips_override(mut self, use_fips: bool) -> Self {
                        self.overrides.use_fips = Some(use_fips);
                        self
                    }

                    fn operation(
                        &self,
                    ) -> Result<
                        (
                            crate::input::$input,
                            smithy_http::operation::Operation<
                                crate::operation::$op,
                                aws_http::AwsErrorRetryPolicy,
                            >,
                        ),
                        SdkError<crate::error::$error>,
                    > {
                        let input = self
                            .inner
                            .clone()
                            .build()
                            .map_err(|err| SdkError::ConstructionFailure(err.into()))?;
                        let mut op = input
                            .make_operation(&self.handle.conf)
                            .map_err(|err| SdkError::ConstructionFailure(err.into()))?;
                        op.properties_mut().insert(self.overrides.clone());
                        Ok((input, op))
                    }
                }

                impl<C> $op<C>
                where
                    C: tower::Service<http::Request<SdkBody>, Response = http::Response<SdkBody>>
                        + Send
                        + Sync
                        + Clone
                        + 'static,
                    C::Error: Into<BoxError> + Send + Sync + 'static,
                    C::Future: Send + 'static,
                {
                    pub async fn send(
                        self,
                    ) -> Result<crate::output::$output, SdkError<crate::error::$error>> {
                        let (_, op) = self.operation()?;
                        self.handle.client.call(op).await
                    }

                    /// Send the request and block the current thread until it completes
                    ///
                    /// Returns a `DispatchFailure` when called from within an async runtime.
                    pub fn send_blocking(
                        self,
                    ) -> Result<crate::output::$output, SdkError<crate::error::$error>> {
                        let (_, op) = self.operation()?;
                        self.handle.client.call_blocking(op)
                    }

                    /// Schedule the request and return a future for its outcome
                    ///
                    /// The request is sent whether or not the future is polled. Errors detected
                    /// before scheduling, like a missing endpoint resolver, are returned directly.
                    pub fn send_callable(
                        self,
                    ) -> Result<
                        CallableFuture<crate::output::$output, crate::error::$error>,
                        SdkError<crate::error::$error>,
                    > {
                        let (_, op) = self.operation()?;
                        self.handle.client.call_callable(op)
                    }

                    /// Schedule the request and invoke `handler` with its outcome
                    ///
                    /// `handler` receives the input that was sent, the outcome, and `context`.
                    /// It runs once, on an executor thread. Handlers of concurrent requests run in
                    /// completion order, not submission order.
                    pub fn send_async<F>(
                        self,
                        handler: F,
                        context: AsyncCallerContext,
                    ) -> Result<(), SdkError<crate::error::$error>>
                    where
                        F: FnOnce(
                                &crate::input::$input,
                                Result<crate::output::$output, SdkError<crate::error::$error>>,
                                AsyncCallerContext,
                            ) + Send
                            + 'static,
                    {
                        let (input, op) = self.operation()?;
                        tracing::debug!(context = %context.id(), operation = stringify!($op), "scheduling request");
                        self.handle.client.call_with_handler(op, move |result| {
                            tracing::debug!(context = %context.id(), "request complete");
                            handler(&input, result, context)
                        })
                    }
                }
            )*
        }
    };
}

ec2_manifest!(fluent_client);

impl<C> fmt::Debug for Handle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("conf", &self.conf).finish()
    }
}

#[cfg(test)]
mod test {
    use crate::{Client, Config, Credentials, Region};
    use aws_hyper::executor::AsyncCallerContext;
    use aws_hyper::test_connection::TestConnection;
    use smithy_http::body::SdkBody;
    use tokio::sync::oneshot;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn send_async_logs_the_caller_context() {
        let conn = TestConnection::new(vec![(
            http::Request::new(SdkBody::from("")),
            http::Response::builder()
                .status(200)
                .body("<DescribeRegionsResponse><regionInfo/></DescribeRegionsResponse>")
                .unwrap(),
        )]);
        let conf = Config::builder()
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::from_keys("AKIDEXAMPLE", "secret", None))
            .build();
        let client = Client::from_conf_conn(conf, conn.clone());
        let (tx, rx) = oneshot::channel();
        client
            .describe_regions()
            .send_async(
                move |_input, result, _context| {
                    let _ = tx.send(result.map(|output| output.regions));
                },
                AsyncCallerContext::with_id("inventory-sweep"),
            )
            .expect("scheduled");
        let regions = rx.await.expect("handler ran").expect("success");
        assert_eq!(regions, Some(vec![]));
        assert!(logs_contain("scheduling request"));
        assert!(logs_contain("inventory-sweep"));
        assert_eq!(conn.requests().len(), 1);
    }
}
