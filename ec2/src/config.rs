/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Client configuration
//!
//! A [`Config`] is built once and shared by every request a [`Client`](crate::Client) sends.
//! Everything an operation needs at dispatch time (endpoint parameters, the endpoint resolver,
//! the credentials provider, signing configuration, and the user agent) is copied into the
//! operation's property bag by [`Config::configure_operation`].

use aws_auth::{ProvideCredentials, SharedCredentialsProvider};
use aws_endpoint::{Params, PartitionEndpointResolver, ResolveAwsEndpoint};
use aws_http::user_agent::{ApiMetadata, AwsUserAgent};
use aws_hyper::executor::SharedExecutor;
use aws_hyper::{RetryConfig, TimeoutConfig};
use aws_sig_auth::signer::OperationSigningConfig;
use aws_types::os_shim_internal::Env;
use aws_types::region::{ProvideRegion, Region};
use smithy_async::rt::sleep::AsyncSleep;
use smithy_http::property_bag::PropertyBag;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

pub(crate) static API_METADATA: ApiMetadata = ApiMetadata::new("ec2", crate::PKG_VERSION);

#[derive(Clone)]
pub struct Config {
    pub(crate) region: Option<Region>,
    pub(crate) credentials_provider: SharedCredentialsProvider,
    pub(crate) endpoint_resolver: Option<Arc<dyn ResolveAwsEndpoint>>,
    pub(crate) endpoint_url: Option<String>,
    pub(crate) use_dual_stack: bool,
    pub(crate) use_fips: bool,
    pub(crate) retry_config: RetryConfig,
    pub(crate) timeout_config: TimeoutConfig,
    pub(crate) sleep_impl: Option<Arc<dyn AsyncSleep>>,
    pub(crate) executor: Option<SharedExecutor>,
    pub(crate) app_name: Option<Cow<'static, str>>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut config = f.debug_struct("Config");
        config
            .field("region", &self.region)
            .field("credentials_provider", &self.credentials_provider)
            .field("has_endpoint_resolver", &self.endpoint_resolver.is_some())
            .field("endpoint_url", &self.endpoint_url)
            .field("use_dual_stack", &self.use_dual_stack)
            .field("use_fips", &self.use_fips)
            .field("retry_config", &self.retry_config)
            .field("timeout_config", &self.timeout_config)
            .field("app_name", &self.app_name);
        config.finish()
    }
}

impl Config {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Load a configuration from the environment
    ///
    /// The region is read from `AWS_REGION`, then `AWS_DEFAULT_REGION`. Credentials are loaded
    /// lazily, on each request, from the default provider chain.
    pub async fn from_env() -> Self {
        let region = aws_types::region::default_provider().region().await;
        Config::builder().region(region).build()
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    pub fn timeout_config(&self) -> &TimeoutConfig {
        &self.timeout_config
    }

    /// The endpoint parameters every request starts from, before per-request overrides
    pub fn endpoint_params(&self) -> Params {
        Params::new(self.region.clone())
            .with_dual_stack(self.use_dual_stack)
            .with_fips(self.use_fips)
            .with_endpoint_url(self.endpoint_url.clone())
    }

    /// Store everything needed to dispatch an operation in its property bag
    pub(crate) fn configure_operation(&self, props: &mut PropertyBag) {
        props.insert(self.endpoint_params());
        if let Some(resolver) = &self.endpoint_resolver {
            aws_endpoint::set_endpoint_resolver(props, resolver.clone());
        }
        aws_auth::set_provider(props, self.credentials_provider.clone());
        props.insert(OperationSigningConfig::default_config());
        props.insert(AwsUserAgent::new_from_environment(
            Env::real(),
            API_METADATA.clone(),
            self.app_name.clone(),
        ));
    }
}

/// Builder for [`Config`]
///
/// Every unset field falls back to a default:
/// - credentials: [`aws_auth::provider::default_provider`]
/// - endpoint resolver: [`PartitionEndpointResolver::ec2`]
/// - retries: [`RetryConfig::default`]
/// - no region. Requests fail to resolve an endpoint until one is set.
pub struct Builder {
    region: Option<Region>,
    credentials_provider: Option<SharedCredentialsProvider>,
    endpoint_resolver: Option<Arc<dyn ResolveAwsEndpoint>>,
    endpoint_url: Option<String>,
    use_dual_stack: bool,
    use_fips: bool,
    retry_config: Option<RetryConfig>,
    timeout_config: Option<TimeoutConfig>,
    sleep_impl: Option<Arc<dyn AsyncSleep>>,
    executor: Option<SharedExecutor>,
    app_name: Option<Cow<'static, str>>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            region: None,
            credentials_provider: None,
            endpoint_resolver: Some(Arc::new(PartitionEndpointResolver::ec2())),
            endpoint_url: None,
            use_dual_stack: false,
            use_fips: false,
            retry_config: None,
            timeout_config: None,
            sleep_impl: None,
            executor: None,
            app_name: None,
        }
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("use_dual_stack", &self.use_dual_stack)
            .field("use_fips", &self.use_fips)
            .finish()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, region: impl Into<Option<Region>>) -> Self {
        self.region = region.into();
        self
    }

    /// Sign requests with credentials from `credentials_provider`
    ///
    /// Static [`Credentials`](aws_auth::Credentials) are a provider, as is anything implementing
    /// [`ProvideCredentials`].
    pub fn credentials_provider(
        mut self,
        credentials_provider: impl ProvideCredentials + 'static,
    ) -> Self {
        self.credentials_provider = Some(SharedCredentialsProvider::new(credentials_provider));
        self
    }

    pub fn set_credentials_provider(
        mut self,
        credentials_provider: Option<SharedCredentialsProvider>,
    ) -> Self {
        self.credentials_provider = credentials_provider;
        self
    }

    pub fn endpoint_resolver(mut self, endpoint_resolver: impl ResolveAwsEndpoint + 'static) -> Self {
        self.endpoint_resolver = Some(Arc::new(endpoint_resolver));
        self
    }

    /// Replace the endpoint resolver
    ///
    /// Passing `None` removes the resolver altogether: every request then fails with
    /// [`SdkError::ConfigurationFailure`](crate::SdkError::ConfigurationFailure) before it is
    /// scheduled.
    pub fn set_endpoint_resolver(
        mut self,
        endpoint_resolver: Option<Arc<dyn ResolveAwsEndpoint>>,
    ) -> Self {
        self.endpoint_resolver = endpoint_resolver;
        self
    }

    /// Send every request to `endpoint_url` instead of the regional EC2 endpoint
    ///
    /// The URL is used verbatim. Requests are still signed for the configured region. An
    /// endpoint URL cannot be combined with dualstack or FIPS.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn use_dual_stack(mut self, use_dual_stack: bool) -> Self {
        self.use_dual_stack = use_dual_stack;
        self
    }

    pub fn use_fips(mut self, use_fips: bool) -> Self {
        self.use_fips = use_fips;
        self
    }

    pub fn retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = Some(retry_config);
        self
    }

    pub fn timeout_config(mut self, timeout_config: TimeoutConfig) -> Self {
        self.timeout_config = Some(timeout_config);
        self
    }

    /// Sleep implementation used for retry backoff and attempt timeouts
    pub fn sleep_impl(mut self, sleep_impl: Arc<dyn AsyncSleep>) -> Self {
        self.sleep_impl = Some(sleep_impl);
        self
    }

    /// Executor used by `send_blocking`, `send_callable`, and `send_async`
    pub fn executor(mut self, executor: SharedExecutor) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Name of the application, appended to the user agent
    pub fn app_name(mut self, app_name: impl Into<Cow<'static, str>>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn build(self) -> Config {
        Config {
            region: self.region,
            credentials_provider: self.credentials_provider.unwrap_or_else(|| {
                SharedCredentialsProvider::new(aws_auth::provider::default_provider())
            }),
            endpoint_resolver: self.endpoint_resolver,
            endpoint_url: self.endpoint_url,
            use_dual_stack: self.use_dual_stack,
            use_fips: self.use_fips,
            retry_config: self.retry_config.unwrap_or_default(),
            timeout_config: self.timeout_config.unwrap_or_default(),
            sleep_impl: self.sleep_impl,
            executor: self.executor,
            app_name: self.app_name,
        }
    }
}
