/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Credentials provider that caches the credentials loaded by another provider until they expire

use aws_types::credential::provide_credentials::future;
use aws_types::credential::{self, Credentials, CredentialsError, ProvideCredentials};
use smithy_async::future::timeout::Timeout;
use smithy_async::rt::sleep::AsyncSleep;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, trace_span, Instrument};

const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_CREDENTIAL_EXPIRATION: Duration = Duration::from_secs(15 * 60);
const DEFAULT_BUFFER_TIME: Duration = Duration::from_secs(10);

/// `LazyCachingCredentialsProvider` implements [`ProvideCredentials`] by caching
/// credentials that it loads by calling a user-provided [`ProvideCredentials`] implementation.
///
/// Credentials are refreshed lazily: the first call after the cached credentials come within
/// `buffer_time` of their expiry triggers a reload. Concurrent callers wait on the same reload.
pub struct LazyCachingCredentialsProvider {
    time: Arc<dyn TimeSource>,
    sleeper: Arc<dyn AsyncSleep>,
    cache: Cache,
    loader: Arc<dyn ProvideCredentials>,
    load_timeout: Duration,
    default_credential_expiration: Duration,
}

impl Debug for LazyCachingCredentialsProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCachingCredentialsProvider")
            .field("loader", &self.loader)
            .field("load_timeout", &self.load_timeout)
            .finish()
    }
}

impl LazyCachingCredentialsProvider {
    /// Returns a new `Builder` that can be used to construct the `LazyCachingCredentialsProvider`.
    pub fn builder() -> builder::Builder {
        builder::Builder::new()
    }
}

impl ProvideCredentials for LazyCachingCredentialsProvider {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        let now = self.time.now();
        let loader = self.loader.clone();
        let timeout_future = self.sleeper.sleep(self.load_timeout);
        let load_timeout = self.load_timeout;
        let default_credential_expiration = self.default_credential_expiration;
        let cache = self.cache.clone();

        future::ProvideCredentials::new(async move {
            // Attempt to get cached credentials, or clear the cache if they're expired
            if let Some(credentials) = cache.yield_or_clear_if_expired(now).await {
                debug!("loaded credentials from cache");
                return Ok(credentials);
            }
            // If we didn't get credentials from the cache, then we need to try and refresh.
            // There may be other threads also refreshing simultaneously, but this is OK
            // since the futures are not eagerly executed, and the cache will only run one
            // of them.
            let span = trace_span!("lazy_load_credentials");
            let future = Timeout::new(loader.provide_credentials(), timeout_future);
            cache
                .get_or_load(|| {
                    async move {
                        let credentials = future
                            .await
                            .map_err(|_| CredentialsError::ProviderTimedOut(load_timeout))??;
                        // If the credentials don't have an expiration time, then create a default one
                        let mut credentials = credentials;
                        if credentials.expiry().is_none() {
                            *credentials.expiry_mut() = Some(now + default_credential_expiration);
                        }
                        Ok(credentials)
                    }
                    .instrument(span)
                })
                .await
        })
    }
}

/// Abstraction over the current time so that expiry can be tested
pub trait TimeSource: Send + Sync + Debug {
    fn now(&self) -> SystemTime;
}

#[derive(Copy, Clone, Debug)]
struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[derive(Clone)]
struct Cache {
    buffer_time: Duration,
    value: Arc<RwLock<OnceCell<Credentials>>>,
}

impl Cache {
    fn new(buffer_time: Duration) -> Cache {
        Cache {
            buffer_time,
            value: Arc::new(RwLock::new(OnceCell::new())),
        }
    }

    #[cfg(test)]
    async fn get(&self) -> Option<Credentials> {
        self.value.read().await.get().cloned()
    }

    /// Attempts to load the cached value if it has been set
    ///
    /// Only one loader will run at a time; other callers wait for its result.
    async fn get_or_load<F, Fut>(&self, f: F) -> credential::Result
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = credential::Result>,
    {
        let lock = self.value.read().await;
        let future = lock.get_or_try_init(f);
        future.await.map(|creds| creds.clone())
    }

    fn expired(&self, credentials: &Credentials, now: SystemTime) -> bool {
        match credentials.expiry() {
            Some(expiry) => now + self.buffer_time > expiry,
            None => false,
        }
    }

    /// If the value is expired, clears the cache. Otherwise, yields the current value.
    async fn yield_or_clear_if_expired(&self, now: SystemTime) -> Option<Credentials> {
        // Short-circuit if the credential is not expired
        if let Some(credentials) = self.value.read().await.get() {
            if !self.expired(credentials, now) {
                return Some(credentials.clone());
            }
        }

        // Acquire a write lock to clear the cache, but then once the lock is acquired,
        // check again that the credential is not already cleared. If it has been cleared,
        // then another thread is refreshing the cache by the time the write lock was acquired.
        let mut lock = self.value.write().await;
        if let Some(credentials) = lock.get() {
            // Also check that we're clearing the expired credentials and not credentials
            // that have been refreshed by another thread.
            if self.expired(credentials, now) {
                *lock = OnceCell::new();
            }
        }
        None
    }
}

pub mod builder {
    use crate::provider::lazy_caching::{
        Cache, LazyCachingCredentialsProvider, SystemTimeSource, TimeSource,
        DEFAULT_BUFFER_TIME, DEFAULT_CREDENTIAL_EXPIRATION, DEFAULT_REFRESH_TIMEOUT,
    };
    use aws_types::credential::ProvideCredentials;
    use smithy_async::rt::sleep::{default_async_sleep, AsyncSleep};
    use std::sync::Arc;
    use std::time::Duration;

    /// Error constructing a [`LazyCachingCredentialsProvider`]
    #[derive(Debug, Eq, PartialEq)]
    pub enum BuildError {
        /// No provider was given to load credentials from
        MissingLoader,
        /// No sleep implementation was given and none is available by default
        MissingSleep,
        /// The default credential expiration must be at least 15 minutes
        ExpirationTooShort(Duration),
    }

    impl std::fmt::Display for BuildError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                BuildError::MissingLoader => write!(f, "a credentials loader is required"),
                BuildError::MissingSleep => {
                    write!(f, "an async sleep implementation is required")
                }
                BuildError::ExpirationTooShort(d) => write!(
                    f,
                    "default_credential_expiration must be at least 15 minutes (was {:?})",
                    d
                ),
            }
        }
    }

    impl std::error::Error for BuildError {}

    /// Builder for constructing a [`LazyCachingCredentialsProvider`].
    ///
    /// # Example
    ///
    /// ```
    /// use aws_auth::Credentials;
    /// use aws_auth::provider::provide_credentials_fn;
    /// use aws_auth::provider::lazy_caching::LazyCachingCredentialsProvider;
    /// use std::time::Duration;
    ///
    /// let provider = LazyCachingCredentialsProvider::builder()
    ///     .load(provide_credentials_fn(|| async {
    ///         // An async process to retrieve credentials would go here:
    ///         Ok(Credentials::from_keys("example", "example", None))
    ///     }))
    ///     .load_timeout(Duration::from_secs(30))
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[derive(Default)]
    pub struct Builder {
        sleep: Option<Arc<dyn AsyncSleep>>,
        time_source: Option<Arc<dyn TimeSource>>,
        load: Option<Arc<dyn ProvideCredentials>>,
        load_timeout: Option<Duration>,
        buffer_time: Option<Duration>,
        default_credential_expiration: Option<Duration>,
    }

    impl Builder {
        pub fn new() -> Self {
            Default::default()
        }

        /// An implementation of [`ProvideCredentials`] that will be used to load
        /// the cached credentials once they're expired.
        pub fn load(mut self, loader: impl ProvideCredentials + 'static) -> Self {
            self.load = Some(Arc::new(loader));
            self
        }

        /// Implementation of [`AsyncSleep`] to use for timeouts. Defaults to tokio's sleep.
        pub fn sleep(mut self, sleep: impl AsyncSleep + 'static) -> Self {
            self.sleep = Some(Arc::new(sleep));
            self
        }

        pub fn time_source(mut self, time_source: impl TimeSource + 'static) -> Self {
            self.time_source = Some(Arc::new(time_source));
            self
        }

        /// (Optional) Timeout for the given [`ProvideCredentials`] implementation.
        /// Defaults to 5 seconds.
        pub fn load_timeout(mut self, timeout: Duration) -> Self {
            self.load_timeout = Some(timeout);
            self
        }

        /// (Optional) Amount of time before the actual credential expiration time
        /// where credentials are considered expired. Defaults to 10 seconds.
        pub fn buffer_time(mut self, buffer_time: Duration) -> Self {
            self.buffer_time = Some(buffer_time);
            self
        }

        /// (Optional) Default expiration time to set on credentials if they don't
        /// have an expiration time. This is only used if the given [`ProvideCredentials`]
        /// returns [`Credentials`](aws_types::Credentials) that don't have their `expiry` set.
        /// This must be at least 15 minutes.
        pub fn default_credential_expiration(mut self, duration: Duration) -> Self {
            self.default_credential_expiration = Some(duration);
            self
        }

        /// Creates the [`LazyCachingCredentialsProvider`].
        pub fn build(self) -> Result<LazyCachingCredentialsProvider, BuildError> {
            let default_credential_expiration = self
                .default_credential_expiration
                .unwrap_or(DEFAULT_CREDENTIAL_EXPIRATION);
            if default_credential_expiration < DEFAULT_CREDENTIAL_EXPIRATION {
                return Err(BuildError::ExpirationTooShort(
                    default_credential_expiration,
                ));
            }
            Ok(LazyCachingCredentialsProvider {
                time: self.time_source.unwrap_or_else(|| Arc::new(SystemTimeSource)),
                sleeper: self
                    .sleep
                    .or_else(default_async_sleep)
                    .ok_or(BuildError::MissingSleep)?,
                cache: Cache::new(self.buffer_time.unwrap_or(DEFAULT_BUFFER_TIME)),
                loader: self.load.ok_or(BuildError::MissingLoader)?,
                load_timeout: self.load_timeout.unwrap_or(DEFAULT_REFRESH_TIMEOUT),
                default_credential_expiration,
            })
        }
    }
}
