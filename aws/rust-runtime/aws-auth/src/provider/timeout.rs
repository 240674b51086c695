/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Bound the time a credentials provider may take

use aws_types::credential::provide_credentials::future;
use aws_types::credential::{CredentialsError, ProvideCredentials};
use smithy_async::future::timeout::Timeout;
use smithy_async::rt::sleep::AsyncSleep;
use std::sync::Arc;
use std::time::Duration;

/// Wraps a credentials provider so that loading fails with
/// [`CredentialsError::ProviderTimedOut`] once `timeout` has elapsed
#[derive(Debug)]
pub struct TimeoutCredentialsProvider<P> {
    inner: P,
    timeout: Duration,
    sleep: Arc<dyn AsyncSleep>,
}

impl<P> TimeoutCredentialsProvider<P> {
    pub fn new(inner: P, timeout: Duration, sleep: Arc<dyn AsyncSleep>) -> Self {
        TimeoutCredentialsProvider {
            inner,
            timeout,
            sleep,
        }
    }
}

impl<P> ProvideCredentials for TimeoutCredentialsProvider<P>
where
    P: ProvideCredentials,
{
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        let timeout = self.timeout;
        let load = Timeout::new(self.inner.provide_credentials(), self.sleep.sleep(timeout));
        future::ProvideCredentials::new(async move {
            match load.await {
                Ok(result) => result,
                Err(_timed_out) => {
                    tracing::warn!(timeout = ?timeout, "credentials provider timed out");
                    Err(CredentialsError::ProviderTimedOut(timeout))
                }
            }
        })
    }
}

#[cfg(test)]
mod test {
    use crate::provider::provide_credentials_fn;
    use crate::provider::timeout::TimeoutCredentialsProvider;
    use aws_types::credential::{Credentials, CredentialsError, ProvideCredentials};
    use smithy_async::rt::sleep::TokioSleep;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let provider = TimeoutCredentialsProvider::new(
            provide_credentials_fn(|| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Credentials::from_keys("akid", "secret", None))
            }),
            Duration::from_secs(5),
            Arc::new(TokioSleep::new()),
        );
        let err = provider.provide_credentials().await.expect_err("timed out");
        assert!(matches!(err, CredentialsError::ProviderTimedOut(d) if d == Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn fast_provider_succeeds() {
        let provider = TimeoutCredentialsProvider::new(
            Credentials::from_keys("akid", "secret", None),
            Duration::from_secs(5),
            Arc::new(TokioSleep::new()),
        );
        let creds = provider.provide_credentials().await.expect("loaded");
        assert_eq!(creds.access_key_id(), "akid");
    }
}
