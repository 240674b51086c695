/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Retry support for aws-hyper
//!
//! Retries are budgeted in two ways:
//! 1. A request makes at most `max_attempts` attempts.
//! 2. A retry quota shared by every request sent from the same [`Client`](crate::Client). A retry
//!    withdraws from the quota, a successful response returns the withdrawal. When the quota is
//!    exhausted, failures are returned to the caller immediately.

use smithy_async::future::now_or_later::BoxFuture;
use smithy_async::rt::sleep::AsyncSleep;
use smithy_http::operation::Operation;
use smithy_http::result::{SdkError, SdkSuccess};
use smithy_http::retry::ClassifyResponse;
use smithy_types::retry::{ErrorKind, RetryKind};
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::Instrument;

/// Retry configuration
///
/// # Examples
/// ```rust
/// use aws_hyper::RetryConfig;
/// let conf = RetryConfig::new().with_max_attempts(5);
/// ```
#[derive(Clone)]
pub struct RetryConfig {
    initial_retry_tokens: usize,
    retry_cost: usize,
    no_retry_increment: usize,
    timeout_retry_cost: usize,
    max_attempts: u32,
    max_backoff: Duration,
    base: fn() -> f64,
}

impl Debug for RetryConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryConfig")
            .field("initial_retry_tokens", &self.initial_retry_tokens)
            .field("retry_cost", &self.retry_cost)
            .field("timeout_retry_cost", &self.timeout_retry_cost)
            .field("max_attempts", &self.max_attempts)
            .field("max_backoff", &self.max_backoff)
            .finish()
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// A configuration that never retries
    pub fn disabled() -> Self {
        Self::default().with_max_attempts(1)
    }

    /// Set the maximum number of attempts, including the initial one
    ///
    /// A value of 1 disables retries. 0 is treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the size of the cross-request retry quota
    pub fn with_initial_retry_tokens(mut self, tokens: usize) -> Self {
        self.initial_retry_tokens = tokens;
        self
    }

    /// Cap the delay between attempts
    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Override the base used for exponential backoff
    ///
    /// By default, the base is random in `[0, 1)`. Tests use a static base for deterministic
    /// timing, or `|| 0.0` to retry without waiting.
    pub fn with_base(mut self, base: fn() -> f64) -> Self {
        self.base = base;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_retry_tokens: INITIAL_RETRY_TOKENS,
            retry_cost: RETRY_COST,
            no_retry_increment: 1,
            timeout_retry_cost: 10,
            max_attempts: MAX_ATTEMPTS,
            max_backoff: Duration::from_secs(20),
            base: fastrand::f64,
        }
    }
}

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_RETRY_TOKENS: usize = 500;
const RETRY_COST: usize = 5;

/// Manages the retry quota shared by every request sent from a client
///
/// Each request gets its own [`RetryHandler`] from [`RetryHandlerFactory::new_handler`].
#[derive(Clone, Debug)]
pub struct RetryHandlerFactory {
    config: RetryConfig,
    shared_state: CrossRequestRetryState,
}

impl RetryHandlerFactory {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            shared_state: CrossRequestRetryState::new(config.initial_retry_tokens),
            config,
        }
    }

    /// Replace the configuration
    ///
    /// The shared quota is refilled to the new `initial_retry_tokens`.
    pub fn with_config(&mut self, config: RetryConfig) {
        self.shared_state = CrossRequestRetryState::new(config.initial_retry_tokens);
        self.config = config;
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn new_handler(&self, sleep_impl: Option<Arc<dyn AsyncSleep>>) -> RetryHandler {
        RetryHandler {
            local: RequestLocalRetryState::new(),
            shared: self.shared_state.clone(),
            config: self.config.clone(),
            sleep_impl,
        }
    }
}

#[derive(Default, Clone, Debug)]
struct RequestLocalRetryState {
    attempts: u32,
    last_quota_usage: Option<usize>,
}

impl RequestLocalRetryState {
    fn new() -> Self {
        Self::default()
    }
}

/// Retry quota shared across every request sent from a client
#[derive(Clone, Debug)]
struct CrossRequestRetryState {
    quota_available: Arc<Mutex<usize>>,
}

impl CrossRequestRetryState {
    fn new(initial_quota: usize) -> Self {
        Self {
            quota_available: Arc::new(Mutex::new(initial_quota)),
        }
    }

    fn quota(&self) -> MutexGuard<'_, usize> {
        // the quota is a plain counter, a panic while holding the lock cannot corrupt it
        self.quota_available
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn quota_release(&self, value: Option<usize>, config: &RetryConfig) {
        let mut quota = self.quota();
        *quota += value.unwrap_or(config.no_retry_increment);
        *quota = (*quota).min(config.initial_retry_tokens);
    }

    /// Attempt to acquire retry quota for `error_kind`
    ///
    /// Returns the amount acquired, or `None` if the quota is exhausted
    fn quota_acquire(&self, err: &ErrorKind, config: &RetryConfig) -> Option<usize> {
        let mut quota = self.quota();
        let retry_cost = if err == &ErrorKind::TransientError {
            config.timeout_retry_cost
        } else {
            config.retry_cost
        };
        if retry_cost > *quota {
            None
        } else {
            *quota -= retry_cost;
            Some(retry_cost)
        }
    }
}

/// RetryHandler
///
/// Implements a standard token bucket retry strategy: `shared` captures cross-request state,
/// `local` captures the state of a single request.
#[derive(Clone)]
pub struct RetryHandler {
    local: RequestLocalRetryState,
    shared: CrossRequestRetryState,
    config: RetryConfig,
    sleep_impl: Option<Arc<dyn AsyncSleep>>,
}

impl Debug for RetryHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryHandler")
            .field("attempts", &self.local.attempts)
            .field("config", &self.config)
            .finish()
    }
}

impl RetryHandler {
    /// Returns the next handler state together with the backoff, or `None` if no budget remains
    fn should_retry_error(&self, error_kind: &ErrorKind) -> Option<(Self, Duration)> {
        if self.local.attempts >= self.config.max_attempts - 1 {
            tracing::debug!(
                attempts = self.local.attempts + 1,
                max_attempts = self.config.max_attempts,
                "not retrying because maximum attempts have been reached"
            );
            return None;
        }
        let quota_used = match self.shared.quota_acquire(error_kind, &self.config) {
            Some(quota) => quota,
            None => {
                tracing::debug!(
                    state = ?self.shared,
                    "not retrying because no retry quota is available"
                );
                return None;
            }
        };
        let backoff = self.backoff();
        let mut next = self.clone();
        next.local.attempts += 1;
        next.local.last_quota_usage = Some(quota_used);
        Some((next, backoff))
    }

    fn backoff(&self) -> Duration {
        let base = (self.config.base)();
        let exponent = self.local.attempts.min(i32::MAX as u32) as i32;
        let backoff = base * 2_f64.powi(exponent);
        let max_backoff = self.config.max_backoff.as_secs_f64();
        if backoff.is_finite() && backoff < max_backoff {
            Duration::from_secs_f64(backoff.max(0.0))
        } else {
            self.config.max_backoff
        }
    }

    fn should_retry(&self, retry_kind: &RetryKind) -> Option<(Self, Duration)> {
        match retry_kind {
            RetryKind::NotRetryable => None,
            RetryKind::Explicit(dur) => {
                if self.local.attempts >= self.config.max_attempts - 1 {
                    return None;
                }
                let mut next = self.clone();
                next.local.attempts += 1;
                Some((next, *dur))
            }
            RetryKind::Error(err) => self.should_retry_error(err),
        }
    }

    fn retry_for(&self, retry_kind: RetryKind) -> Option<BoxFuture<Self>> {
        let (next, dur) = self.should_retry(&retry_kind)?;

        let sleep = match &self.sleep_impl {
            Some(sleep) => sleep.clone(),
            None => {
                tracing::warn!(
                    "retry was requested but no sleep implementation is configured. Not retrying."
                );
                return None;
            }
        };

        tracing::debug!(
            "attempt {} failed with {:?}; retrying after {:?}",
            self.local.attempts,
            retry_kind,
            dur
        );
        let fut = async move {
            sleep.sleep(dur).await;
            next
        }
        .instrument(tracing::debug_span!("retry", kind = ?retry_kind));
        Some(Box::pin(fut))
    }

    fn on_success(&self) {
        self.shared
            .quota_release(self.local.last_quota_usage, &self.config);
    }

    #[cfg(test)]
    fn retry_quota(&self) -> usize {
        *self.shared.quota()
    }
}

impl<Handler, R, T, E> tower::retry::Policy<Operation<Handler, R>, SdkSuccess<T>, SdkError<E>>
    for RetryHandler
where
    Handler: Clone,
    R: ClassifyResponse<SdkSuccess<T>, SdkError<E>>,
{
    type Future = BoxFuture<Self>;

    fn retry(
        &self,
        req: &Operation<Handler, R>,
        result: Result<&SdkSuccess<T>, &SdkError<E>>,
    ) -> Option<Self::Future> {
        let retry_kind = req.retry_policy().classify(result);
        if result.is_ok() {
            self.on_success();
        }
        self.retry_for(retry_kind)
    }

    fn clone_request(&self, req: &Operation<Handler, R>) -> Option<Operation<Handler, R>> {
        req.try_clone()
    }
}

#[cfg(test)]
mod test {
    use crate::retry::{RetryConfig, RetryHandler, RetryHandlerFactory};
    use smithy_types::retry::{ErrorKind, RetryKind};
    use std::time::Duration;
    use tracing_test::traced_test;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn retry_handler_send_sync() {
        assert_send_sync::<RetryHandler>()
    }

    fn test_config() -> RetryConfig {
        RetryConfig::default().with_base(|| 1_f64)
    }

    #[test]
    fn eventual_success() {
        let policy = RetryHandlerFactory::new(test_config()).new_handler(None);
        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(1));
        assert_eq!(policy.retry_quota(), 495);

        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(2));
        assert_eq!(policy.retry_quota(), 490);

        policy.on_success();
        assert_eq!(policy.retry_quota(), 495);
    }

    #[test]
    fn no_more_attempts() {
        let policy = RetryHandlerFactory::new(test_config()).new_handler(None);
        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(1));
        assert_eq!(policy.retry_quota(), 495);

        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(2));
        assert_eq!(policy.retry_quota(), 490);

        let no_retry = policy.should_retry_error(&ErrorKind::ServerError);
        assert!(no_retry.is_none());
        assert_eq!(policy.retry_quota(), 490);
    }

    #[test]
    fn no_quota() {
        let conf = test_config().with_initial_retry_tokens(5);
        let policy = RetryHandlerFactory::new(conf).new_handler(None);
        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(1));
        assert_eq!(policy.retry_quota(), 0);
        let no_retry = policy.should_retry_error(&ErrorKind::ServerError);
        assert!(no_retry.is_none());
        assert_eq!(policy.retry_quota(), 0);
    }

    #[test]
    fn transient_errors_cost_more() {
        let policy = RetryHandlerFactory::new(test_config()).new_handler(None);
        let (policy, _) = policy
            .should_retry_error(&ErrorKind::TransientError)
            .expect("should retry");
        assert_eq!(policy.retry_quota(), 490);
        policy.on_success();
        assert_eq!(policy.retry_quota(), 500);
    }

    #[test]
    fn quota_is_shared_between_handlers() {
        let factory = RetryHandlerFactory::new(test_config());
        let first = factory.new_handler(None);
        let second = factory.new_handler(None);
        let _ = first
            .should_retry_error(&ErrorKind::ThrottlingError)
            .expect("should retry");
        assert_eq!(second.retry_quota(), 495);
    }

    #[test]
    fn success_without_retries_does_not_exceed_initial_quota() {
        let policy = RetryHandlerFactory::new(test_config()).new_handler(None);
        policy.on_success();
        assert_eq!(policy.retry_quota(), 500);
    }

    #[test]
    fn disabled_never_retries() {
        let policy = RetryHandlerFactory::new(RetryConfig::disabled()).new_handler(None);
        assert!(policy
            .should_retry_error(&ErrorKind::ServerError)
            .is_none());
        assert_eq!(RetryConfig::default().with_max_attempts(0).max_attempts(), 1);
    }

    #[test]
    #[traced_test]
    fn no_retry_without_sleep() {
        let policy = RetryHandlerFactory::new(test_config()).new_handler(None);
        assert!(policy
            .retry_for(RetryKind::Error(ErrorKind::ServerError))
            .is_none());
        assert!(logs_contain("no sleep implementation is configured"));
    }

    #[test]
    fn backoff_timing() {
        let conf = test_config().with_max_attempts(5);
        let policy = RetryHandlerFactory::new(conf).new_handler(None);
        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(1));
        assert_eq!(policy.retry_quota(), 495);

        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(2));
        assert_eq!(policy.retry_quota(), 490);

        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(4));
        assert_eq!(policy.retry_quota(), 485);

        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(8));
        assert_eq!(policy.retry_quota(), 480);

        let no_retry = policy.should_retry_error(&ErrorKind::ServerError);
        assert!(no_retry.is_none());
        assert_eq!(policy.retry_quota(), 480);
    }

    #[test]
    fn max_backoff_time() {
        let conf = test_config()
            .with_max_attempts(5)
            .with_max_backoff(Duration::from_secs(3));
        let policy = RetryHandlerFactory::new(conf).new_handler(None);
        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(1));
        assert_eq!(policy.retry_quota(), 495);

        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(2));
        assert_eq!(policy.retry_quota(), 490);

        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(3));
        assert_eq!(policy.retry_quota(), 485);

        let (policy, dur) = policy
            .should_retry_error(&ErrorKind::ServerError)
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(3));
        assert_eq!(policy.retry_quota(), 480);

        let no_retry = policy.should_retry_error(&ErrorKind::ServerError);
        assert!(no_retry.is_none());
        assert_eq!(policy.retry_quota(), 480);
    }

    #[test]
    fn new_config_refills_the_quota() {
        let mut factory = RetryHandlerFactory::new(test_config());
        factory.with_config(test_config().with_initial_retry_tokens(0));
        let policy = factory.new_handler(None);
        assert_eq!(policy.retry_quota(), 0);
        assert!(policy
            .should_retry_error(&ErrorKind::ServerError)
            .is_none());
    }

    #[test]
    fn backoff_stays_capped_after_many_attempts() {
        let conf = test_config()
            .with_max_attempts(40)
            .with_max_backoff(Duration::from_secs(20));
        let mut policy = RetryHandlerFactory::new(conf).new_handler(None);
        for _ in 0..39 {
            let (next, dur) = policy
                .should_retry_error(&ErrorKind::ServerError)
                .expect("should retry");
            assert!(dur <= Duration::from_secs(20));
            policy = next;
        }
        assert_eq!(policy.backoff(), Duration::from_secs(20));
        assert!(policy
            .should_retry_error(&ErrorKind::ServerError)
            .is_none());
    }
}
