/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Provides the [`NowOrLater`] future with an explicit `Now` variant
//!
//! Credential and region providers are usually immediately ready (static values, environment
//! variables) but occasionally need to do IO. `NowOrLater` lets their trait methods return a
//! single concrete type for both cases.

use pin_project_lite::pin_project;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Boxed future type alias used for the `Later` variant
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

pin_project! {
    /// Future with an explicit "Now" variant
    ///
    /// When a future is immediately, ready, this enables avoiding an unnecessary allocation.
    /// This is intended to be used with `Pin<Box<dyn Future>>` or similar as the future variant.
    pub struct NowOrLater<T, F> {
        #[pin]
        inner: Inner<T, F>
    }
}

impl<T, F> fmt::Debug for NowOrLater<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Now { .. } => f.write_str("NowOrLater::Now"),
            Inner::Later { .. } => f.write_str("NowOrLater::Later"),
        }
    }
}

pin_project! {
    #[project = NowOrLaterProj]
    enum Inner<T, F> {
        #[non_exhaustive]
        Now { value: Option<T> },
        #[non_exhaustive]
        Later { #[pin] future: F },
    }
}

impl<T, F> NowOrLater<T, F> {
    pub fn new(future: F) -> Self {
        Self {
            inner: Inner::Later { future },
        }
    }

    pub fn ready(value: T) -> Self {
        let value = Some(value);
        Self {
            inner: Inner::Now { value },
        }
    }

    /// True if this future was constructed with [`NowOrLater::ready`] and has not been polled yet
    pub fn is_now(&self) -> bool {
        matches!(&self.inner, Inner::Now { value: Some(_) })
    }
}

impl<T, F> Future for NowOrLater<T, F>
where
    F: Future<Output = T>,
{
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().inner.project() {
            NowOrLaterProj::Now { value } => match value.take() {
                Some(value) => Poll::Ready(value),
                // polling a completed future is a contract violation; stay pending
                None => Poll::Pending,
            },
            NowOrLaterProj::Later { future } => future.poll(cx),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::future::now_or_later::{BoxFuture, NowOrLater};
    use futures_util::FutureExt;

    #[test]
    fn ready_future_immediately_returns() {
        let f = NowOrLater::<_, BoxFuture<&str>>::ready("AKIDEXAMPLE");
        assert!(f.is_now());
        assert_eq!(f.now_or_never().expect("future was ready"), "AKIDEXAMPLE");
    }

    #[tokio::test]
    async fn box_dyn_future() {
        let f: BoxFuture<i32> = Box::pin(async { 5 });
        let wrapped = NowOrLater::new(f);
        assert!(!wrapped.is_now());
        assert_eq!(wrapped.await, 5);
    }
}
