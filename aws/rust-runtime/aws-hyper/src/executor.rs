/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Executors used by the blocking, callable, and callback calling conventions
//!
//! The async pipeline is always the same. An [`Executor`] decides where it runs: `spawn` hands it
//! to a worker and `block_on` drives it on the calling thread.

use once_cell::sync::OnceCell;
use std::fmt::Debug;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExecutorError {
    #[error("failed to start the shared runtime")]
    RuntimeUnavailable(#[source] std::io::Error),
    #[error("a blocking call cannot be made from within an async context. Use the async or callable form instead")]
    BlockingInAsyncContext,
}

/// Runs the request pipeline for the non-async calling conventions
pub trait Executor: Send + Sync + Debug {
    /// Submit `task` to run in the background. This must not block the caller.
    fn spawn(&self, task: BoxFuture<'static, ()>) -> Result<(), ExecutorError>;

    /// Drive `task` to completion on the current thread
    fn block_on(&self, task: BoxFuture<'_, ()>) -> Result<(), ExecutorError>;
}

static SHARED_RUNTIME: OnceCell<Runtime> = OnceCell::new();

/// The process-wide multi-threaded runtime, created on first use
fn shared_runtime() -> Result<&'static Runtime, ExecutorError> {
    SHARED_RUNTIME.get_or_try_init(|| {
        tracing::debug!("starting shared runtime");
        Builder::new_multi_thread()
            .enable_all()
            .thread_name("aws-hyper-worker")
            .build()
            .map_err(ExecutorError::RuntimeUnavailable)
    })
}

/// Tokio based [`Executor`]
///
/// When no handle is given, the shared multi-threaded runtime is used.
#[derive(Clone, Debug, Default)]
pub struct TokioExecutor {
    handle: Option<Handle>,
}

impl TokioExecutor {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Use the ambient runtime if it is multi-threaded, otherwise the shared runtime
    ///
    /// A current-thread runtime would run spawned work on the thread that submitted it, so it is
    /// never captured.
    pub fn current() -> Self {
        Self {
            handle: Handle::try_current()
                .ok()
                .filter(|handle| handle.runtime_flavor() == RuntimeFlavor::MultiThread),
        }
    }

    /// Always use the shared runtime
    pub fn shared() -> Self {
        Self { handle: None }
    }

    fn handle(&self) -> Result<Handle, ExecutorError> {
        match &self.handle {
            Some(handle) => Ok(handle.clone()),
            None => shared_runtime().map(|rt| rt.handle().clone()),
        }
    }
}

impl Executor for TokioExecutor {
    fn spawn(&self, task: BoxFuture<'static, ()>) -> Result<(), ExecutorError> {
        // the JoinHandle is dropped: completion is reported through the task itself
        let _ = self.handle()?.spawn(task);
        Ok(())
    }

    fn block_on(&self, task: BoxFuture<'_, ()>) -> Result<(), ExecutorError> {
        let handle = self.handle()?;
        if in_async_context(&handle) {
            return Err(ExecutorError::BlockingInAsyncContext);
        }
        handle.block_on(task);
        Ok(())
    }
}

/// Whether the current thread is driving async tasks
///
/// `spawn_blocking` threads carry a runtime handle but may block. Only threads inside a runtime
/// (workers, `Runtime::block_on`) may not. Tokio exposes that distinction only through the
/// panic `Handle::block_on` raises before polling anything, so an empty future is used to check.
fn in_async_context(handle: &Handle) -> bool {
    if Handle::try_current().is_err() {
        return false;
    }
    panic::catch_unwind(AssertUnwindSafe(|| handle.block_on(async {}))).is_err()
}

/// A cheaply cloneable, type-erased [`Executor`]
#[derive(Clone, Debug)]
pub struct SharedExecutor(Arc<dyn Executor>);

impl SharedExecutor {
    pub fn new(executor: impl Executor + 'static) -> Self {
        Self(Arc::new(executor))
    }
}

impl AsRef<dyn Executor> for SharedExecutor {
    fn as_ref(&self) -> &(dyn Executor + 'static) {
        self.0.as_ref()
    }
}

impl From<Arc<dyn Executor>> for SharedExecutor {
    fn from(executor: Arc<dyn Executor>) -> Self {
        Self(executor)
    }
}

impl Executor for SharedExecutor {
    fn spawn(&self, task: BoxFuture<'static, ()>) -> Result<(), ExecutorError> {
        self.0.spawn(task)
    }

    fn block_on(&self, task: BoxFuture<'_, ()>) -> Result<(), ExecutorError> {
        self.0.block_on(task)
    }
}

/// The ambient tokio runtime when one exists, otherwise the shared runtime
pub fn default_executor() -> SharedExecutor {
    SharedExecutor::new(TokioExecutor::current())
}

/// Caller supplied context handed back to completion handlers
///
/// Each context carries an id so that log lines for a submission can be correlated with its
/// completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsyncCallerContext {
    id: String,
}

impl AsyncCallerContext {
    pub fn new() -> Self {
        Self {
            id: format!("{:016x}", fastrand::u64(..)),
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for AsyncCallerContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{AsyncCallerContext, Executor, ExecutorError, SharedExecutor, TokioExecutor};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn block_on_shared_runtime() {
        let executor = SharedExecutor::new(TokioExecutor::shared());
        let mut out = 0;
        let slot = &mut out;
        executor
            .block_on(Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                *slot = 5;
            }))
            .expect("no ambient runtime");
        assert_eq!(out, 5);
    }

    #[test]
    fn spawn_runs_on_a_worker_thread() {
        let executor = TokioExecutor::shared();
        let (tx, rx) = mpsc::channel();
        let caller = std::thread::current().id();
        executor
            .spawn(Box::pin(async move {
                tx.send(std::thread::current().id()).unwrap();
            }))
            .unwrap();
        let worker = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(caller, worker);
    }

    #[tokio::test]
    async fn block_on_inside_runtime_is_rejected() {
        let executor = TokioExecutor::current();
        let err = executor
            .block_on(Box::pin(async {}))
            .expect_err("cannot block inside a runtime");
        assert!(matches!(err, ExecutorError::BlockingInAsyncContext));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn block_on_from_a_blocking_thread() {
        let executor = TokioExecutor::current();
        let out = tokio::task::spawn_blocking(move || {
            let mut out = 0;
            let slot = &mut out;
            executor
                .block_on(Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    *slot = 7;
                }))
                .map(|_| out)
        })
        .await
        .expect("blocking task completes");
        assert_eq!(out.expect("blocking threads may block"), 7);
    }

    #[tokio::test]
    async fn current_thread_runtimes_are_not_captured() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let caller = std::thread::current().id();
        TokioExecutor::current()
            .spawn(Box::pin(async move {
                let _ = tx.send(std::thread::current().id());
            }))
            .unwrap();
        assert_ne!(rx.await.expect("task ran"), caller);
    }

    #[test]
    fn caller_context_ids() {
        assert_eq!(AsyncCallerContext::with_id("abc").id(), "abc");
        assert_eq!(AsyncCallerContext::new().id().len(), 16);
    }
}
