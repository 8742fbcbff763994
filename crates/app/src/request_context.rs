//! Request-scoped cancellation and deadlines.
//!
//! A [`RequestContext`] travels with every storage and service call. It is
//! cheap to clone and can be observed in two ways:
//!
//! - [`RequestContext::check`] reports whether the context is already done,
//!   used before any statement is issued.
//! - [`RequestContext::run`] races a future against cancellation and the
//!   deadline. The losing future is dropped, which for `sqlx` aborts the
//!   in-flight query and rolls back any open transaction.

use std::{future::Future, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{
    sync::watch,
    time::{self, Instant},
};

/// Why a context is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation signal and optional deadline for a unit of work.
#[derive(Debug, Clone)]
pub struct RequestContext {
    canceled: watch::Receiver<bool>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never canceled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        let (_sender, canceled) = watch::channel(false);

        Self {
            canceled,
            deadline: None,
        }
    }

    /// Returns a context whose deadline is the earlier of the current one and `deadline`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });

        self
    }

    /// Returns a context that expires `timeout` from now (or earlier, if already bounded).
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Reports why the context is done, if it is. Cancellation wins over the deadline.
    #[must_use]
    pub fn err(&self) -> Option<ContextError> {
        if *self.canceled.borrow() {
            return Some(ContextError::Canceled);
        }

        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Fails when the context is already done.
    ///
    /// # Errors
    ///
    /// Returns the [`ContextError`] describing why the context is done.
    pub fn check(&self) -> Result<(), ContextError> {
        self.err().map_or(Ok(()), Err)
    }

    /// Drive `future` to completion unless the context finishes first.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Canceled`] or [`ContextError::DeadlineExceeded`] when the
    /// context is done before or while the future runs. The future is dropped in that case.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        self.check()?;

        let mut canceled = self.canceled.clone();

        tokio::select! {
            biased;

            () = wait_for_cancel(&mut canceled) => Err(ContextError::Canceled),
            () = wait_for_deadline(self.deadline) => Err(ContextError::DeadlineExceeded),
            output = future => Ok(output),
        }
    }
}

/// Owner of a cancellation signal shared by every context derived from it.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);

        Self {
            sender: Arc::new(sender),
        }
    }

    /// Derive a context that observes this handle.
    #[must_use]
    pub fn context(&self) -> RequestContext {
        RequestContext {
            canceled: self.sender.subscribe(),
            deadline: None,
        }
    }

    /// Cancel every context derived from this handle, including future ones.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

async fn wait_for_cancel(canceled: &mut watch::Receiver<bool>) {
    // A closed channel can never report cancellation.
    if canceled.wait_for(|canceled| *canceled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
