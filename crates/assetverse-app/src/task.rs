//! Spawned user actions and state rollback on cancellation.

use assetverse_core::{ClientError, ClientResult};
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to an action running on the runtime.
///
/// Dropping the handle detaches the action: it still runs to completion and applies
/// its state update, nobody awaits the value. [`ActionHandle::cancel`] aborts it.
#[derive(Debug)]
pub struct ActionHandle<T> {
    name: &'static str,
    inner: JoinHandle<T>,
}

impl<T: Send + 'static> ActionHandle<T> {
    pub fn spawn<F>(name: &'static str, future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            name,
            inner: tokio::spawn(future),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn cancel(&self) {
        tracing::debug!(action = self.name, "Cancelling action");
        self.inner.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Wait for the action's output.
    pub async fn join(self) -> ClientResult<T> {
        match self.inner.await {
            Ok(value) => Ok(value),
            Err(err) if err.is_cancelled() => Err(ClientError::Internal(format!(
                "{} was cancelled",
                self.name
            ))),
            Err(err) => Err(ClientError::Internal(format!(
                "{} panicked: {}",
                self.name, err
            ))),
        }
    }
}

/// Applies `reset` to the watched state when dropped while still armed.
///
/// Operations arm one of these across their suspension points so that an aborted
/// future does not leave a transient flag (`loading`, an in-flight phase) stuck.
pub(crate) struct StateGuard<'a, S, F>
where
    F: FnOnce(&mut S),
{
    state: &'a watch::Sender<S>,
    reset: Option<F>,
}

impl<'a, S, F> StateGuard<'a, S, F>
where
    F: FnOnce(&mut S),
{
    pub(crate) fn new(state: &'a watch::Sender<S>, reset: F) -> Self {
        Self {
            state,
            reset: Some(reset),
        }
    }

    /// The operation reached a terminal state; nothing to roll back.
    pub(crate) fn disarm(mut self) {
        self.reset = None;
    }
}

impl<S, F> Drop for StateGuard<'_, S, F>
where
    F: FnOnce(&mut S),
{
    fn drop(&mut self) {
        if let Some(reset) = self.reset.take() {
            self.state.send_modify(reset);
        }
    }
}
