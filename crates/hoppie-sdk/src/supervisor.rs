//! Supervised session tasks.
//!
//! Every long-lived task of a session (the poll loop, and whatever the
//! caller adds through [`HoppieManager::spawn`](crate::HoppieManager::spawn))
//! runs under one [`Supervisor`]. The first task to fail cancels the whole
//! session; its error is kept and handed out once by [`Supervisor::wait`].

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::error::SdkError;

#[derive(Debug)]
pub(crate) struct Supervisor {
    cancel: CancellationToken,
    tracker: TaskTracker,
    first_error: Arc<Mutex<Option<SdkError>>>,
}

impl Supervisor {
    pub(crate) fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            tracker: TaskTracker::new(),
            first_error: Arc::default(),
        }
    }

    /// Run `task` until it finishes. An error cancels the session.
    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Result<(), SdkError>> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        let first_error = Arc::clone(&self.first_error);

        self.tracker.spawn(async move {
            let Err(err) = task.await else {
                return;
            };
            if matches!(err, SdkError::Cancelled) {
                debug!("session task stopped by cancellation");
            } else {
                warn!(error = %err, "session task failed, cancelling session");
            }
            first_error
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get_or_insert(err);
            cancel.cancel();
        });
    }

    /// Wait for every spawned task and return the first error, if any.
    ///
    /// The error is returned to one caller only. The tracker stays closed
    /// after the first call, so concurrent waiters all return once the
    /// running tasks finish. Tasks spawned later are still tracked.
    pub(crate) async fn wait(&self) -> Result<(), SdkError> {
        self.tracker.close();
        self.tracker.wait().await;

        let first_error = self
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn successful_tasks_leave_session_running() {
        let cancel = CancellationToken::new();
        let supervisor = Supervisor::new(cancel.clone());
        supervisor.spawn(async { Ok(()) });
        supervisor.spawn(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        });

        assert!(supervisor.wait().await.is_ok());
        assert!(!cancel.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn first_error_cancels_and_is_surfaced_once() {
        let cancel = CancellationToken::new();
        let supervisor = Supervisor::new(cancel.clone());

        supervisor.spawn(async { Err(SdkError::Transport("connection reset".into())) });
        let sibling = cancel.clone();
        supervisor.spawn(async move {
            sibling.cancelled().await;
            Err(SdkError::Cancelled)
        });

        let err = supervisor.wait().await.unwrap_err();
        assert!(matches!(err, SdkError::Transport(_)));
        assert!(cancel.is_cancelled());
        assert!(supervisor.wait().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_waiters_all_return() {
        let cancel = CancellationToken::new();
        let supervisor = Supervisor::new(cancel.clone());
        supervisor.spawn(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(SdkError::Transport("connection reset".into()))
        });

        let (first, second) = tokio::join!(supervisor.wait(), supervisor.wait());
        let errors = [first, second].into_iter().filter(Result::is_err).count();
        assert_eq!(errors, 1);
        assert!(cancel.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn tasks_spawned_after_wait_are_tracked() {
        let supervisor = Supervisor::new(CancellationToken::new());
        assert!(supervisor.wait().await.is_ok());

        supervisor.spawn(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(SdkError::Transport("connection reset".into()))
        });
        assert!(matches!(supervisor.wait().await, Err(SdkError::Transport(_))));
    }
}
